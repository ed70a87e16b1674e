use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A revoked session token. Rows are append-only; expired rows are
/// ignored at lookup time and removed by the purge task.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BlacklistedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
