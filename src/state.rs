use std::sync::Arc;

use crate::config::Config;
use crate::email::SystemMailer;
use crate::rate_limit::LoginRateLimiter;
use crate::store::AuthStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn AuthStore>,
    pub config: Config,
    pub mailer: Option<Arc<SystemMailer>>,
    pub login_limiter: LoginRateLimiter,
}
