use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    /// Lifetime of issued session tokens, in minutes.
    pub session_ttl_mins: i64,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("AUTHGATE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid AUTHGATE_HOST: {e}"))?;

        let port: u16 = env_or("AUTHGATE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid AUTHGATE_PORT: {e}"))?;

        let base_url = env_or("AUTHGATE_BASE_URL", &format!("http://{host}:{port}"));

        let session_ttl_mins: i64 = env_or("AUTHGATE_SESSION_TTL_MINS", "60")
            .parse()
            .map_err(|e| format!("Invalid AUTHGATE_SESSION_TTL_MINS: {e}"))?;
        if session_ttl_mins <= 0 {
            return Err("AUTHGATE_SESSION_TTL_MINS must be positive".to_string());
        }

        let log_level = env_or("AUTHGATE_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("AUTHGATE_SMTP_HOST").ok(),
            std::env::var("AUTHGATE_SMTP_PORT").ok(),
            std::env::var("AUTHGATE_SMTP_USER").ok(),
            std::env::var("AUTHGATE_SMTP_PASS").ok(),
            std::env::var("AUTHGATE_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid AUTHGATE_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            base_url,
            session_ttl_mins,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
