pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod purge;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::SystemMailer;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::store::AuthStore;

pub fn build_app(store: Arc<dyn AuthStore>, config: Config) -> (Router, SharedState) {
    let mailer = config.smtp.as_ref().and_then(|smtp| match SystemMailer::new(smtp) {
        Ok(mailer) => {
            tracing::info!("System SMTP configured");
            Some(Arc::new(mailer))
        }
        Err(e) => {
            tracing::warn!("System SMTP not available: {e}");
            None
        }
    });

    let state: SharedState = Arc::new(AppState {
        store,
        config,
        mailer,
        login_limiter: LoginRateLimiter::new(),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
