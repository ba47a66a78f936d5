// Route exports
pub mod crimes;
pub mod graphs;
pub mod health;
pub mod users;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::models::ErrorResponse;
use crate::services::{CacheManager, ChartClient, CrimeApiClient, UserStore};

/// Application state shared across all handlers
///
/// Built once at startup from [`crate::config::Settings`] and never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub crime_api: Arc<CrimeApiClient>,
    pub cache: Arc<CacheManager>,
    pub users: Arc<UserStore>,
    pub auth: Arc<Authenticator>,
    pub charts: Arc<ChartClient>,
    /// Key accepted by the `/{adminKey}` routes; `None` disables them
    pub legacy_admin_key: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::configure)
            .configure(users::configure)
            .configure(crimes::configure)
            .configure(graphs::configure),
    );
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not_found".to_string(),
        message: "There has been an error".to_string(),
        status_code: 404,
    })
}
