use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use crime_stats::auth::{Authenticator, TokenService};
use crime_stats::config::{LoggingSettings, Settings};
use crime_stats::error::handle_json_payload_error;
use crime_stats::routes::{self, AppState};
use crime_stats::services::{CacheManager, ChartClient, CrimeApiClient, UserStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SECRET: &str = "change-me-in-production";

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error<E: std::fmt::Display>(what: &str, e: E) -> std::io::Error {
    error!("{}: {}", what, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to load configuration: {}", e),
        )
    })?;

    init_logging(&settings.logging);

    info!("Starting crime stats service...");
    info!("Configuration loaded successfully");

    if settings.auth.secret_key == DEFAULT_SECRET {
        warn!("Using the default secret key. Set SECRET_KEY for production use.");
    }

    let cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = Arc::new(
        CacheManager::new(
            settings.cache.redis_url.as_deref(),
            cache_size,
            settings.cache.ttl_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to Redis", e))?,
    );

    info!(
        "Response cache initialized (L1: {} entries, TTL: {}s, shared tier: {})",
        cache_size,
        settings.cache.ttl_secs,
        settings.cache.redis_url.is_some()
    );

    let users = Arc::new(
        UserStore::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .map_err(|e| startup_error("Failed to open user database", e))?,
    );

    let crime_api = Arc::new(
        CrimeApiClient::new(&settings.crime_api, cache.clone())
            .map_err(|e| startup_error("Failed to build crime API client", e))?,
    );

    let charts = Arc::new(
        ChartClient::new(&settings.charting)
            .map_err(|e| startup_error("Failed to build charting client", e))?,
    );
    if !charts.is_configured() {
        warn!("Charting credentials missing; graph endpoints will return 503");
    }

    let tokens = TokenService::new(&settings.auth.secret_key, settings.auth.token_ttl_secs);
    let auth = Arc::new(Authenticator::new(
        users.clone(),
        tokens,
        settings.auth.admin_usernames.clone(),
    ));

    if let Some(password) = &settings.auth.admin_password {
        let created = auth
            .provision_admins(password)
            .await
            .map_err(|e| startup_error("Failed to provision admin accounts", e))?;
        if !created.is_empty() {
            info!("Provisioned admin accounts: {}", created.join(", "));
        }
    } else if !settings.auth.admin_usernames.is_empty() {
        info!("ADMIN_PASSWORD not set; admin accounts must already exist");
    }

    let legacy_admin_key = if settings.auth.allow_path_key {
        warn!("Admin routes accept the secret key as a URL segment");
        Some(settings.auth.secret_key.clone())
    } else {
        None
    };

    let app_state = AppState {
        crime_api,
        cache,
        users,
        auth,
        charts,
        legacy_admin_key,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
            .default_service(web::to(routes::not_found))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
