use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiError;
use crate::models::{SignupRequest, TokenResponse, UsernameResponse};
use crate::routes::AppState;

/// Configure user and token routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(create_user))
        .route("/users/{id}", web::get().to(get_user))
        .route("/all_users_names", web::get().to(all_usernames))
        .route("/all_users_ids", web::get().to(all_user_ids))
        .route("/users/{id}/{admin_key}", web::get().to(legacy_get_user))
        .route("/all_users_names/{admin_key}", web::get().to(legacy_all_usernames))
        .route("/all_users_ids/{admin_key}", web::get().to(legacy_all_user_ids))
        .route("/token", web::get().to(issue_token));
}

/// Register a user
///
/// POST /api/users
///
/// Request body:
/// ```json
/// { "username": "string", "password": "string" }
/// ```
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let (username, password) = match (&req.username, &req.password) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(ApiError::Validation(
                "username and password are required".to_string(),
            ))
        }
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for signup request: {:?}", errors);
        return Err(ApiError::Validation(errors.to_string()));
    }

    if state.auth.is_reserved(username) {
        tracing::warn!("Rejected self-registration of admin name {}", username);
        return Err(ApiError::Validation(format!(
            "username '{}' is reserved",
            username
        )));
    }

    let hash = state.auth.passwords().hash(password)?;
    let user = state.users.create_user(username, &hash).await?;

    tracing::info!("Registered user {} (id {})", user.username, user.id);

    Ok(HttpResponse::Created().json(UsernameResponse {
        username: user.username,
    }))
}

/// GET /api/users/{id}
async fn get_user(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    lookup_user(&state, path.into_inner()).await
}

/// GET /api/all_users_names
async fn all_usernames(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.users.list_usernames().await?))
}

/// GET /api/all_users_ids
async fn all_user_ids(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.users.list_ids().await?))
}

async fn legacy_get_user(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, key) = path.into_inner();
    check_path_key(&state, &key)?;
    lookup_user(&state, id).await
}

async fn legacy_all_usernames(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    check_path_key(&state, &path)?;
    Ok(HttpResponse::Ok().json(state.users.list_usernames().await?))
}

async fn legacy_all_user_ids(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    check_path_key(&state, &path)?;
    Ok(HttpResponse::Ok().json(state.users.list_ids().await?))
}

/// Issue a signed token for the caller
///
/// GET /api/token
async fn issue_token(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let tokens = state.auth.tokens();
    let token = tokens.issue(user.id)?;

    tracing::debug!("Issued token for user {}", user.username);

    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        duration: tokens.ttl_secs(),
    }))
}

async fn lookup_user(state: &AppState, id: i64) -> Result<HttpResponse, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no user with id {}", id)))?;

    Ok(HttpResponse::Ok().json(UsernameResponse {
        username: user.username,
    }))
}

/// Admin secret carried in the URL path
///
/// Plain string equality against configuration, kept only for old
/// clients. Disabled unless `auth.allow_path_key` is set.
fn check_path_key(state: &AppState, key: &str) -> Result<(), ApiError> {
    match &state.legacy_admin_key {
        None => Err(ApiError::NotFound("There has been an error".to_string())),
        Some(expected) if expected == key => {
            tracing::warn!("Admin endpoint accessed with URL path key; switch to an admin account");
            Ok(())
        }
        Some(_) => Err(ApiError::Forbidden),
    }
}
