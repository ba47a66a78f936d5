//! Request extractors that run the auth gate.

use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use crate::error::ApiError;
use crate::models::User;
use crate::routes::AppState;

/// A request whose Basic credentials resolved to a user
///
/// The user is also stored in the request extensions for anything further
/// down the pipeline.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate_request(&req).await.map(AuthenticatedUser) })
    }
}

/// An authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate_request(&req).await?;
            let state = app_state(&req)?;

            if !state.auth.is_admin(&user) {
                tracing::warn!("User {} denied admin access to {}", user.username, req.path());
                return Err(ApiError::Forbidden);
            }
            Ok(AdminUser(user))
        })
    }
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, ApiError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))
}

async fn authenticate_request(req: &HttpRequest) -> Result<User, ApiError> {
    let state = app_state(req)?;

    let credentials = Authorization::<Basic>::parse(req).map_err(|_| ApiError::Unauthorized)?;
    let basic = credentials.as_ref();

    let user = state
        .auth
        .authenticate(basic.user_id(), basic.password())
        .await
        .map_err(|e| {
            tracing::debug!("Authentication failed on {}: {}", req.path(), e);
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(user.clone());
    Ok(user)
}
