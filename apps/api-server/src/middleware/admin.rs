//! Admin authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use quill_core::ports::AuthError;

use super::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the admin key.
///
/// Put it first in an admin handler's arguments so the key is checked
/// before the body is read:
/// ```ignore
/// async fn publish_post(_admin: AdminGuard, state: web::Data<AppState>) -> AppResult<HttpResponse> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl FromRequest for AdminGuard {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<AdminGuard, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState not found in app data".to_string()))?;

    let admin = state.admin.as_ref().ok_or(AuthError::NotConfigured)?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    // Parse "Bearer <key>"
    let key = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidCredentials)?;

    if admin.hasher.verify(key, &admin.hash)? {
        Ok(AdminGuard)
    } else {
        tracing::warn!(path = req.path(), "Rejected admin request with a wrong key");
        Err(AuthError::InvalidCredentials.into())
    }
}
