//! Optional JWT authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fedtube_core::error::CoreError;
use fedtube_core::roles::{Identity, Role};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller of a read endpoint: `None` when no `Authorization` header was
/// sent.
///
/// A header that is present but malformed, or carries an invalid or expired
/// token, is rejected with 401 rather than downgraded to anonymous.
///
/// ```ignore
/// async fn my_handler(Requester(identity): Requester) -> AppResult<Json<()>> {
///     let scope = resolve_visibility(target_id, identity.as_ref(), VisibilityPolicy::Listing);
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Requester(pub Option<Identity>);

impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get("authorization") else {
            return Ok(Requester(None));
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Unknown role names get no extra rights.
        let role = Role::parse(&claims.role).unwrap_or(Role::User);

        Ok(Requester(Some(Identity::new(claims.sub, role))))
    }
}
