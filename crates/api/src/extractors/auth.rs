use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use bson::oid::ObjectId;
use reelhub_db::models::User;
use reelhub_services::dao::base::DaoError;

use crate::{error::ApiError, state::AppState};

/// Cookie the identity provider sets for browser sessions.
pub const SESSION_COOKIE: &str = "__session";

/// The caller as asserted by the identity provider's session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub external_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
}

impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = session_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthenticated("Sign in required".to_string()))?;

        let claims = app_state.auth.verify_session_token(&token)?;

        Ok(Identity {
            external_id: claims.sub,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            image: claims.image_url,
        })
    }
}

/// The local user record behind the session. Callers that signed in at the
/// provider but never hit the auth callback are treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: ObjectId,
    pub user: User,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let user = match app_state.users.find_by_external_id(&identity.external_id).await {
            Ok(user) => user,
            Err(DaoError::NotFound) => {
                return Err(ApiError::Unauthenticated("User not found".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let user_id = user
            .id
            .ok_or_else(|| ApiError::Internal("User without id".to_string()))?;

        Ok(CurrentUser { user_id, user })
    }
}

/// Bearer token from the Authorization header, falling back to the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix(SESSION_COOKIE)
                            .and_then(|rest| rest.strip_prefix('='))
                            .map(|s| s.to_string())
                    })
                })
        })
        .filter(|token| !token.is_empty())
}
