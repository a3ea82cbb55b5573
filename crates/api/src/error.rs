use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reelhub_services::InviteError;
use reelhub_services::auth::AuthError;
use reelhub_services::dao::base::DaoError;
use tracing::{debug, error};

use crate::response::ActionResponse;

#[derive(Debug)]
pub enum ApiError {
    /// No resolvable caller identity.
    Unauthenticated(String),
    /// Caller resolved but not entitled to the target.
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_message(self) -> String {
        match self {
            ApiError::Unauthenticated(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        ActionResponse::message_only(status, self.into_message()).into_response()
    }
}

impl From<DaoError> for ApiError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DaoError::DuplicateKey(msg) => ApiError::BadRequest(msg),
            DaoError::Conflict(msg) => ApiError::BadRequest(msg),
            DaoError::Forbidden(msg) => ApiError::Unauthorized(msg),
            DaoError::Validation(msg) => ApiError::BadRequest(msg),
            DaoError::Mongo(_) | DaoError::BsonSer(_) | DaoError::BsonDe(_) => {
                error!(error = %err, "Storage error");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiError::Unauthenticated("Session expired".to_string()),
            AuthError::InvalidToken(_) => ApiError::Unauthenticated("Invalid session".to_string()),
        }
    }
}

impl From<InviteError> for ApiError {
    fn from(err: InviteError) -> Self {
        match err {
            InviteError::WorkspaceNotFound
            | InviteError::ReceiverNotFound
            | InviteError::NotFound => ApiError::NotFound(err.to_string()),
            InviteError::NotAllowed | InviteError::Unauthorized => {
                ApiError::Unauthorized(err.to_string())
            }
            InviteError::AlreadyAccepted => ApiError::BadRequest(err.to_string()),
            InviteError::InviteFailed(ref source) | InviteError::AcceptFailed(ref source) => {
                error!(error = %source, "{err}");
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        let message = match rejection {
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON body",
            _ => "Invalid request body",
        };
        ApiError::BadRequest(message.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected query string");
        ApiError::BadRequest("Invalid query parameters".to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_values()
            .flatten()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| err.to_string());
        ApiError::BadRequest(message)
    }
}
