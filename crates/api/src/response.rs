use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The `{status, data?, message?}` shape every action answers with.
/// The HTTP status always equals `status`.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn new(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            data,
            message: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data))
    }

    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, Some(data))
    }

    /// 404 that still carries (usually empty) data, for list actions.
    pub fn not_found(data: T) -> Self {
        Self::new(StatusCode::NOT_FOUND, Some(data))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ActionResponse<()> {
    pub fn message_only(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
