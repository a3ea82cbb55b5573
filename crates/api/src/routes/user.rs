use axum::extract::State;
use reelhub_db::models::{Notification, Plan, User};
use serde::{Deserialize, Serialize};

use super::{hex, rfc3339};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::{ApiJson, ApiQuery}},
    response::ActionResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    pub plan: Plan,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: hex(user.id),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            image: user.image,
            plan: user.subscription.plan,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub content: String,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: hex(n.id),
            content: n.content,
            created_at: rfc3339(n.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct FirstViewRequest {
    pub enabled: bool,
}

pub async fn profile(auth: CurrentUser) -> Result<ActionResponse<ProfileResponse>, ApiError> {
    Ok(ActionResponse::ok(ProfileResponse {
        id: auth.user_id.to_hex(),
        image: auth.user.image,
    }))
}

pub async fn notifications(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<ActionResponse<NotificationsResponse>, ApiError> {
    let notifications: Vec<NotificationResponse> = state
        .notifications
        .find_for_user(auth.user_id)
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    let response = NotificationsResponse {
        count: notifications.len(),
        notifications,
    };

    if response.count == 0 {
        return Ok(ActionResponse::not_found(response));
    }
    Ok(ActionResponse::ok(response))
}

/// Finds people to invite. The caller is never part of the result.
pub async fn search(
    State(state): State<AppState>,
    auth: CurrentUser,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<ActionResponse<Vec<UserResponse>>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(ApiError::BadRequest("Search query cannot be empty".to_string()));
    }

    let users: Vec<UserResponse> = state
        .users
        .search(&params.query, auth.user_id)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    if users.is_empty() {
        return Ok(ActionResponse::not_found(users));
    }
    Ok(ActionResponse::ok(users))
}

pub async fn first_view(auth: CurrentUser) -> Result<ActionResponse<bool>, ApiError> {
    Ok(ActionResponse::ok(auth.user.first_view))
}

pub async fn set_first_view(
    State(state): State<AppState>,
    auth: CurrentUser,
    ApiJson(body): ApiJson<FirstViewRequest>,
) -> Result<ActionResponse<bool>, ApiError> {
    let enabled = state.users.set_first_view(auth.user_id, body.enabled).await?;
    Ok(ActionResponse::ok(enabled).with_message("Setting updated"))
}
