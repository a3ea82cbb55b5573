use axum::extract::State;
use reelhub_db::models::{User, WorkspaceType};
use reelhub_services::dao::{base::DaoError, user::NewUser};
use serde::Serialize;
use tracing::info;

use super::{user::UserResponse, workspace::WorkspaceResponse};
use crate::{
    error::ApiError, extractors::auth::Identity, response::ActionResponse, state::AppState,
};

#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    pub user: UserResponse,
    pub workspaces: Vec<WorkspaceResponse>,
}

/// Called after the provider signs a user in. Returns the local record,
/// creating it with a personal workspace on first sign-in (201).
pub async fn callback(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<ActionResponse<AuthenticatedUser>, ApiError> {
    match state.users.find_by_external_id(&identity.external_id).await {
        Ok(user) => Ok(ActionResponse::ok(authenticated(&state, user).await?)),
        Err(DaoError::NotFound) => onboard(&state, identity).await,
        Err(e) => Err(e.into()),
    }
}

async fn onboard(
    state: &AppState,
    identity: Identity,
) -> Result<ActionResponse<AuthenticatedUser>, ApiError> {
    let external_id = identity.external_id.clone();
    let created = state
        .users
        .create(NewUser {
            external_id: identity.external_id,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            image: identity.image,
        })
        .await;

    let user = match created {
        Ok(user) => user,
        // A concurrent callback for the same identity won the insert.
        Err(DaoError::DuplicateKey(_)) => {
            let user = state.users.find_by_external_id(&external_id).await?;
            return Ok(ActionResponse::ok(authenticated(state, user).await?));
        }
        Err(e) => return Err(e.into()),
    };

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("User without id".to_string()))?;
    let workspace_name = format!(
        "{}'s Workspace",
        user.first_name.as_deref().unwrap_or("My")
    );
    state
        .workspaces
        .create(workspace_name, WorkspaceType::Personal, user_id)
        .await?;

    info!(%user_id, %external_id, "Onboarded new user");

    Ok(ActionResponse::created(authenticated(state, user).await?))
}

async fn authenticated(state: &AppState, user: User) -> Result<AuthenticatedUser, ApiError> {
    let workspaces = match user.id {
        Some(user_id) => state.workspaces.find_owned(user_id).await?,
        None => Vec::new(),
    };

    Ok(AuthenticatedUser {
        user: UserResponse::from(user),
        workspaces: workspaces.into_iter().map(WorkspaceResponse::from).collect(),
    })
}
