use axum::extract::{Path, State};
use reelhub_db::models::{Plan, Workspace, WorkspaceType};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{hex, parse_object_id};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::ApiJson},
    response::ActionResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub workspace_type: WorkspaceType,
    pub owner_id: String,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(w: Workspace) -> Self {
        Self {
            id: hex(w.id),
            name: w.name,
            workspace_type: w.workspace_type,
            owner_id: w.owner_id.to_hex(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkspacesResponse {
    pub plan: Plan,
    pub workspaces: Vec<WorkspaceResponse>,
    pub members: Vec<WorkspaceResponse>,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub workspace: WorkspaceResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    #[validate(length(min = 1, max = 100, message = "Workspace name cannot be empty"))]
    pub name: String,
}

/// Owned workspaces plus the ones joined through invites.
pub async fn list(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<ActionResponse<WorkspacesResponse>, ApiError> {
    let owned = state.workspaces.find_owned(auth.user_id).await?;
    let joined = state.workspaces.find_joined(auth.user_id).await?;

    Ok(ActionResponse::ok(WorkspacesResponse {
        plan: auth.user.subscription.plan,
        workspaces: owned.into_iter().map(WorkspaceResponse::from).collect(),
        members: joined.into_iter().map(WorkspaceResponse::from).collect(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    auth: CurrentUser,
    ApiJson(body): ApiJson<CreateWorkspaceRequest>,
) -> Result<ActionResponse<WorkspaceResponse>, ApiError> {
    body.validate()?;
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Workspace name cannot be empty".to_string()));
    }

    let workspace = state
        .workspaces
        .create(name, WorkspaceType::Public, auth.user_id)
        .await?;

    Ok(ActionResponse::created(WorkspaceResponse::from(workspace)).with_message("Workspace created"))
}

pub async fn verify_access(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(workspace_id): Path<String>,
) -> Result<ActionResponse<AccessResponse>, ApiError> {
    let wid = parse_object_id(&workspace_id, "workspace_id")?;

    let workspace = state.workspaces.find_accessible(wid, auth.user_id).await?;

    Ok(ActionResponse::ok(AccessResponse {
        workspace: WorkspaceResponse::from(workspace),
    }))
}
