use axum::extract::{Path, State};
use reelhub_services::dao::folder::FolderWithCount;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{hex, parse_object_id, rfc3339};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::ApiJson},
    response::ActionResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub workspace_id: String,
    pub video_count: u64,
    pub created_at: String,
    /// Echo of the client's optimistic-update nonce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl FolderResponse {
    fn from_counted(f: FolderWithCount, nonce: Option<String>) -> Self {
        Self {
            id: hex(f.folder.id),
            name: f.folder.name,
            workspace_id: f.folder.workspace_id.to_hex(),
            video_count: f.video_count,
            created_at: rfc3339(f.folder.created_at),
            nonce,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: Option<String>,
    pub nonce: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenameFolderRequest {
    #[validate(length(min = 1, max = 100, message = "Folder name cannot be empty"))]
    pub name: String,
    pub nonce: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(workspace_id): Path<String>,
) -> Result<ActionResponse<Vec<FolderResponse>>, ApiError> {
    let wid = parse_object_id(&workspace_id, "workspace_id")?;
    state.workspaces.find_accessible(wid, auth.user_id).await?;

    let folders: Vec<FolderResponse> = state
        .folders
        .list_with_counts(wid)
        .await?
        .into_iter()
        .map(|f| FolderResponse::from_counted(f, None))
        .collect();

    if folders.is_empty() {
        return Ok(ActionResponse::not_found(folders));
    }
    Ok(ActionResponse::ok(folders))
}

/// Creates a folder, named "Untitled" unless the body says otherwise.
pub async fn create(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(workspace_id): Path<String>,
    ApiJson(body): ApiJson<CreateFolderRequest>,
) -> Result<ActionResponse<FolderResponse>, ApiError> {
    let wid = parse_object_id(&workspace_id, "workspace_id")?;
    state.workspaces.find_accessible(wid, auth.user_id).await?;

    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let folder = state.folders.create(wid, name).await?;

    Ok(ActionResponse::created(FolderResponse::from_counted(
        FolderWithCount {
            folder,
            video_count: 0,
        },
        body.nonce,
    ))
    .with_message("New folder created"))
}

pub async fn info(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(folder_id): Path<String>,
) -> Result<ActionResponse<FolderResponse>, ApiError> {
    let fid = parse_object_id(&folder_id, "folder_id")?;

    let counted = state.folders.find_with_count(fid).await?;
    state
        .workspaces
        .find_accessible(counted.folder.workspace_id, auth.user_id)
        .await?;

    Ok(ActionResponse::ok(FolderResponse::from_counted(counted, None)))
}

pub async fn rename(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(folder_id): Path<String>,
    ApiJson(body): ApiJson<RenameFolderRequest>,
) -> Result<ActionResponse<FolderResponse>, ApiError> {
    body.validate()?;
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Folder name cannot be empty".to_string()));
    }

    let fid = parse_object_id(&folder_id, "folder_id")?;
    let existing = state.folders.base.find_by_id(fid).await?;
    state
        .workspaces
        .find_accessible(existing.workspace_id, auth.user_id)
        .await?;

    state.folders.rename(fid, name).await?;
    let counted = state.folders.find_with_count(fid).await?;

    Ok(ActionResponse::ok(FolderResponse::from_counted(counted, body.nonce))
        .with_message("Folder renamed"))
}
