use std::collections::HashMap;

use axum::extract::{Path, State};
use bson::{doc, oid::ObjectId};
use reelhub_db::models::{Folder, User, Video};
use reelhub_services::dao::base::DaoError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{hex, parse_object_id, rfc3339};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::ApiJson},
    response::ActionResponse,
    state::AppState,
};

#[derive(Debug, Clone, Serialize)]
pub struct FolderSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(u: &User) -> Self {
        Self {
            id: hex(u.id),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            image: u.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub title: Option<String>,
    pub source: String,
    pub workspace_id: String,
    pub folder_id: Option<String>,
    pub processing: bool,
    pub views: u64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
}

impl VideoResponse {
    fn new(v: Video, folder: Option<FolderSummary>, author: Option<AuthorSummary>) -> Self {
        Self {
            id: hex(v.id),
            title: v.title,
            source: v.source,
            workspace_id: v.workspace_id.to_hex(),
            folder_id: v.folder_id.map(|id| id.to_hex()),
            processing: v.processing,
            views: v.views,
            created_at: rfc3339(v.created_at),
            folder,
            author,
        }
    }
}

impl From<Video> for VideoResponse {
    fn from(v: Video) -> Self {
        Self::new(v, None, None)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Video source is required"))]
    pub source: String,
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveVideoRequest {
    pub workspace_id: String,
    pub folder_id: Option<String>,
}

/// Videos under a workspace or folder id, oldest first.
pub async fn list(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(container_id): Path<String>,
) -> Result<ActionResponse<Vec<VideoResponse>>, ApiError> {
    let cid = parse_object_id(&container_id, "workspace_id")?;

    let workspace_id = match state.workspaces.base.find_by_id(cid).await {
        Ok(_) => cid,
        Err(DaoError::NotFound) => state.folders.base.find_by_id(cid).await?.workspace_id,
        Err(e) => return Err(e.into()),
    };
    state.workspaces.find_accessible(workspace_id, auth.user_id).await?;

    let videos = state.videos.find_in_container(cid).await?;
    if videos.is_empty() {
        return Ok(ActionResponse::not_found(Vec::new()));
    }

    let mut folder_ids: Vec<ObjectId> = videos.iter().filter_map(|v| v.folder_id).collect();
    folder_ids.sort();
    folder_ids.dedup();
    let mut owner_ids: Vec<ObjectId> = videos.iter().map(|v| v.owner_id).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let folders: HashMap<ObjectId, FolderSummary> = state
        .folders
        .base
        .find_many(doc! { "_id": { "$in": folder_ids } }, None)
        .await?
        .into_iter()
        .filter_map(|f: Folder| {
            f.id.map(|id| (id, FolderSummary { id: id.to_hex(), name: f.name }))
        })
        .collect();
    let authors: HashMap<ObjectId, AuthorSummary> = state
        .users
        .base
        .find_many(doc! { "_id": { "$in": owner_ids } }, None)
        .await?
        .iter()
        .filter_map(|u: &User| u.id.map(|id| (id, AuthorSummary::from(u))))
        .collect();

    let response = videos
        .into_iter()
        .map(|video| {
            let folder = video.folder_id.and_then(|fid| folders.get(&fid).cloned());
            let author = authors.get(&video.owner_id).cloned();
            VideoResponse::new(video, folder, author)
        })
        .collect();

    Ok(ActionResponse::ok(response))
}

/// Registers an uploaded recording in a workspace, optionally inside one
/// of its folders.
pub async fn create(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(workspace_id): Path<String>,
    ApiJson(body): ApiJson<CreateVideoRequest>,
) -> Result<ActionResponse<VideoResponse>, ApiError> {
    body.validate()?;

    let wid = parse_object_id(&workspace_id, "workspace_id")?;
    state.workspaces.find_accessible(wid, auth.user_id).await?;
    let folder_id = folder_in_workspace(&state, body.folder_id.as_deref(), wid).await?;

    let video = state
        .videos
        .create(auth.user_id, wid, folder_id, body.title, body.source)
        .await?;

    Ok(ActionResponse::created(VideoResponse::from(video)))
}

pub async fn move_location(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(video_id): Path<String>,
    ApiJson(body): ApiJson<MoveVideoRequest>,
) -> Result<ActionResponse<VideoResponse>, ApiError> {
    let vid = parse_object_id(&video_id, "video_id")?;
    let wid = parse_object_id(&body.workspace_id, "workspace_id")?;

    state.workspaces.find_accessible(wid, auth.user_id).await?;
    let folder_id = folder_in_workspace(&state, body.folder_id.as_deref(), wid).await?;

    let video = state
        .videos
        .move_location(vid, auth.user_id, wid, folder_id)
        .await?;

    Ok(ActionResponse::ok(VideoResponse::from(video)).with_message("Folder changed successfully"))
}

async fn folder_in_workspace(
    state: &AppState,
    raw: Option<&str>,
    workspace_id: ObjectId,
) -> Result<Option<ObjectId>, ApiError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let fid = parse_object_id(raw, "folder_id")?;
    let folder = state.folders.base.find_by_id(fid).await?;
    if folder.workspace_id != workspace_id {
        return Err(ApiError::BadRequest(
            "Folder belongs to another workspace".to_string(),
        ));
    }
    Ok(Some(fid))
}
