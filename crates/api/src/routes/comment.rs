use axum::extract::{Path, State};
use reelhub_services::dao::comment::{CommentThread, CommentWithAuthor};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{hex, parse_object_id, rfc3339, video::AuthorSummary};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::ApiJson},
    response::ActionResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub comment: String,
    pub video_id: String,
    pub parent_id: Option<String>,
    pub created_at: String,
    pub author: Option<AuthorSummary>,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            id: hex(c.comment.id),
            comment: c.comment.comment,
            video_id: c.comment.video_id.to_hex(),
            parent_id: c.comment.parent_id.map(|id| id.to_hex()),
            created_at: rfc3339(c.comment.created_at),
            author: c.author.as_ref().map(AuthorSummary::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    #[serde(flatten)]
    pub root: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentThread> for ThreadResponse {
    fn from(t: CommentThread) -> Self {
        Self {
            root: CommentResponse::from(t.root),
            replies: t.replies.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment cannot be empty"))]
    pub comment: String,
    pub parent_id: Option<String>,
}

/// Root comments of a video with their replies. A reply id yields an empty
/// list.
pub async fn thread(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> Result<ActionResponse<Vec<ThreadResponse>>, ApiError> {
    let tid = parse_object_id(&target_id, "video_id")?;

    let threads = state
        .comments
        .find_thread(tid)
        .await?
        .into_iter()
        .map(ThreadResponse::from)
        .collect();

    Ok(ActionResponse::ok(threads))
}

pub async fn create(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(video_id): Path<String>,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> Result<ActionResponse<CommentResponse>, ApiError> {
    body.validate()?;
    let text = body.comment.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Comment cannot be empty".to_string()));
    }

    let vid = parse_object_id(&video_id, "video_id")?;
    let parent_id = match body.parent_id.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_object_id(raw, "parent_id")?),
        None => None,
    };

    state.videos.base.find_by_id(vid).await?;

    let comment = state
        .comments
        .create(vid, auth.user_id, text, parent_id)
        .await?;

    Ok(ActionResponse::created(CommentResponse::from(CommentWithAuthor {
        comment,
        author: Some(auth.user),
    })))
}
