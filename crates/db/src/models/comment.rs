use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A root comment on a video, or a reply when `parent_id` is set.
///
/// Replies carry the same `video_id` as their parent and never have
/// replies of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub comment: String,
    pub video_id: ObjectId,
    pub parent_id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub created_at: DateTime,
}

impl Comment {
    pub const COLLECTION: &'static str = "comments";

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}
