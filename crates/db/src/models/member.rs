use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Links a user to a workspace they were invited into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub workspace_id: ObjectId,
    pub user_id: ObjectId,
    pub created_at: DateTime,
}

impl Member {
    pub const COLLECTION: &'static str = "members";
}
