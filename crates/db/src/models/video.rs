use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Storage key of the uploaded recording.
    pub source: String,
    pub workspace_id: ObjectId,
    pub folder_id: Option<ObjectId>,
    pub owner_id: ObjectId,
    #[serde(default = "bool_true")]
    pub processing: bool,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Video {
    pub const COLLECTION: &'static str = "videos";
}
