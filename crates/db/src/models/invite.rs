use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// An offer from `sender_id` for `receiver_id` to join `workspace_id`.
///
/// `accepted` only ever moves from `false` to `true`, together with the
/// insert of the matching [`Member`](super::Member).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub sender_id: ObjectId,
    pub receiver_id: ObjectId,
    pub workspace_id: ObjectId,
    pub content: String,
    #[serde(default)]
    pub accepted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Invite {
    pub const COLLECTION: &'static str = "invites";
}
