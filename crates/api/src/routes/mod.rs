pub mod auth;
pub mod comment;
pub mod folder;
pub mod invite;
pub mod user;
pub mod video;
pub mod workspace;

use bson::oid::ObjectId;

use crate::error::ApiError;

pub(crate) fn parse_object_id(raw: &str, name: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {name}")))
}

pub(crate) fn rfc3339(dt: bson::DateTime) -> String {
    dt.try_to_rfc3339_string().unwrap_or_default()
}

pub(crate) fn hex(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
