use bson::{doc, oid::ObjectId, Bson, DateTime};
use mongodb::Database;
use reelhub_db::models::Video;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct VideoDao {
    pub base: BaseDao<Video>,
}

impl VideoDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Video::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        owner_id: ObjectId,
        workspace_id: ObjectId,
        folder_id: Option<ObjectId>,
        title: Option<String>,
        source: String,
    ) -> DaoResult<Video> {
        let now = DateTime::now();
        let video = Video {
            id: None,
            title,
            description: None,
            source,
            workspace_id,
            folder_id,
            owner_id,
            processing: true,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&video).await?;
        self.base.find_by_id(id).await
    }

    /// Videos placed directly in a workspace, or in a folder, under the same id.
    pub async fn find_in_container(&self, container_id: ObjectId) -> DaoResult<Vec<Video>> {
        self.base
            .find_many(
                doc! {
                    "$or": [
                        { "workspace_id": container_id },
                        { "folder_id": container_id },
                    ]
                },
                Some(doc! { "created_at": 1, "_id": 1 }),
            )
            .await
    }

    /// Moves a video the caller owns. `folder_id = None` places it at the
    /// workspace root.
    pub async fn move_location(
        &self,
        video_id: ObjectId,
        owner_id: ObjectId,
        workspace_id: ObjectId,
        folder_id: Option<ObjectId>,
    ) -> DaoResult<Video> {
        let video = self.base.find_by_id(video_id).await?;
        if video.owner_id != owner_id {
            return Err(DaoError::Forbidden("Only the owner can move this video".to_string()));
        }

        let folder = folder_id.map(Bson::ObjectId).unwrap_or(Bson::Null);
        self.base
            .update_by_id(
                video_id,
                doc! { "$set": { "workspace_id": workspace_id, "folder_id": folder } },
            )
            .await?;
        self.base.find_by_id(video_id).await
    }
}
