use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use reelhub_db::models::{Folder, Video};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct FolderWithCount {
    pub folder: Folder,
    pub video_count: u64,
}

pub struct FolderDao {
    pub base: BaseDao<Folder>,
    videos: BaseDao<Video>,
}

impl FolderDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Folder::COLLECTION),
            videos: BaseDao::new(db, Video::COLLECTION),
        }
    }

    pub async fn create(&self, workspace_id: ObjectId, name: Option<String>) -> DaoResult<Folder> {
        let now = DateTime::now();
        let folder = Folder {
            id: None,
            name: name.unwrap_or_else(|| Folder::DEFAULT_NAME.to_string()),
            workspace_id,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&folder).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list_with_counts(&self, workspace_id: ObjectId) -> DaoResult<Vec<FolderWithCount>> {
        let folders = self
            .base
            .find_many(
                doc! { "workspace_id": workspace_id },
                Some(doc! { "created_at": 1, "_id": 1 }),
            )
            .await?;

        let mut result = Vec::with_capacity(folders.len());
        for folder in folders {
            let video_count = self.video_count(folder.id.ok_or(DaoError::NotFound)?).await?;
            result.push(FolderWithCount { folder, video_count });
        }
        Ok(result)
    }

    pub async fn find_with_count(&self, folder_id: ObjectId) -> DaoResult<FolderWithCount> {
        let folder = self.base.find_by_id(folder_id).await?;
        let video_count = self.video_count(folder_id).await?;
        Ok(FolderWithCount { folder, video_count })
    }

    pub async fn rename(&self, folder_id: ObjectId, name: String) -> DaoResult<Folder> {
        self.base
            .update_by_id(folder_id, doc! { "$set": { "name": name } })
            .await?;
        self.base.find_by_id(folder_id).await
    }

    async fn video_count(&self, folder_id: ObjectId) -> DaoResult<u64> {
        self.videos.count(doc! { "folder_id": folder_id }).await
    }
}
