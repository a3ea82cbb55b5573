use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use reelhub_db::models::Notification;

use super::base::{BaseDao, DaoResult};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    pub async fn create(&self, user_id: ObjectId, content: String) -> DaoResult<Notification> {
        let notification = Notification {
            id: None,
            user_id,
            content,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&notification).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_user(&self, user_id: ObjectId) -> DaoResult<Vec<Notification>> {
        self.base
            .find_many(
                doc! { "user_id": user_id },
                Some(doc! { "created_at": -1, "_id": -1 }),
            )
            .await
    }
}
