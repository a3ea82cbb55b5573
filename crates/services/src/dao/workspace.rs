use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use reelhub_db::models::{Member, Workspace, WorkspaceType};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct WorkspaceDao {
    pub base: BaseDao<Workspace>,
    pub members: BaseDao<Member>,
}

impl WorkspaceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Workspace::COLLECTION),
            members: BaseDao::new(db, Member::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        workspace_type: WorkspaceType,
        owner_id: ObjectId,
    ) -> DaoResult<Workspace> {
        let now = DateTime::now();
        let workspace = Workspace {
            id: None,
            name,
            workspace_type,
            owner_id,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&workspace).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_owned(&self, owner_id: ObjectId) -> DaoResult<Vec<Workspace>> {
        self.base
            .find_many(
                doc! { "owner_id": owner_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }

    /// Workspaces the user joined through an accepted invite.
    pub async fn find_joined(&self, user_id: ObjectId) -> DaoResult<Vec<Workspace>> {
        let memberships = self
            .members
            .find_many(doc! { "user_id": user_id }, None)
            .await?;

        let workspace_ids: Vec<ObjectId> = memberships.iter().map(|m| m.workspace_id).collect();

        if workspace_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.base
            .find_many(
                doc! { "_id": { "$in": workspace_ids } },
                Some(doc! { "name": 1 }),
            )
            .await
    }

    pub async fn is_member(
        &self,
        workspace_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<bool> {
        let count = self
            .members
            .count(doc! { "workspace_id": workspace_id, "user_id": user_id })
            .await?;
        Ok(count > 0)
    }

    /// Returns the workspace when `user_id` owns it or is a member of it.
    pub async fn find_accessible(
        &self,
        workspace_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Workspace> {
        let workspace = self.base.find_by_id(workspace_id).await?;

        if workspace.owner_id == user_id || self.is_member(workspace_id, user_id).await? {
            Ok(workspace)
        } else {
            Err(DaoError::Forbidden("No access to this workspace".to_string()))
        }
    }
}
