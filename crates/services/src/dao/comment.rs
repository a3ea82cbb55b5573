use std::collections::HashMap;

use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use reelhub_db::models::{Comment, User};

use super::base::{BaseDao, DaoError, DaoResult};

#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Option<User>,
}

/// A root comment and its direct replies, oldest first.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub root: CommentWithAuthor,
    pub replies: Vec<CommentWithAuthor>,
}

pub struct CommentDao {
    pub base: BaseDao<Comment>,
    users: BaseDao<User>,
}

impl CommentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Comment::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Adds a root comment, or a reply when `parent_id` is given. A reply must
    /// target a root comment on the same video.
    pub async fn create(
        &self,
        video_id: ObjectId,
        user_id: ObjectId,
        text: String,
        parent_id: Option<ObjectId>,
    ) -> DaoResult<Comment> {
        if let Some(parent_id) = parent_id {
            let parent = self.base.find_by_id(parent_id).await?;
            if parent.is_reply() {
                return Err(DaoError::Validation(
                    "Replies cannot have replies".to_string(),
                ));
            }
            if parent.video_id != video_id {
                return Err(DaoError::Validation(
                    "Parent comment belongs to another video".to_string(),
                ));
            }
        }

        let comment = Comment {
            id: None,
            comment: text,
            video_id,
            parent_id,
            user_id,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&comment).await?;
        self.base.find_by_id(id).await
    }

    /// Root comments of `target_id` with their replies. A reply's id yields
    /// no threads since replies are not threadable themselves.
    pub async fn find_thread(&self, target_id: ObjectId) -> DaoResult<Vec<CommentThread>> {
        let roots = self
            .base
            .find_many(
                doc! { "video_id": target_id, "parent_id": null },
                Some(doc! { "created_at": 1, "_id": 1 }),
            )
            .await?;

        if roots.is_empty() {
            return Ok(Vec::new());
        }

        let root_ids: Vec<ObjectId> = roots.iter().filter_map(|c| c.id).collect();
        let replies = self
            .base
            .find_many(
                doc! { "parent_id": { "$in": &root_ids } },
                Some(doc! { "created_at": 1, "_id": 1 }),
            )
            .await?;

        let mut author_ids: Vec<ObjectId> = roots
            .iter()
            .chain(replies.iter())
            .map(|c| c.user_id)
            .collect();
        author_ids.sort();
        author_ids.dedup();

        let authors: HashMap<ObjectId, User> = self
            .users
            .find_many(doc! { "_id": { "$in": author_ids } }, None)
            .await?
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u)))
            .collect();

        Ok(assemble_threads(roots, replies, &authors))
    }
}

/// Groups `replies` under their parent in `roots`, keeping both input orders.
/// Replies whose parent is not among `roots` are dropped.
pub fn assemble_threads(
    roots: Vec<Comment>,
    replies: Vec<Comment>,
    authors: &HashMap<ObjectId, User>,
) -> Vec<CommentThread> {
    let with_author = |comment: Comment| CommentWithAuthor {
        author: authors.get(&comment.user_id).cloned(),
        comment,
    };

    let mut by_parent: HashMap<ObjectId, Vec<CommentWithAuthor>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.parent_id {
            by_parent.entry(parent_id).or_default().push(with_author(reply));
        }
    }

    roots
        .into_iter()
        .filter(|root| !root.is_reply())
        .map(|root| {
            let replies = root
                .id
                .and_then(|id| by_parent.remove(&id))
                .unwrap_or_default();
            CommentThread {
                root: with_author(root),
                replies,
            }
        })
        .collect()
}
