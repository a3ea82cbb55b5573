use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use reelhub_db::models::{Subscription, User};

use super::base::{BaseDao, DaoError, DaoResult};

/// Profile fields taken from the identity provider when a user first signs in.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
}

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(&self, new_user: NewUser) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            external_id: new_user.external_id,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            image: new_user.image,
            first_view: false,
            subscription: Subscription::default(),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "external_id": external_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Case-insensitive substring match over first name, last name and email,
    /// excluding `exclude`.
    pub async fn search(&self, query: &str, exclude: ObjectId) -> DaoResult<Vec<User>> {
        let pattern = escape_regex(query.trim());
        let needle = doc! { "$regex": pattern, "$options": "i" };

        self.base
            .find_many(
                doc! {
                    "_id": { "$ne": exclude },
                    "$or": [
                        { "first_name": needle.clone() },
                        { "last_name": needle.clone() },
                        { "email": needle },
                    ],
                },
                Some(doc! { "first_name": 1, "last_name": 1 }),
            )
            .await
    }

    pub async fn set_first_view(&self, user_id: ObjectId, enabled: bool) -> DaoResult<bool> {
        self.base
            .update_by_id(user_id, doc! { "$set": { "first_view": enabled } })
            .await?;
        Ok(enabled)
    }
}

/// Escapes regex metacharacters so user input is matched literally.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
