use bson::{doc, oid::ObjectId, Document};
use mongodb::{ClientSession, Collection, Database};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Validation: {0}")]
    Validation(String),
}

pub type DaoResult<T> = Result<T, DaoError>;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Maps unique-index violations to [`DaoError::DuplicateKey`].
pub(crate) fn map_write_error(e: mongodb::error::Error) -> DaoError {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
        ref write_error,
    )) = *e.kind
    {
        if write_error.code == DUPLICATE_KEY_CODE {
            return DaoError::DuplicateKey(write_error.message.clone());
        }
    }
    DaoError::Mongo(e)
}

fn inserted_object_id(inserted: bson::Bson) -> DaoResult<ObjectId> {
    inserted
        .as_object_id()
        .ok_or_else(|| DaoError::Validation("inserted_id is not an ObjectId".to_string()))
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DaoResult<Vec<T>> {
        let mut cursor = if let Some(sort) = sort {
            self.collection.find(filter).sort(sort).await?
        } else {
            self.collection.find(filter).await?
        };

        let mut results = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .await
            .map_err(map_write_error)?;

        let id = inserted_object_id(result.inserted_id)?;
        debug!(collection = self.collection.name(), ?id, "Inserted document");
        Ok(id)
    }

    /// Same as [`insert_one`](Self::insert_one) but bound to a session, so
    /// the write commits or aborts with the surrounding transaction.
    pub async fn insert_one_in(
        &self,
        session: &mut ClientSession,
        doc: &T,
    ) -> DaoResult<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .session(session)
            .await
            .map_err(map_write_error)?;

        let id = inserted_object_id(result.inserted_id)?;
        debug!(collection = self.collection.name(), ?id, "Inserted document in transaction");
        Ok(id)
    }

    /// Applies `update`, stamping `updated_at` into its `$set`.
    /// Returns whether a document was modified.
    pub async fn update_one(
        &self,
        filter: Document,
        mut update: Document,
    ) -> DaoResult<bool> {
        let now = bson::DateTime::now();
        match update.get_document_mut("$set") {
            Ok(set_doc) => {
                set_doc.insert("updated_at", now);
            }
            Err(_) => {
                update.insert("$set", doc! { "updated_at": now });
            }
        }

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count > 0)
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> DaoResult<bool> {
        self.update_one(doc! { "_id": id }, update).await
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }
}
