use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Comment, Folder, Invite, Member, Notification, User, Video, Workspace};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique(bson::doc! { "external_id": 1 }),
            index(bson::doc! { "email": 1 }),
        ],
    )
    .await?;

    // Workspaces
    create_indexes(
        db,
        Workspace::COLLECTION,
        vec![index(bson::doc! { "owner_id": 1, "name": 1 })],
    )
    .await?;

    // Members: one membership per user per workspace
    create_indexes(
        db,
        Member::COLLECTION,
        vec![
            index_unique(bson::doc! { "workspace_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1 }),
        ],
    )
    .await?;

    // Invites
    create_indexes(
        db,
        Invite::COLLECTION,
        vec![
            index(bson::doc! { "receiver_id": 1, "accepted": 1 }),
            index(bson::doc! { "workspace_id": 1 }),
        ],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        Notification::COLLECTION,
        vec![index(bson::doc! { "user_id": 1, "created_at": -1 })],
    )
    .await?;

    // Folders
    create_indexes(
        db,
        Folder::COLLECTION,
        vec![index(bson::doc! { "workspace_id": 1, "created_at": 1 })],
    )
    .await?;

    // Videos
    create_indexes(
        db,
        Video::COLLECTION,
        vec![
            index(bson::doc! { "workspace_id": 1, "created_at": 1 }),
            index(bson::doc! { "folder_id": 1, "created_at": 1 }),
            index(bson::doc! { "owner_id": 1 }),
        ],
    )
    .await?;

    // Comments
    create_indexes(
        db,
        Comment::COLLECTION,
        vec![
            index(bson::doc! { "video_id": 1, "parent_id": 1, "created_at": 1 }),
            index(bson::doc! { "parent_id": 1, "created_at": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
