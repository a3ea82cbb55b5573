use mongodb::{Client, Database, options::ClientOptions};
use reelhub_config::DatabaseSettings;
use tracing::{info, warn};

/// Opens a pooled client and returns the configured database.
///
/// Invite acceptance runs inside a multi-document transaction, so the
/// server must be a replica set member (a single-node `rs0` is enough).
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.url).await?;
    client_options.app_name = Some("reelhub".to_string());
    client_options.max_pool_size = settings.max_pool_size;
    client_options.min_pool_size = settings.min_pool_size;

    if client_options.repl_set_name.is_none() {
        warn!("No replicaSet in database url; invite acceptance transactions will fail");
    }

    let client = Client::with_options(client_options)?;
    let db = client.database(&settings.name);

    db.run_command(bson::doc! { "ping": 1 }).await?;

    info!(db = %settings.name, "Connected to MongoDB");

    Ok(db)
}
