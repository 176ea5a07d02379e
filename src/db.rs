use mongodb::bson::doc;
use mongodb::{Client, Database};
use tracing::info;

pub const DB_NAME: &str = "Gym";

pub const USERS: &str = "allUsers";
// the deployed database spells the collection this way
pub const PENDING_TRAINERS: &str = "pendingTriainer";
pub const CLASSES: &str = "classes";

pub async fn connect(uri: &str) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(uri).await?;

    // fail fast on a bad uri instead of at the first request
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    info!(database = DB_NAME, "connected to MongoDB");

    Ok(client.database(DB_NAME))
}
