use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

pub const DB_NAME: &str = "Safarnama";

pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    // Set a reasonable timeout for operations
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Set the server API if using MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Test the connection to make sure it works
    match client
        .database(DB_NAME)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            eprintln!("WARNING: Connected to MongoDB but ping test failed: {}", e);
            eprintln!("The API may still work, but some functionality might be impaired");
        }
    }

    Arc::new(client)
}

/// Creates the unique indexes the data model relies on: one vendor and one
/// profile per account, unique account handles, and the conversation triple.
/// Concurrent first-contact writes hit the triple index and the loser falls
/// back to the existing thread.
pub async fn ensure_indexes(client: &Client) -> mongodb::error::Result<()> {
    let db = client.database(DB_NAME);

    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    db.collection::<mongodb::bson::Document>("Accounts")
        .create_index(unique(doc! { "username": 1 }))
        .await?;
    db.collection::<mongodb::bson::Document>("Accounts")
        .create_index(unique(doc! { "email": 1 }))
        .await?;
    db.collection::<mongodb::bson::Document>("Profiles")
        .create_index(unique(doc! { "user_id": 1 }))
        .await?;
    db.collection::<mongodb::bson::Document>("Vendors")
        .create_index(unique(doc! { "user_id": 1 }))
        .await?;
    db.collection::<mongodb::bson::Document>("Conversations")
        .create_index(unique(doc! { "service_id": 1, "tourist_id": 1, "vendor_id": 1 }))
        .await?;
    db.collection::<mongodb::bson::Document>("RevokedTokens")
        .create_index(unique(doc! { "jti": 1 }))
        .await?;

    Ok(())
}

/// True when a write failed on a unique index (Mongo error code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
            mongodb::error::WriteError { code: 11000, .. }
        ))
    )
}
