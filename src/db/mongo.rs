use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::booking::Booking;
use crate::models::pricing::{BlockedDateRange, PriceOverride, Season, SpecialPeriod};
use crate::models::room::Room;

pub const DB_NAME: &str = "Locanda";

pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    // Configure MongoDB client options with more robust settings
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

    // Create the client and check if it can connect
    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Test the connection to make sure it works
    match client
        .database(DB_NAME)
        .run_command(mongodb::bson::doc! {"ping": 1})
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

pub fn rooms(client: &Client) -> Collection<Room> {
    client.database(DB_NAME).collection("rooms")
}

pub fn bookings(client: &Client) -> Collection<Booking> {
    client.database(DB_NAME).collection("bookings")
}

pub fn pricing_seasons(client: &Client) -> Collection<Season> {
    client.database(DB_NAME).collection("pricing_seasons")
}

pub fn pricing_special_periods(client: &Client) -> Collection<SpecialPeriod> {
    client.database(DB_NAME).collection("pricing_special_periods")
}

pub fn pricing_overrides(client: &Client) -> Collection<PriceOverride> {
    client.database(DB_NAME).collection("pricing_overrides")
}

pub fn blocked_dates(client: &Client) -> Collection<BlockedDateRange> {
    client.database(DB_NAME).collection("blocked_dates")
}
