use mongodb::Client;

use crate::db::mongo::DB_NAME;
use crate::models::destination::{Destination, DestinationType};

/// Seeds the destination catalog (AJK and Gilgit-Baltistan) on first start.
/// Skipped entirely once the collection has data.
pub async fn seed_destinations(client: &Client) -> mongodb::error::Result<()> {
    let collection: mongodb::Collection<Destination> =
        client.database(DB_NAME).collection("Destinations");

    if collection.estimated_document_count().await? > 0 {
        return Ok(());
    }

    let destination = |name: &str,
                       description: &str,
                       city: &str,
                       destination_type: DestinationType,
                       average_cost: f64,
                       latitude: f64,
                       longitude: f64| Destination {
        id: None,
        name: name.to_string(),
        description: description.to_string(),
        city: city.to_string(),
        country: "Pakistan".to_string(),
        destination_type,
        average_cost,
        latitude,
        longitude,
    };

    let catalog = vec![
        destination(
            "Neelum Valley",
            "A breathtaking valley with lush greenery, pristine rivers, and scenic views.",
            "Muzaffarabad",
            DestinationType::Park,
            75.00,
            34.79,
            74.29,
        ),
        destination(
            "Ratti Gali Lake",
            "An alpine glacial lake, also known as the 'Jewel of Neelum', accessible via a challenging trek.",
            "Neelum Valley",
            DestinationType::HikingTrail,
            40.00,
            34.83,
            74.05,
        ),
        destination(
            "Banjosa Lake",
            "A beautiful artificial lake surrounded by dense pine forest and mountains, ideal for relaxation.",
            "Rawalakot",
            DestinationType::Park,
            30.00,
            33.81,
            73.81,
        ),
        destination(
            "Hunza Valley",
            "Famous for its stunning mountain scenery, historic forts, and warm hospitality.",
            "Hunza",
            DestinationType::Landmark,
            100.00,
            36.31,
            74.65,
        ),
        destination(
            "Skardu Fort (Kharpocho)",
            "A historic fort perched on a hilltop offering panoramic views of Skardu town and the Indus River.",
            "Skardu",
            DestinationType::Museum,
            20.00,
            35.30,
            75.63,
        ),
        destination(
            "Deosai National Park",
            "The 'Land of Giants', a high-altitude plateau known for its rich biodiversity and Himalayan brown bears.",
            "Skardu",
            DestinationType::Park,
            60.00,
            34.96,
            75.42,
        ),
        destination(
            "Attabad Lake",
            "A stunning turquoise lake formed after a massive landslide, perfect for boating and sightseeing.",
            "Hunza",
            DestinationType::Beach,
            50.00,
            36.31,
            74.86,
        ),
    ];

    collection.insert_many(catalog).await?;
    println!("Seeded destination catalog");

    Ok(())
}
