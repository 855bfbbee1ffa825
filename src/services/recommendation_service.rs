use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use rand::seq::SliceRandom;

use crate::db::mongo::DB_NAME;
use crate::models::account::{Profile, TravelStyle};
use crate::models::destination::{Destination, DestinationType};

const MAX_SUGGESTIONS: usize = 5;

// Budget cap applied when the profile leaves it unset
const UNCAPPED_BUDGET: f64 = 99999.99;

/// Destination types that fit a travel style. This is the whole "AI": a
/// static mapping that can be swapped for a real model without touching the
/// endpoint.
pub fn preferred_types(style: TravelStyle) -> &'static [DestinationType] {
    match style {
        TravelStyle::Adventure => &[DestinationType::HikingTrail, DestinationType::Park],
        TravelStyle::Relaxation => &[
            DestinationType::Park,
            DestinationType::Beach,
            DestinationType::Landmark,
        ],
        TravelStyle::Cultural => &[DestinationType::Museum, DestinationType::Landmark],
        TravelStyle::Family => &[DestinationType::Park, DestinationType::Museum],
        TravelStyle::Budget => &[DestinationType::Park, DestinationType::Museum],
    }
}

/// Picks up to five destinations matching the profile's style within its
/// budget, in random order.
pub async fn recommend_destinations(
    client: &Client,
    profile: &Profile,
) -> mongodb::error::Result<Vec<Destination>> {
    let collection: mongodb::Collection<Destination> =
        client.database(DB_NAME).collection("Destinations");

    let budget = profile.budget.unwrap_or(UNCAPPED_BUDGET);
    let types: Vec<&str> = preferred_types(profile.travel_style)
        .iter()
        .map(|t| t.as_str())
        .collect();

    let filter = doc! {
        "destination_type": { "$in": types },
        "average_cost": { "$lte": budget },
    };

    let mut matches = collection
        .find(filter)
        .await?
        .try_collect::<Vec<Destination>>()
        .await?;

    matches.shuffle(&mut rand::thread_rng());
    matches.truncate(MAX_SUGGESTIONS);

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adventure_maps_to_trails_and_parks() {
        let types = preferred_types(TravelStyle::Adventure);
        assert!(types.contains(&DestinationType::HikingTrail));
        assert!(types.contains(&DestinationType::Park));
        assert!(!types.contains(&DestinationType::Museum));
    }

    #[test]
    fn cultural_maps_to_museums_and_landmarks() {
        assert_eq!(
            preferred_types(TravelStyle::Cultural),
            &[DestinationType::Museum, DestinationType::Landmark]
        );
    }

    #[test]
    fn every_style_has_a_mapping() {
        for style in [
            TravelStyle::Adventure,
            TravelStyle::Relaxation,
            TravelStyle::Cultural,
            TravelStyle::Family,
            TravelStyle::Budget,
        ] {
            assert!(!preferred_types(style).is_empty());
        }
    }
}
