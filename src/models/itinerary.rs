use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::destination::Destination;

/// A trip plan owned by exactly one account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Itinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ItineraryInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A destination scheduled on a specific day of an itinerary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItineraryItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub itinerary_id: ObjectId,
    pub destination_id: ObjectId,
    pub day_number: u32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ItineraryItemInput {
    pub destination_id: String,
    pub day_number: u32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Item with its destination embedded, the shape clients see.
#[derive(Debug, Serialize)]
pub struct ItineraryItemDetail {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub destination: Destination,
    pub day_number: u32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryDetail {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub items: Vec<ItineraryItemDetail>,
}

/// Schedule order: day number ascending, then start time ascending with
/// unscheduled items last within their day.
pub fn schedule_order(a: &ItineraryItem, b: &ItineraryItem) -> Ordering {
    a.day_number.cmp(&b.day_number).then_with(|| match (a.start_time, b.start_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: u32, start: Option<&str>) -> ItineraryItem {
        ItineraryItem {
            id: None,
            itinerary_id: ObjectId::new(),
            destination_id: ObjectId::new(),
            day_number: day,
            start_time: start.map(|s| s.parse().unwrap()),
            end_time: None,
            created_at: None,
        }
    }

    #[test]
    fn orders_by_day_then_start_time() {
        let mut items = vec![
            item(2, Some("09:00:00")),
            item(1, Some("14:00:00")),
            item(1, Some("08:30:00")),
        ];
        items.sort_by(schedule_order);

        assert_eq!(items[0].day_number, 1);
        assert_eq!(items[0].start_time, Some("08:30:00".parse().unwrap()));
        assert_eq!(items[1].start_time, Some("14:00:00".parse().unwrap()));
        assert_eq!(items[2].day_number, 2);
    }

    #[test]
    fn unscheduled_items_sort_last_within_their_day() {
        let mut items = vec![
            item(1, None),
            item(1, Some("19:00:00")),
            item(2, None),
        ];
        items.sort_by(schedule_order);

        assert_eq!(items[0].start_time, Some("19:00:00".parse().unwrap()));
        assert_eq!(items[1].day_number, 1);
        assert!(items[1].start_time.is_none());
        assert_eq!(items[2].day_number, 2);
    }
}
