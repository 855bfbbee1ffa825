//! Driving routes from OpenRouteService.
//!
//! Unlike weather, a route is all-or-nothing: if the upstream call fails the
//! whole lookup reports one error, since a partial route is meaningless.

use std::{env, time::Duration};

use serde_json::{json, Value};

const ORS_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car/geojson";

#[derive(Debug)]
pub struct RouteSummary {
    pub route_geometry: Value,
    pub total_distance_km: f64,
    pub total_duration_hours: f64,
}

pub struct RoutingService {
    http_client: reqwest::Client,
    api_key: String,
}

impl RoutingService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = env::var("OPENROUTESERVICE_API_KEY")
            .map_err(|_| "OPENROUTESERVICE_API_KEY environment variable not set")?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { http_client, api_key })
    }

    /// Routes through the given `[lon, lat]` waypoints in order.
    pub async fn route_for_coordinates(
        &self,
        coordinates: &[[f64; 2]],
    ) -> Result<RouteSummary, String> {
        if coordinates.len() < 2 {
            return Err(
                "At least two destinations are required to calculate a route.".to_string(),
            );
        }

        // -1 lets ORS snap each waypoint to the nearest road at any distance
        let body = json!({
            "coordinates": coordinates,
            "radiuses": vec![-1; coordinates.len()],
        });

        let response = self
            .http_client
            .post(ORS_URL)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Failed to get route from ORS. {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Failed to get route from ORS. {} {}", status, text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to get route from ORS. {}", e))?;

        summarize_directions(&data)
    }
}

/// Pulls geometry, distance and duration out of an ORS GeoJSON response.
/// Distance comes back in meters, duration in seconds.
pub fn summarize_directions(data: &Value) -> Result<RouteSummary, String> {
    let route = data
        .get("features")
        .and_then(|f| f.get(0))
        .ok_or_else(|| "Failed to get route from ORS. No route in response".to_string())?;

    let summary = route
        .get("properties")
        .and_then(|p| p.get("summary"))
        .ok_or_else(|| "Failed to get route from ORS. No summary in response".to_string())?;

    let distance = summary.get("distance").and_then(Value::as_f64).unwrap_or(0.0);
    let duration = summary.get("duration").and_then(Value::as_f64).unwrap_or(0.0);

    let geometry = route
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .cloned()
        .ok_or_else(|| "Failed to get route from ORS. No geometry in response".to_string())?;

    Ok(RouteSummary {
        route_geometry: geometry,
        total_distance_km: round2(distance / 1000.0),
        total_duration_hours: round2(duration / 3600.0),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ors_fixture() -> Value {
        json!({
            "features": [{
                "geometry": {
                    "coordinates": [[74.65, 36.31], [74.86, 36.31]]
                },
                "properties": {
                    "summary": { "distance": 25750.0, "duration": 5400.0 }
                }
            }]
        })
    }

    #[test]
    fn summarizes_distance_and_duration_with_two_decimals() {
        let summary = summarize_directions(&ors_fixture()).unwrap();
        assert_eq!(summary.total_distance_km, 25.75);
        assert_eq!(summary.total_duration_hours, 1.5);
        assert_eq!(summary.route_geometry[0][0], 74.65);
    }

    #[test]
    fn missing_route_reports_an_error() {
        let err = summarize_directions(&json!({ "features": [] })).unwrap_err();
        assert!(err.contains("Failed to get route from ORS"));
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        assert_eq!(round2(25.7499), 25.75);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }
}
