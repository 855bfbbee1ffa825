//! Current-weather lookups against OpenWeatherMap.
//!
//! One request per unique city in an itinerary. A city that cannot be
//! resolved produces an inline `{city, error}` entry instead of failing the
//! whole batch.

use std::{env, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityWeather {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon_code: String,
}

pub struct WeatherService {
    http_client: reqwest::Client,
    api_key: String,
}

impl WeatherService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .map_err(|_| "OPENWEATHER_API_KEY environment variable not set")?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { http_client, api_key })
    }

    /// One forecast entry per city; failed lookups stay inline as
    /// `{city, error}` so the batch never fails as a whole.
    pub async fn weather_for_cities(&self, cities: &[String]) -> Vec<Value> {
        let mut reports = Vec::with_capacity(cities.len());

        for city in cities {
            let result = self.city_weather(city).await;
            reports.push(city_report(city, result));
        }

        reports
    }

    async fn city_weather(&self, city: &str) -> Result<CityWeather, String> {
        let response = self
            .http_client
            .get(OPENWEATHER_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| format!("Could not retrieve weather data. {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Could not retrieve weather data. Status {}",
                response.status()
            ));
        }

        let data: OwmResponse = response
            .json()
            .await
            .map_err(|e| format!("Could not retrieve weather data. {}", e))?;

        let condition = data
            .weather
            .first()
            .ok_or_else(|| "Could not retrieve weather data. Empty response".to_string())?;

        Ok(CityWeather {
            city: city.to_string(),
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            description: title_case(&condition.description),
            icon_code: condition.icon.clone(),
        })
    }
}

/// Converts a weather report into the wire entry for its city.
pub fn city_report(city: &str, result: Result<CityWeather, String>) -> Value {
    match result {
        Ok(weather) => json!(weather),
        Err(error) => json!({ "city": city, "error": error }),
    }
}

/// "scattered clouds" -> "Scattered Clouds", matching the upstream's
/// lowercased descriptions.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_multi_word_descriptions() {
        assert_eq!(title_case("scattered clouds"), "Scattered Clouds");
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("mist"), "Mist");
    }

    #[test]
    fn failed_lookup_becomes_inline_error_entry() {
        let entry = city_report("InvalidCityXYZ", Err("Could not retrieve weather data. Status 404 Not Found".to_string()));
        assert_eq!(entry["city"], "InvalidCityXYZ");
        assert!(entry["error"].as_str().unwrap().contains("404"));
        assert!(entry.get("temperature").is_none());
    }

    #[test]
    fn successful_lookup_keeps_the_full_payload() {
        let weather = CityWeather {
            city: "Gilgit".to_string(),
            temperature: 21.4,
            feels_like: 20.1,
            description: "Clear Sky".to_string(),
            icon_code: "01d".to_string(),
        };
        let entry = city_report("Gilgit", Ok(weather));
        assert_eq!(entry["city"], "Gilgit");
        assert_eq!(entry["temperature"], 21.4);
        assert_eq!(entry["description"], "Clear Sky");
        assert!(entry.get("error").is_none());
    }
}
