pub mod errors;
pub mod models;

use std::time::Duration;
use reqwest::Client;
use crate::manager_owm::errors::OWMError;
use crate::manager_owm::models::{CurrentResponse, ForecastResponse, GeoEntry};
use crate::units::Units;

const API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";

/// Struct for fetching weather data from OpenWeatherMap
#[derive(Clone)]
pub struct OWM {
    client: Client,
    api_key: String,
    api_base: String,
    geo_base: String,
}

impl OWM {
    /// Returns an OWM struct ready for fetching current conditions, forecasts
    /// and city search results from OpenWeatherMap
    ///
    /// # Arguments
    ///
    /// * 'api_key' - OpenWeatherMap API key
    pub fn new(api_key: String) -> Result<OWM, OWMError> {
        Self::build(api_key, API_BASE.to_string(), GEO_BASE.to_string())
    }

    #[cfg(test)]
    pub(crate) fn with_endpoints(api_key: String, api_base: String, geo_base: String) -> Result<OWM, OWMError> {
        Self::build(api_key, api_base, geo_base)
    }

    fn build(api_key: String, api_base: String, geo_base: String) -> Result<OWM, OWMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base,
            geo_base,
        })
    }

    /// Retrieves the current conditions for a city
    ///
    /// # Arguments
    ///
    /// * 'city' - city name as typed by the user
    /// * 'units' - measurement system the API should convert to
    pub async fn current(&self, city: &str, units: Units) -> Result<CurrentResponse, OWMError> {
        let req = self.client
            .get(format!("{}/weather", self.api_base))
            .query(&[("q", city), ("appid", &self.api_key), ("units", units.as_str())])
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(Self::status_error(status, "current weather"));
        }

        let json = req.text().await?;
        let current: CurrentResponse = serde_json::from_str(&json)?;

        Ok(current)
    }

    /// Retrieves the 5 day / 3 hour forecast for a city
    ///
    /// # Arguments
    ///
    /// * 'city' - city name as typed by the user
    /// * 'units' - measurement system the API should convert to
    pub async fn forecast(&self, city: &str, units: Units) -> Result<ForecastResponse, OWMError> {
        let req = self.client
            .get(format!("{}/forecast", self.api_base))
            .query(&[("q", city), ("appid", &self.api_key), ("units", units.as_str())])
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(Self::status_error(status, "forecast"));
        }

        let json = req.text().await?;
        let forecast: ForecastResponse = serde_json::from_str(&json)?;

        if forecast.list.is_empty() {
            Err(OWMError::OWM(format!("No forecast entries returned for {}", city)))
        } else {
            Ok(forecast)
        }
    }

    /// Resolves a partial city name to up to 5 "Name, CC" candidates
    ///
    /// # Arguments
    ///
    /// * 'query' - partial city name
    pub async fn search_cities(&self, query: &str) -> Result<Vec<String>, OWMError> {
        let req = self.client
            .get(format!("{}/direct", self.geo_base))
            .query(&[("q", query), ("limit", "5"), ("appid", &self.api_key)])
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(Self::status_error(status, "city search"));
        }

        let json = req.text().await?;
        let hits: Vec<GeoEntry> = serde_json::from_str(&json)?;

        Ok(hits.into_iter().map(|c| format!("{}, {}", c.name, c.country)).collect())
    }

    fn status_error(status: reqwest::StatusCode, what: &str) -> OWMError {
        match status.as_u16() {
            404 => OWMError::CityNotFound,
            401 => OWMError::InvalidApiKey,
            429 => OWMError::RateLimited,
            _ => OWMError::OWM(format!("Error while fetching {} from OWM: {}", what, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENT_BODY: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 17.4, "feels_like": 17.1, "temp_min": 16.0, "temp_max": 18.9, "pressure": 1017, "humidity": 72},
        "visibility": 10000,
        "wind": {"speed": 4.1, "deg": 240},
        "dt": 1748772000,
        "sys": {"country": "GB", "sunrise": 1748748000, "sunset": 1748806800},
        "timezone": 3600,
        "name": "London"
    }"#;

    const FORECAST_BODY: &str = r#"{
        "list": [
            {
                "dt": 1748772000,
                "main": {"temp": 17.4, "feels_like": 17.1, "temp_min": 16.0, "temp_max": 18.9, "pressure": 1017, "humidity": 72},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "wind": {"speed": 4.1, "deg": 240},
                "pop": 0.35
            },
            {
                "dt": 1748782800,
                "main": {"temp": 19.0, "feels_like": 18.6, "temp_min": 18.0, "temp_max": 19.5, "pressure": 1016, "humidity": 65},
                "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                "wind": {"speed": 3.2, "deg": 250}
            }
        ],
        "city": {"name": "London", "coord": {"lat": 51.5085, "lon": -0.1257}, "country": "GB", "timezone": 3600}
    }"#;

    async fn client_for(server: &MockServer) -> OWM {
        OWM::with_endpoints("test-key".to_string(), server.uri(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn current_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
            .mount(&server)
            .await;

        let owm = client_for(&server).await;
        let current = owm.current("London", Units::Metric).await.unwrap();

        assert_eq!(current.name, "London");
        assert_eq!(current.main.humidity, 72);
        assert_eq!(current.dt.timestamp(), 1748772000);
        assert_eq!(current.weather[0].icon, "04d");
    }

    #[tokio::test]
    async fn forecast_items_map_to_samples() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FORECAST_BODY, "application/json"))
            .mount(&server)
            .await;

        let owm = client_for(&server).await;
        let forecast = owm.forecast("London", Units::Metric).await.unwrap();

        assert_eq!(forecast.list.len(), 2);

        let sample = forecast.list[0].to_sample();
        assert_eq!(sample.valid_time.timestamp(), 1748772000);
        assert_eq!(sample.description, "light rain");
        assert_eq!(sample.precipitation_probability, 0.35);

        // pop is absent on the second slot and defaults to dry
        assert_eq!(forecast.list[1].to_sample().precipitation_probability, 0.0);
    }

    #[tokio::test]
    async fn unknown_city_maps_to_city_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"))
            .mount(&server)
            .await;

        let owm = client_for(&server).await;
        match owm.current("Atlantis", Units::Metric).await {
            Err(OWMError::CityNotFound) => (),
            other => panic!("expected CityNotFound, got {:?}", other.map(|c| c.name)),
        }
    }

    #[tokio::test]
    async fn bad_key_and_rate_limit_are_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let owm = client_for(&server).await;
        assert!(matches!(owm.current("London", Units::Metric).await, Err(OWMError::InvalidApiKey)));
        assert!(matches!(owm.forecast("London", Units::Metric).await, Err(OWMError::RateLimited)));
    }

    #[tokio::test]
    async fn search_formats_name_and_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"name": "Paris", "country": "FR"}, {"name": "Paris", "country": "US"}]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let owm = client_for(&server).await;
        let cities = owm.search_cities("Par").await.unwrap();

        assert_eq!(cities, vec!["Paris, FR", "Paris, US"]);
    }
}
