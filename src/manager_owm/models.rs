use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use crate::daily_forecast::ForecastSample;

/// Condition tag as reported by OpenWeatherMap, e.g. "light rain" / "10d"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionTag {
    pub id: u16,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunrise: DateTime<Utc>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunset: DateTime<Utc>,
}

/// Response of the current weather endpoint (/data/2.5/weather)
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub coord: Coord,
    pub weather: Vec<ConditionTag>,
    pub main: MainReadings,
    pub visibility: Option<u32>,
    pub wind: Wind,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
    pub sys: SysInfo,
    pub timezone: i32,
    pub name: String,
}

/// One 3-hour slot of the forecast endpoint
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastItem {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
    pub main: MainReadings,
    pub weather: Vec<ConditionTag>,
    pub wind: Wind,
    #[serde(default)]
    pub pop: f64,
}

impl ForecastItem {
    /// Flattens the slot into the sample shape the daily aggregation consumes
    pub fn to_sample(&self) -> ForecastSample {
        let (description, icon) = self.weather.first()
            .map(|w| (w.description.clone(), w.icon.clone()))
            .unwrap_or_default();

        ForecastSample {
            valid_time: self.dt,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            precipitation_probability: self.pop,
            description,
            icon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub coord: Coord,
    pub country: String,
    pub timezone: i32,
}

/// Response of the 5 day / 3 hour forecast endpoint (/data/2.5/forecast)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastItem>,
    pub city: CityInfo,
}

/// One hit of the geocoding endpoint (/geo/1.0/direct)
#[derive(Debug, Clone, Deserialize)]
pub struct GeoEntry {
    pub name: String,
    pub country: String,
}
