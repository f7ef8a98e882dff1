use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use rand::thread_rng;
use serde::Deserialize;
use crate::city_images;
use crate::daily_forecast::aggregate_daily;
use crate::daily_forecast::ForecastSample;
use crate::manager_historical;
use crate::manager_owm::errors::OWMError;
use crate::units::Units;
use crate::AppState;

/// Offered when the geocoding endpoint is unreachable
const FALLBACK_CITIES: [&str; 16] = [
    "London, GB", "New York, US", "Tokyo, JP", "Paris, FR", "Sydney, AU",
    "Mumbai, IN", "Berlin, DE", "Toronto, CA", "Moscow, RU", "Cairo, EG",
    "Bangkok, TH", "Rome, IT", "Madrid, ES", "Amsterdam, NL", "Seoul, KR", "Dubai, AE",
];

#[derive(Deserialize, Debug)]
struct CityQuery {
    city: String,
    #[serde(default)]
    units: Units,
}

#[derive(Deserialize, Debug)]
struct HistoricalQuery {
    lat: f64,
    lon: f64,
    #[serde(default)]
    units: Units,
}

#[derive(Deserialize, Debug)]
struct SearchQuery {
    q: String,
}

#[derive(Deserialize, Debug)]
struct ImageQuery {
    city: String,
}

#[get("/weather")]
pub async fn current_weather(params: web::Query<CityQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    match cached_current(data.get_ref(), &params.city, params.units).await {
        Ok(payload) => json_body(payload),
        Err(e) => error_response(e),
    }
}

#[get("/forecast")]
pub async fn forecast(params: web::Query<CityQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    match cached_forecast(data.get_ref(), &params.city, params.units).await {
        Ok(payload) => json_body(payload),
        Err(e) => error_response(e),
    }
}

/// Serves current conditions and the aggregated forecast in one response,
/// fetching both upstream resources concurrently like the dashboard does
#[get("/dashboard")]
pub async fn dashboard(params: web::Query<CityQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    let (current, forecast_payload) = tokio::join!(
        cached_current(data.get_ref(), &params.city, params.units),
        cached_forecast(data.get_ref(), &params.city, params.units),
    );

    match (current, forecast_payload) {
        (Ok(current), Ok(forecast_payload)) => {
            // both halves are serialized json already
            json_body(format!("{{\"current\":{},\"forecast\":{}}}", current, forecast_payload))
        }
        (Err(e), _) | (_, Err(e)) => error_response(e),
    }
}

#[get("/historical")]
pub async fn historical(params: web::Query<HistoricalQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    let key = format!("historical_{}_{}", params.lat, params.lon);
    if let Some(payload) = cache_lookup(data.get_ref(), &key, params.units, data.weather_ttl_secs).await {
        return json_body(payload);
    }

    let days = manager_historical::generate_history(
        &mut thread_rng(),
        params.lat,
        params.lon,
        params.units,
        Utc::now(),
    );
    let entries = manager_historical::to_display(&days);

    match serde_json::to_string(&entries) {
        Ok(payload) => {
            cache_store(data.get_ref(), &key, params.units, &payload).await;
            json_body(payload)
        }
        Err(e) => {
            error!("failed to serialize historical data: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/cities")]
pub async fn cities(params: web::Query<SearchQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    if params.q.len() < 2 {
        return HttpResponse::Ok().json(Vec::<String>::new());
    }

    match data.owm.search_cities(&params.q).await {
        Ok(hits) => HttpResponse::Ok().json(hits),
        Err(e) => {
            error!("city search failed, serving fallback list: {}", e);
            HttpResponse::Ok().json(fallback_matches(&params.q))
        }
    }
}

#[get("/image")]
pub async fn city_image(params: web::Query<ImageQuery>, data: web::Data<AppState>) -> HttpResponse {
    info!("{:?}", params);

    // image urls do not depend on the measurement system
    let units = Units::default();
    let key = format!("city_image_{}", params.city.to_lowercase());
    if let Some(payload) = cache_lookup(data.get_ref(), &key, units, data.image_ttl_secs).await {
        return json_body(payload);
    }

    let url = city_images::lookup(&params.city, &mut thread_rng());
    let payload = serde_json::json!({ "image_url": url }).to_string();
    cache_store(data.get_ref(), &key, units, &payload).await;

    json_body(payload)
}

/// Serves the current conditions payload from cache, fetching and caching
/// it on a miss
async fn cached_current(data: &AppState, city: &str, units: Units) -> Result<String, OWMError> {
    let key = format!("current_weather_{}", city.to_lowercase());
    if let Some(payload) = cache_lookup(data, &key, units, data.weather_ttl_secs).await {
        return Ok(payload);
    }

    let current = data.owm.current(city, units).await?;
    let payload = serde_json::to_string(&current)?;
    cache_store(data, &key, units, &payload).await;

    Ok(payload)
}

/// Serves the aggregated 5-day forecast from cache, fetching, aggregating
/// and caching it on a miss
async fn cached_forecast(data: &AppState, city: &str, units: Units) -> Result<String, OWMError> {
    let key = format!("forecast_{}", city.to_lowercase());
    if let Some(payload) = cache_lookup(data, &key, units, data.weather_ttl_secs).await {
        return Ok(payload);
    }

    let forecast_resp = data.owm.forecast(city, units).await?;
    let samples: Vec<ForecastSample> = forecast_resp.list.iter().map(|item| item.to_sample()).collect();
    let payload = serde_json::to_string(&aggregate_daily(&samples))?;
    cache_store(data, &key, units, &payload).await;

    Ok(payload)
}

/// Cache read that degrades to a miss on storage errors
async fn cache_lookup(data: &AppState, key: &str, units: Units, ttl_secs: i64) -> Option<String> {
    match data.cache.lock().await.get(key, units, ttl_secs) {
        Ok(hit) => hit,
        Err(e) => {
            error!("cache read failed for {}: {}", key, e);
            None
        }
    }
}

/// Cache write that only logs on storage errors, a failed write never
/// fails the request
async fn cache_store(data: &AppState, key: &str, units: Units, payload: &str) {
    if let Err(e) = data.cache.lock().await.put(key, units, payload) {
        error!("cache write failed for {}: {}", key, e);
    }
}

fn json_body(payload: String) -> HttpResponse {
    HttpResponse::Ok().content_type("application/json").body(payload)
}

fn error_response(e: OWMError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        OWMError::CityNotFound => HttpResponse::NotFound().json(body),
        OWMError::RateLimited => HttpResponse::TooManyRequests().json(body),
        _ => {
            error!("upstream failure: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn fallback_matches(query: &str) -> Vec<String> {
    let q = query.to_lowercase();
    FALLBACK_CITIES.iter()
        .filter(|city| city.to_lowercase().contains(&q))
        .take(5)
        .map(|city| city.to_string())
        .collect()
}
