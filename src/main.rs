mod errors;
mod initialization;
mod handlers;
mod units;
mod daily_forecast;
mod city_images;
mod manager_owm;
mod manager_cache;
mod manager_historical;

use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use log::info;
use tokio::sync::Mutex;
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_cache::Cache;
use crate::manager_owm::OWM;

struct AppState {
    cache: Arc<Mutex<Cache>>,
    owm: OWM,
    weather_ttl_secs: i64,
    image_ttl_secs: i64,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let cache = Cache::new(&config.cache.db_path)?;
    let cache: Arc<Mutex<Cache>> = Arc::new(Mutex::new(cache));
    let owm = OWM::new(config.owm.api_key)?;

    // nothing outlives the image ttl, so that is the retention to enforce
    tokio::spawn(manager_cache::run_prune(
        cache.clone(),
        config.cache.image_ttl_secs,
        config.cache.prune_interval_secs,
    ));

    info!("starting weather dashboard backend on {}:{}",
        config.web_server.bind_address, config.web_server.bind_port);

    let weather_ttl_secs = config.cache.weather_ttl_secs;
    let image_ttl_secs = config.cache.image_ttl_secs;

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                cache: cache.clone(),
                owm: owm.clone(),
                weather_ttl_secs,
                image_ttl_secs,
            }))
            .service(handlers::current_weather)
            .service(handlers::forecast)
            .service(handlers::dashboard)
            .service(handlers::historical)
            .service(handlers::cities)
            .service(handlers::city_image)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
