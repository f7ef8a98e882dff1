use std::env;
use std::fs;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize)]
pub struct Config {
    pub web_server: WebServerConfig,
    pub cache: CacheConfig,
    pub owm: OWMConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize)]
pub struct WebServerConfig {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize)]
pub struct CacheConfig {
    pub db_path: String,
    /// Weather, forecast and historical payloads are valid this long
    pub weather_ttl_secs: i64,
    /// City image urls are valid this long
    pub image_ttl_secs: i64,
    /// How often the prune loop sweeps out expired rows
    pub prune_interval_secs: u64,
}

#[derive(Deserialize)]
pub struct OWMConfig {
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct LoggingConfig {
    pub log_path: String,
    pub level: String,
}

/// Reads the application configuration and sets up logging
///
/// The configuration file path is taken from the first command line
/// argument, falling back to config.toml in the working directory.
pub fn config() -> Result<Config, ConfigError> {
    let path = env::args().nth(1).unwrap_or_else(|| String::from("config.toml"));
    let raw = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&raw)?;

    setup_logging(&config.logging)?;

    Ok(config)
}

/// Configures log4rs with a file appender and a console appender
///
/// # Arguments
///
/// * 'logging' - logging section of the configuration file
fn setup_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.parse::<LevelFilter>()
        .map_err(|_| ConfigError::from("invalid log level in configuration"))?;

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}")))
        .build(&logging.log_path)?;

    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} - {m}{n}")))
        .build();

    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("logfile").appender("console").build(level))?;

    log4rs::init_config(config)?;

    Ok(())
}
