use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Number of per-day summaries emitted at most
const MAX_FORECAST_DAYS: usize = 5;

/// One fine-grained forecast observation, typically on a 3-hour grid.
///
/// Calendar-day membership is derived from 'valid_time' in UTC so that
/// bucketing is reproducible regardless of where the service runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    pub valid_time: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub precipitation_probability: f64,
    pub description: String,
    pub icon: String,
}

/// Reduction of one calendar day's samples into a display-ready row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub precipitation: u8,
}

/// Reduces a sequence of forecast samples to at most five per-day summaries.
///
/// Samples are bucketed by UTC calendar date in first-encountered order and
/// only the first five distinct dates are kept. Per bucket the summary holds
/// the min/max temperature, the rounded mean humidity, the unrounded mean
/// wind speed and the maximum precipitation probability as a percentage.
/// The displayed description, icon and date label come from the bucket's
/// representative sample: the earliest one falling between 12:00 and 15:59
/// UTC, or the earliest sample of the day when none does.
///
/// # Arguments
///
/// * 'samples' - forecast observations, usually but not necessarily in
///   ascending time order
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut buckets: Vec<(NaiveDate, Vec<&ForecastSample>)> = Vec::new();

    for sample in samples {
        let day = sample.valid_time.date_naive();
        match buckets.iter_mut().find(|(d, _)| *d == day) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((day, vec![sample])),
        }
    }

    buckets.truncate(MAX_FORECAST_DAYS);

    buckets
        .into_iter()
        .map(|(_, mut bucket)| summarize_day(&mut bucket))
        .collect()
}

/// Reduces one non-empty day bucket to its summary
///
/// # Arguments
///
/// * 'bucket' - all samples of one calendar day, any order
fn summarize_day(bucket: &mut [&ForecastSample]) -> DailySummary {
    bucket.sort_by_key(|s| s.valid_time);

    let count = bucket.len() as f64;
    let mut temp_min = f64::INFINITY;
    let mut temp_max = f64::NEG_INFINITY;
    let mut humidity_sum = 0.0;
    let mut wind_sum = 0.0;
    let mut max_pop: f64 = 0.0;

    for sample in bucket.iter() {
        temp_min = temp_min.min(sample.temperature);
        temp_max = temp_max.max(sample.temperature);
        humidity_sum += sample.humidity as f64;
        wind_sum += sample.wind_speed;
        max_pop = max_pop.max(sample.precipitation_probability);
    }

    let representative = bucket
        .iter()
        .find(|s| (12..=15).contains(&s.valid_time.hour()))
        .unwrap_or(&bucket[0]);

    DailySummary {
        date: format_date(representative.valid_time),
        temp_min,
        temp_max,
        description: representative.description.clone(),
        icon: representative.icon.clone(),
        humidity: (humidity_sum / count).round() as u8,
        wind_speed: wind_sum / count,
        precipitation: (max_pop * 100.0).round() as u8,
    }
}

/// Formats a timestamp as a short date label, e.g. "Sat, Aug 30"
///
/// # Arguments
///
/// * 'date_time' - the instant to format, rendered in UTC
pub fn format_date(date_time: DateTime<Utc>) -> String {
    date_time.format("%a, %b %-d").to_string()
}
