use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use crate::daily_forecast::format_date;
use crate::manager_owm::models::ConditionTag;
use crate::units::Units;

const HISTORY_DAYS: i64 = 5;

/// Condition pool the generated days are drawn from (main, description, icon)
const WEATHER_PATTERNS: [(&str, &str, &str); 6] = [
    ("Clear", "clear sky", "01d"),
    ("Clouds", "few clouds", "02d"),
    ("Clouds", "scattered clouds", "03d"),
    ("Clouds", "broken clouds", "04d"),
    ("Rain", "light rain", "10d"),
    ("Rain", "moderate rain", "10d"),
];

/// One generated day in the shape of the One Call timemachine response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub timezone_offset: i32,
    pub data: Vec<HistoricalReading>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalReading {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunrise: DateTime<Utc>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunset: DateTime<Utc>,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i32,
    pub humidity: u8,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: u8,
    pub visibility: u32,
    pub wind_speed: f64,
    pub wind_deg: u16,
    pub weather: Vec<ConditionTag>,
}

/// Display-friendly row, one per historical day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub date: String,
    pub temp: f64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Generates plausible weather for the five days before the given instant.
///
/// The One Call history endpoint sits behind a paid subscription, so the
/// returned data is synthetic. The random source and the reference instant
/// are supplied by the caller, which keeps the generator deterministic
/// under a seeded generator.
///
/// Days come out oldest first.
///
/// # Arguments
///
/// * 'rng' - random source to draw conditions and readings from
/// * 'lat' - latitude of the location
/// * 'lon' - longitude of the location
/// * 'units' - measurement system, decides the base temperature
/// * 'now' - instant the history counts back from
pub fn generate_history<R: Rng>(rng: &mut R, lat: f64, lon: f64, units: Units, now: DateTime<Utc>) -> Vec<HistoricalDay> {
    let base_temp = match units {
        Units::Metric => 20.0,
        Units::Imperial => 68.0,
    };

    let mut days: Vec<HistoricalDay> = Vec::with_capacity(HISTORY_DAYS as usize);

    for i in 1..=HISTORY_DAYS {
        let dt = now - TimeDelta::seconds(i * 24 * 60 * 60);
        let pattern = WEATHER_PATTERNS[rng.gen_range(0..WEATHER_PATTERNS.len())];
        let temp = (base_temp + (rng.gen::<f64>() - 0.5) * 20.0).round();

        let reading = HistoricalReading {
            dt,
            sunrise: dt - TimeDelta::hours(6),
            sunset: dt + TimeDelta::hours(12),
            temp,
            feels_like: (temp + (rng.gen::<f64>() - 0.5) * 5.0).round(),
            pressure: 1013 + ((rng.gen::<f64>() - 0.5) * 40.0).round() as i32,
            humidity: (50.0 + (rng.gen::<f64>() - 0.5) * 40.0).round() as u8,
            dew_point: temp - 10.0,
            uvi: rng.gen::<f64>() * 10.0,
            clouds: (rng.gen::<f64>() * 100.0).round() as u8,
            visibility: 10000,
            wind_speed: rng.gen::<f64>() * 10.0,
            wind_deg: (rng.gen::<f64>() * 360.0).round() as u16,
            weather: vec![ConditionTag {
                id: 800,
                main: pattern.0.to_string(),
                description: pattern.1.to_string(),
                icon: pattern.2.to_string(),
            }],
        };

        days.push(HistoricalDay {
            lat,
            lon,
            timezone: "UTC".to_string(),
            timezone_offset: 0,
            data: vec![reading],
        });
    }

    days.reverse();
    days
}

/// Maps generated days 1:1 into the display shape, no aggregation involved
///
/// # Arguments
///
/// * 'days' - generated history, one reading per day
pub fn to_display(days: &[HistoricalDay]) -> Vec<HistoricalEntry> {
    days.iter()
        .filter_map(|day| day.data.first())
        .map(|reading| {
            let (description, icon) = reading.weather.first()
                .map(|w| (w.description.clone(), w.icon.clone()))
                .unwrap_or_default();

            HistoricalEntry {
                date: format_date(reading.dt),
                temp: reading.temp,
                description,
                icon,
                humidity: reading.humidity,
                wind_speed: reading.wind_speed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn generates_five_days_oldest_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let days = generate_history(&mut rng, 51.5, -0.12, Units::Metric, reference_now());

        assert_eq!(days.len(), 5);
        let stamps: Vec<i64> = days.iter().map(|d| d.data[0].dt.timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(days[4].data[0].dt, reference_now() - TimeDelta::days(1));
        assert_eq!(days[0].data[0].dt, reference_now() - TimeDelta::days(5));
    }

    #[test]
    fn readings_stay_in_realistic_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for day in generate_history(&mut rng, 48.85, 2.35, Units::Metric, reference_now()) {
            let r = &day.data[0];
            assert!(r.temp >= 10.0 && r.temp <= 30.0);
            assert!(r.humidity >= 30 && r.humidity <= 70);
            assert!(r.pressure >= 993 && r.pressure <= 1033);
            assert!(r.wind_speed >= 0.0 && r.wind_speed < 10.0);
            assert!(r.clouds <= 100);
            assert!(r.uvi >= 0.0 && r.uvi < 10.0);
            assert_eq!(r.visibility, 10000);
            assert_eq!(r.sunrise, r.dt - TimeDelta::hours(6));
            assert_eq!(r.sunset, r.dt + TimeDelta::hours(12));
            assert_eq!(day.timezone, "UTC");
        }
    }

    #[test]
    fn imperial_base_temperature_is_fahrenheit() {
        let mut rng = StdRng::seed_from_u64(42);
        for day in generate_history(&mut rng, 40.7, -74.0, Units::Imperial, reference_now()) {
            assert!(day.data[0].temp >= 58.0 && day.data[0].temp <= 78.0);
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        let left = generate_history(&mut a, 51.5, -0.12, Units::Metric, reference_now());
        let right = generate_history(&mut b, 51.5, -0.12, Units::Metric, reference_now());

        assert_eq!(serde_json::to_string(&left).unwrap(), serde_json::to_string(&right).unwrap());
    }

    #[test]
    fn display_transform_is_one_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let days = generate_history(&mut rng, 51.5, -0.12, Units::Metric, reference_now());
        let entries = to_display(&days);

        assert_eq!(entries.len(), days.len());
        for (entry, day) in entries.iter().zip(days.iter()) {
            let r = &day.data[0];
            assert_eq!(entry.temp, r.temp);
            assert_eq!(entry.humidity, r.humidity);
            assert_eq!(entry.description, r.weather[0].description);
            assert_eq!(entry.date, format_date(r.dt));
        }
    }

    #[test]
    fn patterns_come_from_the_fixed_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        for day in generate_history(&mut rng, 0.0, 0.0, Units::Metric, reference_now()) {
            let tag = &day.data[0].weather[0];
            assert!(WEATHER_PATTERNS.iter().any(|(m, d, i)| {
                *m == tag.main && *d == tag.description && *i == tag.icon
            }));
        }
    }
}
