use serde::{Deserialize, Serialize};

/// Measurement system requested by the client and forwarded upstream.
///
/// OpenWeatherMap converts temperatures and wind speeds server-side, so the
/// chosen system is part of a cached payload's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}
