use std::fmt;

#[derive(Debug)]
pub enum OWMError {
    CityNotFound,
    InvalidApiKey,
    RateLimited,
    OWM(String),
    Document(String),
}

impl fmt::Display for OWMError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OWMError::CityNotFound => write!(f, "City not found. Please check the spelling and try again."),
            OWMError::InvalidApiKey => write!(f, "Invalid API key. Please check your configuration."),
            OWMError::RateLimited => write!(f, "API rate limit exceeded. Please try again later."),
            OWMError::OWM(e) => write!(f, "OWMError::OWM: {}", e),
            OWMError::Document(e) => write!(f, "OWMError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for OWMError {
    fn from(e: reqwest::Error) -> Self {
        OWMError::OWM(e.to_string())
    }
}
impl From<serde_json::Error> for OWMError {
    fn from(e: serde_json::Error) -> Self {
        OWMError::Document(e.to_string())
    }
}
