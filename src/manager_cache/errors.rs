use std::fmt;
use std::fmt::Formatter;

#[derive(Debug)]
pub struct CacheError(pub String);

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CacheError: {}", self.0)
    }
}
impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self { CacheError(err.to_string()) }
}
