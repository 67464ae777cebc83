use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    Network(reqwest::Error),
    Status(reqwest::StatusCode),
    Json(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(e) => write!(f, "Network error: {}", e),
            CatalogError::Status(status) => write!(f, "HTTP error: {}", status),
            CatalogError::Json(e) => write!(f, "JSON parsing error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json(err)
    }
}
