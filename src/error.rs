use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unknown point of interest: {0}")]
    UnknownPointOfInterest(String),
}

pub type Result<T> = std::result::Result<T, LocatorError>;
