use thiserror::Error;

/// Broad classification of a [`WeatherError`], used by the HTTP layer to
/// pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UpstreamUnavailable,
    UpstreamDataMissing,
    InvalidCoordinate,
    InvalidInput,
    Storage,
}

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The provider answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    UpstreamUnavailable { status: u16, message: String },

    #[error("failed to reach upstream provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No observation data found")]
    NoObservations,

    #[error("upstream response is missing `{0}`")]
    UpstreamDataMissing(String),

    #[error("failed to decode upstream response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid coordinate lat={lat}, lon={lon} at zoom {zoom}")]
    InvalidCoordinate { lat: f64, lon: f64, zoom: u8 },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("message log I/O failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("message log is not a valid JSON array: {0}")]
    Corrupt(#[source] serde_json::Error),
}

impl WeatherError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::UpstreamDataMissing(field.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UpstreamUnavailable { .. } | Self::Network(_) => ErrorKind::UpstreamUnavailable,
            Self::NoObservations | Self::UpstreamDataMissing(_) | Self::Decode(_) => {
                ErrorKind::UpstreamDataMissing
            }
            Self::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
            Self::InvalidMessage(_) => ErrorKind::InvalidInput,
            Self::Storage(_) | Self::Corrupt(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status the front end should see for this error.
    ///
    /// Upstream failures pass the provider's status through as long as it is
    /// an error status; anything else becomes `502 Bad Gateway`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamUnavailable { status, .. } if (400..=599).contains(status) => *status,
            Self::UpstreamUnavailable { .. } => 502,
            Self::Network(err) if err.is_timeout() => 504,
            Self::Network(_) => 502,
            Self::NoObservations => 404,
            Self::UpstreamDataMissing(_) => 400,
            Self::Decode(_) | Self::InvalidCoordinate { .. } => 502,
            Self::InvalidMessage(_) => 400,
            Self::Storage(_) | Self::Corrupt(_) => 500,
        }
    }

    /// Message placed in the `{"error": ...}` body returned to the browser.
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable { message, .. } => message.clone(),
            Self::Network(_) => "Unable to fetch weather data".to_string(),
            Self::NoObservations => "No observation data found".to_string(),
            Self::UpstreamDataMissing(field) if field == "dayOfWeek" => {
                "No forecast data available".to_string()
            }
            Self::UpstreamDataMissing(field) => format!("Upstream data is missing `{field}`"),
            Self::Decode(_) => "Upstream returned malformed data".to_string(),
            Self::InvalidCoordinate { .. } => "Station reported an unusable location".to_string(),
            Self::InvalidMessage(reason) => reason.clone(),
            Self::Storage(_) | Self::Corrupt(_) => "Message log unavailable".to_string(),
        }
    }
}
