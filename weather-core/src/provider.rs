use crate::{error::WeatherError, forecast::RawForecast, model::ObservationPayload};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod wunderground;

pub use openweather::PrecipitationMap;
pub use wunderground::WundergroundClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Wunderground,
    OpenWeatherMap,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Wunderground => "wunderground",
            ProviderId::OpenWeatherMap => "openweathermap",
        }
    }

    /// Environment variable that overrides the configured API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::Wunderground => "WUNDERGROUND_API_KEY",
            ProviderId::OpenWeatherMap => "OPENWEATHERMAP_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Wunderground, ProviderId::OpenWeatherMap]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "wunderground" | "weather.com" => Ok(ProviderId::Wunderground),
            "openweathermap" | "openweather" | "owm" => Ok(ProviderId::OpenWeatherMap),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: wunderground, openweathermap."
            )),
        }
    }
}

/// Source of current personal-weather-station observations.
#[async_trait]
pub trait ObservationSource: Send + Sync + Debug {
    async fn current_observation(&self, station_id: &str)
    -> Result<ObservationPayload, WeatherError>;
}

/// Source of the multi-day daily forecast.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn daily_forecast(&self) -> Result<RawForecast, WeatherError>;
}

/// Shorten an upstream body for log lines.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
