use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{
    error::WeatherError,
    forecast::RawForecast,
    model::ObservationPayload,
    provider::{ForecastSource, ObservationSource, truncate_body},
};

const API_BASE: &str = "https://api.weather.com";

/// Client for the weather.com personal-weather-station API.
///
/// Serves both current station observations and the 5-day daily forecast
/// for a fixed postal key.
#[derive(Debug, Clone)]
pub struct WundergroundClient {
    api_key: String,
    postal_key: String,
    http: Client,
    base_url: String,
}

impl WundergroundClient {
    pub fn new(
        api_key: String,
        postal_key: String,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, postal_key, http, base_url: API_BASE.to_string() })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// GET `path` and return the body of a successful response.
    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<(StatusCode, String), WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        // reqwest errors carry the full URL, api key included
        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("format", "json"), ("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::Network(e.without_url()))?;

        log::debug!("weather.com {what} response ({status}): {}", truncate_body(&body));

        if !status.is_success() {
            let message =
                upstream_message(&body).unwrap_or_else(|| format!("Unable to fetch {what}"));
            log::warn!("weather.com {what} request failed with status {status}: {message}");
            return Err(WeatherError::UpstreamUnavailable { status: status.as_u16(), message });
        }

        Ok((status, body))
    }
}

/// Pull a human-readable message out of a weather.com error body.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .get("message")
        .or_else(|| value.pointer("/errors/0/error/message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl ObservationSource for WundergroundClient {
    async fn current_observation(
        &self,
        station_id: &str,
    ) -> Result<ObservationPayload, WeatherError> {
        let (status, body) = self
            .fetch(
                "/v2/pws/observations/current",
                &[("stationId", station_id), ("units", "e")],
                "observation",
            )
            .await?;

        // An offline or unknown station answers 204 with nothing in the body.
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(ObservationPayload::default());
        }

        serde_json::from_str(&body).map_err(WeatherError::Decode)
    }
}

#[async_trait]
impl ForecastSource for WundergroundClient {
    async fn daily_forecast(&self) -> Result<RawForecast, WeatherError> {
        let (_, body) = self
            .fetch(
                "/v3/wx/forecast/daily/5day",
                &[
                    ("postalKey", self.postal_key.as_str()),
                    ("units", "e"),
                    ("language", "en-US"),
                ],
                "forecast",
            )
            .await?;

        serde_json::from_str(&body).map_err(WeatherError::Decode)
    }
}
