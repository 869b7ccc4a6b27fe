//! HTTP handler functions for the weather API.

use actix_web::{
    HttpResponse, ResponseError,
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    web,
};
use chrono::Datelike;
use serde::Deserialize;
use std::fmt;
use weather_core::WeatherError;

use crate::server::AppState;

const INDEX_HTML: &str = include_str!("../static/weather.html");

/// A [`WeatherError`] rendered as `{"error": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{:?}: {}", self.0.kind(), self.0);
        } else {
            log::warn!("{:?}: {}", self.0.kind(), self.0);
        }

        HttpResponse::build(status).json(serde_json::json!({ "error": self.0.user_message() }))
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as other failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(16 * 1024).error_handler(|err: JsonPayloadError, _req| {
        let body = serde_json::json!({ "error": err.to_string() });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// `GET /`
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    pub station_id: Option<String>,
}

/// `GET /weather?stationId=...`
///
/// Current observation for a station, with wind direction and a
/// precipitation map tile.
pub async fn weather(
    state: web::Data<AppState>,
    query: web::Query<WeatherQuery>,
) -> Result<HttpResponse, ApiError> {
    let station_id = query
        .station_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(state.default_station.as_str());

    let report = state.weather.current(station_id).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// `GET /forecast`
///
/// Five-day forecast as a flat array, labeled relative to the server's
/// local date.
pub async fn forecast(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let today = chrono::Local::now().weekday();
    let days = state.forecast.forecast(today).await?;
    Ok(HttpResponse::Ok().json(days))
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub message: String,
}

/// `GET /chat`
pub async fn chat_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let messages = state.chat.read_all().await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// `POST /chat`
pub async fn post_chat(
    state: web::Data<AppState>,
    body: web::Json<NewMessage>,
) -> Result<HttpResponse, ApiError> {
    let stored = state.chat.append(body.into_inner().message).await?;
    Ok(HttpResponse::Ok().json(stored))
}
