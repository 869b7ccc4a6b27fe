//! Core library for the station weather backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the weather.com station API and OpenWeatherMap tiles
//! - The pure transformations: tile addressing, wind direction, forecast days
//! - Gateways that assemble the JSON the browser front end consumes
//! - The append-only chat message log
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod chat;
pub mod config;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod model;
pub mod provider;
pub mod tile;
pub mod wind;

pub use chat::{ChatMessage, JsonFileStore, MessageStore};
pub use config::{Config, ProviderConfig};
pub use error::{ErrorKind, WeatherError};
pub use forecast::{ForecastDay, IconCode, RawForecast, normalize_forecast};
pub use gateway::{ForecastGateway, WeatherGateway, build_report};
pub use model::{Observation, ObservationPayload, Reading, WeatherReport};
pub use provider::{
    ForecastSource, ObservationSource, PrecipitationMap, ProviderId, WundergroundClient,
};
pub use tile::{TileCoord, tile_for};
pub use wind::{Cardinal, cardinal_for};
