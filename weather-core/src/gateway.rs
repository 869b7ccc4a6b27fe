//! Glue between the provider clients and the response shapes the front end
//! consumes.

use chrono::Weekday;
use std::sync::Arc;

use crate::{
    error::WeatherError,
    forecast::{ForecastDay, normalize_forecast},
    model::{Conditions, Observation, ObservationPayload, WeatherReport},
    provider::{ForecastSource, ObservationSource, PrecipitationMap},
    tile::tile_for,
    wind::cardinal_for,
};

pub const UNKNOWN_WIND_DIR: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct WeatherGateway {
    source: Arc<dyn ObservationSource>,
    map: PrecipitationMap,
}

impl WeatherGateway {
    pub fn new(source: Arc<dyn ObservationSource>, map: PrecipitationMap) -> Self {
        Self { source, map }
    }

    pub async fn current(&self, station_id: &str) -> Result<WeatherReport, WeatherError> {
        let payload = self.source.current_observation(station_id).await?;
        build_report(payload, &self.map)
    }
}

/// Shape the first observation in `payload` into a [`WeatherReport`].
pub fn build_report(
    payload: ObservationPayload,
    map: &PrecipitationMap,
) -> Result<WeatherReport, WeatherError> {
    let raw = payload
        .observations
        .and_then(|obs| obs.into_iter().next())
        .ok_or(WeatherError::NoObservations)?;

    let obs = Observation::try_from(raw)?;

    let wind_dir = obs
        .wind_bearing
        .map_or_else(|| UNKNOWN_WIND_DIR.to_string(), |deg| cardinal_for(deg).to_string());

    let tile = tile_for(obs.lat, obs.lon, map.zoom())?;

    Ok(WeatherReport {
        station_id: obs.station_id,
        temperature: obs.temperature_f,
        weather: Conditions {
            humidity: obs.humidity_pct,
            wind_speed: obs.wind_speed,
            pressure: obs.pressure,
        },
        wind_chill: obs.wind_chill,
        rain_forecast: obs.precip_rate,
        total_rain: obs.precip_total,
        wind_dir,
        weather_map: map.tile_url(tile),
    })
}

#[derive(Debug, Clone)]
pub struct ForecastGateway {
    source: Arc<dyn ForecastSource>,
}

impl ForecastGateway {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Fetch and normalize the daily forecast; `today` is the caller's
    /// current weekday.
    pub async fn forecast(&self, today: Weekday) -> Result<Vec<ForecastDay>, WeatherError> {
        let raw = self.source.daily_forecast().await?;
        let days = normalize_forecast(&raw, today)?;

        log::debug!("normalized {} forecast days", days.len());
        Ok(days)
    }
}
