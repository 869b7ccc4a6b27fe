//! Web-mercator ("slippy map") tile addressing.

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::WeatherError;

/// Deepest zoom level accepted by [`tile_for`].
pub const MAX_ZOOM: u8 = 30;

/// Integer address of a map tile at a given zoom level.
///
/// Coordinates are signed because the input is not clamped to the mercator
/// band: latitudes beyond roughly ±85.05° land outside `0..2^zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileCoord {
    pub zoom: u8,
    pub x: i64,
    pub y: i64,
}

/// Convert a position to the tile containing it.
///
/// Latitude must lie strictly inside (-90, 90) since the secant diverges at
/// the poles; longitude must lie in [-180, 180].
pub fn tile_for(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, WeatherError> {
    let invalid = || WeatherError::InvalidCoordinate { lat, lon, zoom };

    if !lat.is_finite() || lat <= -90.0 || lat >= 90.0 {
        return Err(invalid());
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }
    if zoom > MAX_ZOOM {
        return Err(invalid());
    }

    let n = f64::from(1u32 << zoom);
    let lat_rad = lat.to_radians();

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    Ok(TileCoord { zoom, x: x as i64, y: y as i64 })
}
