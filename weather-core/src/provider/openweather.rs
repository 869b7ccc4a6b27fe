use crate::tile::TileCoord;

const TILE_BASE_URL: &str = "https://tile.openweathermap.org/map";

/// Builds OpenWeatherMap precipitation tile URLs.
///
/// No request is made here; the browser fetches the tile image itself.
#[derive(Debug, Clone)]
pub struct PrecipitationMap {
    api_key: String,
    zoom: u8,
}

impl PrecipitationMap {
    pub fn new(api_key: String, zoom: u8) -> Self {
        Self { api_key, zoom }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tile_url(&self, tile: TileCoord) -> String {
        format!(
            "{TILE_BASE_URL}/precipitation_new/{}/{}/{}.png?appid={}",
            tile.zoom, tile.x, tile.y, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_url_layout() {
        let map = PrecipitationMap::new("OWM_KEY".into(), 3);
        let url = map.tile_url(TileCoord { zoom: 3, x: 1, y: 3 });
        assert_eq!(
            url,
            "https://tile.openweathermap.org/map/precipitation_new/3/1/3.png?appid=OWM_KEY"
        );
    }
}
