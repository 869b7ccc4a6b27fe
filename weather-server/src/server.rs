use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use std::sync::Arc;
use weather_core::{
    Config, ForecastGateway, JsonFileStore, MessageStore, PrecipitationMap, ProviderId,
    WeatherGateway, WundergroundClient,
};

use crate::handlers;

/// Shared application state.
pub struct AppState {
    pub weather: WeatherGateway,
    pub forecast: ForecastGateway,
    /// Chat message log.
    pub chat: Arc<dyn MessageStore>,
    /// Station used when `/weather` is called without `stationId`.
    pub default_station: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let wunderground_key = config.require_api_key(ProviderId::Wunderground)?;
        let owm_key = config.require_api_key(ProviderId::OpenWeatherMap)?;

        let client = Arc::new(
            WundergroundClient::new(
                wunderground_key.to_string(),
                config.postal_key.clone(),
                config.request_timeout(),
            )
            .context("Failed to build HTTP client")?,
        );

        let chat = JsonFileStore::new(&config.chat_log);
        log::info!("Chat log at {}", chat.path().display());

        Ok(Self {
            weather: WeatherGateway::new(
                client.clone(),
                PrecipitationMap::new(owm_key.to_string(), config.map_zoom),
            ),
            forecast: ForecastGateway::new(client),
            chat: Arc::new(chat),
            default_station: config.default_station.clone(),
        })
    }
}

/// Registers every route on an app; shared by the server and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .route("/", web::get().to(handlers::index))
        .route("/weather", web::get().to(handlers::weather))
        .route("/forecast", web::get().to(handlers::forecast))
        .route("/chat", web::get().to(handlers::chat_history))
        .route("/chat", web::post().to(handlers::post_chat));
}

/// Starts one HTTP server bound to every address in `config.listen`.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    });

    for addr in &config.listen {
        server = server
            .bind(addr.as_str())
            .with_context(|| format!("Failed to bind {addr}"))?;
        log::info!("Starting server on {addr}");
    }

    server.run().await.context("HTTP server terminated with an error")
}
