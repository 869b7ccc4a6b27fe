use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::path::PathBuf;
use weather_core::{Config, ProviderId};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Station weather backend")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on; repeat for several. Overrides `listen` in the config file.
        #[arg(long = "listen", value_name = "ADDR")]
        listen: Vec<String>,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "wunderground" or "openweathermap".
        provider: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Serve { listen } => {
                let mut config = Config::load_from(&path)?;
                config.apply_env();
                if !listen.is_empty() {
                    config.listen = listen;
                }
                config.validate().context("Invalid configuration")?;

                log::info!("Loaded configuration from {}", path.display());
                crate::server::run(config).await
            }
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                let mut config = Config::load_from(&path)?;

                let api_key = Password::new(&format!("{id} API key:"))
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                let api_key = api_key.trim().to_string();
                if api_key.is_empty() {
                    anyhow::bail!("API key must not be empty");
                }

                config.upsert_provider_api_key(id, api_key);
                config.save_to(&path)?;

                println!("Saved {id} API key to {}", path.display());
                Ok(())
            }
        }
    }
}
