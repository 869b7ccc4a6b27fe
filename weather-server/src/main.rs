//! Binary crate for the `weather-server` backend.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive credential configuration
//! - Serving the JSON routes and the front-end page over HTTP

use clap::Parser;

mod cli;
mod handlers;
mod server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder().parse_filters(&filters).init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
