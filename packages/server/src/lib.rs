#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for catchment population analysis.
//!
//! Thin HTTP glue around the analysis pipeline: `POST /api/analyze` runs
//! one analysis, `GET /api/health` and `GET /api/stats` report service
//! and dataset state. The population grid is loaded once at startup and
//! shared read-only across all requests; a grid that fails to load is
//! fatal and the process refuses to start.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use pop_map_analysis::Analyzer;
use pop_map_grid::PopulationGrid;
use pop_map_households::HouseholdEstimator;
use pop_map_osm::OverpassClient;
use pop_map_ors::OrsClient;
use thiserror::Error;

/// Shared application state.
pub struct AppState {
    /// The analysis pipeline with its shared datasets.
    pub analyzer: Analyzer,
}

/// A required environment variable is missing or malformed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// The variable is set but could not be parsed.
    #[error("environment variable {name} is invalid: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Server configuration, read from the environment.
pub struct ServerConfig {
    /// Path to the population grid shapefile.
    pub grid_shapefile_path: PathBuf,
    /// Name of the population attribute in the grid.
    pub population_field: String,
    /// `OpenRouteService` API base URL.
    pub ors_base_url: String,
    /// `OpenRouteService` API key.
    pub ors_api_key: String,
    /// Overpass API endpoint.
    pub overpass_url: String,
    /// Bind address.
    pub bind_addr: String,
    /// Bind port.
    pub port: u16,
    /// Timeout for outbound HTTP calls, in seconds.
    pub http_timeout_secs: u64,
}

impl ServerConfig {
    /// Reads the configuration from environment variables.
    ///
    /// `ORS_API_KEY` is required; everything else has a default
    /// (`GRID_SHAPEFILE_PATH` defaults to `JRC_POPULATION_2018.shp` in
    /// the working directory).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ORS_API_KEY` is unset or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", 8080)?;
        let http_timeout_secs = parse_var("HTTP_TIMEOUT_SECS", 30)?;

        Ok(Self {
            grid_shapefile_path: std::env::var("GRID_SHAPEFILE_PATH")
                .unwrap_or_else(|_| "JRC_POPULATION_2018.shp".to_string())
                .into(),
            population_field: std::env::var("GRID_POPULATION_FIELD")
                .unwrap_or_else(|_| pop_map_grid::DEFAULT_POPULATION_FIELD.to_string()),
            ors_base_url: std::env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| pop_map_ors::DEFAULT_BASE_URL.to_string()),
            ors_api_key: std::env::var("ORS_API_KEY")
                .map_err(|_| ConfigError::Missing("ORS_API_KEY"))?,
            overpass_url: std::env::var("OVERPASS_URL")
                .unwrap_or_else(|_| pop_map_osm::DEFAULT_OVERPASS_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            http_timeout_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Starts the pop-map API server.
///
/// Loads the population grid, wires the `OpenRouteService` and Overpass
/// clients into the analyzer, and starts the Actix-Web HTTP server. This
/// is a regular async function — the caller provides the runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the configuration is invalid or the population grid cannot
/// be loaded: the service must not serve requests without its dataset.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env().expect("Invalid server configuration");

    log::info!(
        "Loading population grid from {}...",
        config.grid_shapefile_path.display()
    );
    let grid = Arc::new(
        PopulationGrid::load(&config.grid_shapefile_path, &config.population_field)
            .expect("Failed to load population grid"),
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let ors = OrsClient::new(http.clone(), config.ors_base_url, config.ors_api_key);
    let overpass = OverpassClient::new(http, config.overpass_url);

    let analyzer = Analyzer::new(
        grid,
        HouseholdEstimator::new(Box::new(overpass)),
        Box::new(ors.clone()),
        Box::new(ors),
    );

    let state = web::Data::new(AppState { analyzer });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(handlers::index))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/stats", web::get().to(handlers::stats))
                    .route("/analyze", web::post().to(handlers::analyze)),
            )
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
