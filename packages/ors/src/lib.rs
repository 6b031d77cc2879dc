#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `OpenRouteService` API client.
//!
//! Two endpoints are used: `geocode/search` to resolve an address to
//! coordinates, and `v2/isochrones/{profile}` to compute the polygon
//! reachable within a travel-time budget. Both are hard dependencies of
//! an analysis request: failures and timeouts surface as typed errors.
//!
//! See <https://openrouteservice.org/dev/#/api-docs>

pub mod geocode;
pub mod isochrone;

use geo::Polygon;
use thiserror::Error;

/// Default `OpenRouteService` API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Errors from `OpenRouteService` operations.
#[derive(Debug, Error)]
pub enum OrsError {
    /// HTTP request failed (includes client-side timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("OpenRouteService returned status {0}")]
    Status(u16),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// A geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPoint {
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Canonical label returned by the geocoder, if any.
    pub label: Option<String>,
}

/// Client bound to one `OpenRouteService` deployment and API key.
///
/// Request timeouts are the underlying [`reqwest::Client`]'s concern;
/// build it with a bounded timeout so a stalled upstream fails the
/// request instead of hanging it.
#[derive(Clone)]
pub struct OrsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OrsClient {
    /// Creates a client for `base_url` authenticating with `api_key`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolves an address to coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OrsError`] if the HTTP request or response parsing
    /// fails. An address the geocoder does not know yields `Ok(None)`.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodedPoint>, OrsError> {
        geocode::search(&self.client, &self.base_url, &self.api_key, address).await
    }

    /// Fetches the isochrone polygon reachable within `minutes` from
    /// `(longitude, latitude)` using the given ORS profile id (e.g.
    /// `driving-car`).
    ///
    /// # Errors
    ///
    /// Returns [`OrsError`] if the HTTP request or response parsing
    /// fails. An empty feature set yields `Ok(None)`.
    pub async fn isochrone(
        &self,
        longitude: f64,
        latitude: f64,
        minutes: u32,
        profile: &str,
    ) -> Result<Option<Polygon<f64>>, OrsError> {
        isochrone::fetch(
            &self.client,
            &self.base_url,
            &self.api_key,
            longitude,
            latitude,
            minutes,
            profile,
        )
        .await
    }
}
