#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Overpass API client for building footprints.
//!
//! Queries `OpenStreetMap` building ways inside a bounding box and
//! classifies them for household estimation. Footprint data is best-effort
//! enrichment: every failure mode (transport, HTTP status, parse, timeout)
//! degrades to an all-zero summary instead of an error.
//!
//! See <https://wiki.openstreetmap.org/wiki/Overpass_API>

pub mod classify;

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use pop_map_households::FootprintSource;
use pop_map_households_models::{BoundingBox, BuildingFootprintSummary};
use thiserror::Error;

pub use classify::{BuildingRecord, RESIDENTIAL_TYPES, classify};

/// Default public Overpass endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default per-request timeout, also sent as the Overpass QL timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Building types requested from Overpass: the residential set plus the
/// common non-residential types, so the histogram reflects the mix.
const QUERY_TYPES: &[&str] = &[
    "residential",
    "house",
    "apartments",
    "detached",
    "semi",
    "terrace",
    "bungalow",
    "villa",
    "farm",
    "commercial",
    "industrial",
    "retail",
    "office",
];

/// Errors from Overpass operations (internal; swallowed by
/// [`FootprintSource::fetch_summary`]).
#[derive(Debug, Error)]
pub enum OverpassError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Overpass returned status {0}")]
    Status(u16),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Client for one Overpass API endpoint.
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OverpassClient {
    /// Creates a client with the default timeout.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the raw building records inside `bbox`.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError`] if the request or response parsing fails.
    pub async fn fetch_buildings(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<BuildingRecord>, OverpassError> {
        let query = build_query(bbox, self.timeout.as_secs());

        let resp = self
            .client
            .post(&self.base_url)
            .body(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OverpassError::Status(status.as_u16()));
        }

        let body: serde_json::Value = resp.json().await?;
        parse_elements(&body)
    }
}

#[async_trait]
impl FootprintSource for OverpassClient {
    async fn fetch_summary(&self, bbox: &BoundingBox) -> BuildingFootprintSummary {
        match self.fetch_buildings(bbox).await {
            Ok(records) => classify(&records),
            Err(e) => {
                log::warn!("building footprint lookup failed, continuing without: {e}");
                BuildingFootprintSummary::empty()
            }
        }
    }
}

/// Builds the Overpass QL query for all [`QUERY_TYPES`] inside `bbox`.
///
/// Overpass bounding boxes are ordered `(south, west, north, east)`.
fn build_query(bbox: &BoundingBox, timeout_secs: u64) -> String {
    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for building_type in QUERY_TYPES {
        let _ = writeln!(
            query,
            "  way[\"building\"=\"{building_type}\"]({south},{west},{north},{east});",
            south = bbox.south,
            west = bbox.west,
            north = bbox.north,
            east = bbox.east,
        );
    }
    query.push_str(");\nout tags;\n");
    query
}

/// Parses the `elements` array of an Overpass JSON response.
fn parse_elements(body: &serde_json::Value) -> Result<Vec<BuildingRecord>, OverpassError> {
    let elements = body
        .get("elements")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| OverpassError::Parse {
            message: "response has no elements array".to_string(),
        })?;

    Ok(elements
        .iter()
        .map(|element| BuildingRecord {
            building_type: element["tags"]["building"].as_str().map(str::to_string),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_covers_all_types_in_overpass_order() {
        let bbox = BoundingBox::new(2.34, 48.85, 2.36, 48.87);
        let query = build_query(&bbox, 30);

        assert!(query.starts_with("[out:json][timeout:30];"));
        assert!(query.contains("way[\"building\"=\"house\"](48.85,2.34,48.87,2.36);"));
        assert!(query.contains("way[\"building\"=\"office\"](48.85,2.34,48.87,2.36);"));
        assert_eq!(query.matches("way[\"building\"").count(), QUERY_TYPES.len());
        assert!(query.ends_with("out tags;\n"));
    }

    #[test]
    fn parses_overpass_elements() {
        let body = serde_json::json!({
            "elements": [
                { "type": "way", "id": 1, "tags": { "building": "house" } },
                { "type": "way", "id": 2, "tags": { "building": "retail" } },
                { "type": "way", "id": 3, "tags": {} },
            ]
        });
        let records = parse_elements(&body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].building_type.as_deref(), Some("house"));
        assert_eq!(records[2].building_type, None);
    }

    #[test]
    fn missing_elements_is_a_parse_error() {
        let body = serde_json::json!({ "remark": "timed out" });
        assert!(parse_elements(&body).is_err());
    }
}
