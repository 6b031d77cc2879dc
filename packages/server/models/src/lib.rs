#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the pop-map server.
//!
//! The analyze endpoint returns the analysis result types directly; this
//! crate only carries the server's own envelope types.

use serde::{Deserialize, Serialize};

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is up.
    pub healthy: bool,
    /// Whether the population grid is loaded and requests can be served.
    pub ready: bool,
    /// Server version.
    pub version: String,
}

/// `GET /api/stats` response: dataset figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Number of cells in the loaded population grid.
    pub total_cells: usize,
    /// Number of countries with a known household ratio.
    pub supported_countries: usize,
}

/// JSON error body with a machine-readable reason code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Stable reason code (e.g. `address_not_found`).
    pub code: String,
    /// Human-readable description.
    pub error: String,
}
