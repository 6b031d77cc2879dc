#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Household estimation and building footprint value types.
//!
//! Shared between the estimation engine, the Overpass footprint client,
//! and the API server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic bounding rectangle in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a bounding box from `(west, south, east, north)`.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}

/// How a household estimate was produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EstimationMethod {
    /// Population divided by the country's persons-per-household ratio.
    StatisticalRatio,
    /// Weighted blend of the statistical estimate and OSM building counts.
    HybridStatisticalOsm,
    /// The catchment holds no population; nothing to estimate.
    NoPopulation,
    /// The estimator could not run at all.
    NotAvailable,
}

/// Aggregate counts over the building footprints in a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingFootprintSummary {
    /// Footprints classified as residential.
    pub residential_count: u64,
    /// All footprints seen, residential or not.
    pub total_count: u64,
    /// Count per building-type tag (untagged records appear as "unknown").
    pub type_histogram: BTreeMap<String, u64>,
    /// `residential_count / total_count`, `0` when no footprints were seen.
    pub residential_ratio: f64,
}

impl BuildingFootprintSummary {
    /// The all-zero summary substituted when the footprint source fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            residential_count: 0,
            total_count: 0,
            type_histogram: BTreeMap::new(),
            residential_ratio: 0.0,
        }
    }
}

/// A household count estimate for a catchment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdEstimate {
    /// Estimated number of households.
    pub total_households: u64,
    /// Persons-per-household ratio used for the statistical estimate.
    pub ratio_used: f64,
    /// How the estimate was produced.
    pub method: EstimationMethod,
    /// Footprint counts, present when building data was fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint_summary: Option<BuildingFootprintSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn method_labels_are_snake_case() {
        assert_eq!(EstimationMethod::StatisticalRatio.to_string(), "statistical_ratio");
        assert_eq!(
            EstimationMethod::HybridStatisticalOsm.to_string(),
            "hybrid_statistical_osm"
        );
        assert_eq!(EstimationMethod::NoPopulation.to_string(), "no_population");
        assert_eq!(EstimationMethod::NotAvailable.to_string(), "not_available");
    }

    #[test]
    fn method_parses_from_label() {
        assert_eq!(
            EstimationMethod::from_str("hybrid_statistical_osm").unwrap(),
            EstimationMethod::HybridStatisticalOsm
        );
        assert!(EstimationMethod::from_str("guesswork").is_err());
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = BuildingFootprintSummary::empty();
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.residential_count, 0);
        assert!(summary.type_histogram.is_empty());
        assert!(summary.residential_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_omits_absent_summary() {
        let estimate = HouseholdEstimate {
            total_households: 42,
            ratio_used: 2.2,
            method: EstimationMethod::StatisticalRatio,
            footprint_summary: None,
        };
        let json = serde_json::to_value(&estimate).unwrap();
        assert!(json.get("footprintSummary").is_none());
        assert_eq!(json["method"], "statistical_ratio");
    }
}
