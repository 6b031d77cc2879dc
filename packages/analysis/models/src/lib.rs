#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis request and result types.
//!
//! The request mirrors the public API body; the result is the record the
//! orchestrator assembles per request. Both serialize as camelCase JSON.

use pop_map_grid_models::PopulationStats;
use pop_map_households_models::HouseholdEstimate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Travel mode for the isochrone, using `OpenRouteService` profile ids.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TravelProfile {
    /// Car travel.
    #[default]
    DrivingCar,
    /// Regular bicycle travel.
    CyclingRegular,
    /// Walking.
    FootWalking,
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
}

/// One analysis request: an address and a travel-time budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Free-form address to analyze.
    pub address: String,
    /// Travel-time budget in minutes (1-60).
    #[serde(default = "default_time_minutes")]
    pub time_minutes: u32,
    /// Travel mode.
    #[serde(default)]
    pub profile: TravelProfile,
}

const fn default_time_minutes() -> u32 {
    10
}

/// The assembled outcome of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The address as submitted.
    pub address: String,
    /// Geocoded coordinates the catchment was computed from.
    pub coordinates: Coordinates,
    /// Requested travel-time budget in minutes.
    pub time_minutes: u32,
    /// Requested travel mode.
    pub profile: TravelProfile,
    /// Country code inferred from the address (best-effort heuristic).
    pub country_code: String,
    /// Population statistics for the catchment.
    pub population: PopulationStats,
    /// Household estimate for the catchment.
    pub households: HouseholdEstimate,
    /// Households per square kilometer (`0` for a zero-area catchment).
    pub household_density_per_km2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn profile_uses_ors_ids() {
        assert_eq!(TravelProfile::DrivingCar.to_string(), "driving-car");
        assert_eq!(TravelProfile::CyclingRegular.to_string(), "cycling-regular");
        assert_eq!(TravelProfile::FootWalking.to_string(), "foot-walking");
        assert_eq!(
            TravelProfile::from_str("foot-walking").unwrap(),
            TravelProfile::FootWalking
        );
        assert!(TravelProfile::from_str("rocket").is_err());
    }

    #[test]
    fn request_defaults() {
        let request: AnalysisRequest =
            serde_json::from_value(serde_json::json!({ "address": "Paris, France" })).unwrap();
        assert_eq!(request.time_minutes, 10);
        assert_eq!(request.profile, TravelProfile::DrivingCar);
    }

    #[test]
    fn request_rejects_unknown_profile() {
        let result: Result<AnalysisRequest, _> = serde_json::from_value(serde_json::json!({
            "address": "Paris, France",
            "profile": "teleport"
        }));
        assert!(result.is_err());
    }
}
