#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Household estimation engine.
//!
//! Converts a catchment population into a household count using
//! country-specific persons-per-household ratios, optionally blended with
//! building-footprint evidence from a [`FootprintSource`]. Estimation is
//! deterministic and never fails: a failing footprint source only
//! downgrades the estimation method.

pub mod ratios;

use async_trait::async_trait;
use pop_map_households_models::{
    BoundingBox, BuildingFootprintSummary, EstimationMethod, HouseholdEstimate,
};

pub use ratios::{DEFAULT_RATIO, SUPPORTED_COUNTRIES, ratio_for};

/// Blending parameters for the hybrid estimate.
///
/// The defaults (70 % statistical, 30 % OSM, 1.5 households per
/// residential building) are fixed design constants; they are exposed as
/// configuration for calibration but must default to exactly these values
/// so results stay reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendConfig {
    /// Weight of the statistical (population ÷ ratio) estimate.
    pub statistical_weight: f64,
    /// Weight of the OSM building-derived estimate.
    pub osm_weight: f64,
    /// Average households per residential building.
    pub households_per_building: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            statistical_weight: 0.7,
            osm_weight: 0.3,
            households_per_building: 1.5,
        }
    }
}

/// Source of building-footprint counts for a bounding box.
///
/// Implementations must treat upstream failures as best-effort data loss:
/// return [`BuildingFootprintSummary::empty`] rather than an error, so
/// footprint availability only ever affects estimation quality.
#[async_trait]
pub trait FootprintSource: Send + Sync {
    /// Fetches and classifies the building footprints inside `bbox`.
    async fn fetch_summary(&self, bbox: &BoundingBox) -> BuildingFootprintSummary;
}

/// Footprint source that always reports zero buildings.
///
/// Disables hybrid estimation without touching the blender logic.
pub struct NoFootprints;

#[async_trait]
impl FootprintSource for NoFootprints {
    async fn fetch_summary(&self, _bbox: &BoundingBox) -> BuildingFootprintSummary {
        BuildingFootprintSummary::empty()
    }
}

/// Statistical household count: `round(population / ratio)`.
///
/// Rounding is half-away-from-zero, the rule used everywhere in this
/// engine.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn statistical_households(population: u64, ratio: f64) -> u64 {
    if population == 0 {
        return 0;
    }
    (population as f64 / ratio).round() as u64
}

/// Estimates household counts for catchment populations.
pub struct HouseholdEstimator {
    source: Box<dyn FootprintSource>,
    config: BlendConfig,
}

impl HouseholdEstimator {
    /// Creates an estimator with the default blend parameters.
    #[must_use]
    pub fn new(source: Box<dyn FootprintSource>) -> Self {
        Self::with_config(source, BlendConfig::default())
    }

    /// Creates an estimator with explicit blend parameters.
    #[must_use]
    pub fn with_config(source: Box<dyn FootprintSource>, config: BlendConfig) -> Self {
        Self { source, config }
    }

    /// Estimates the number of households for `population` inhabitants.
    ///
    /// With no `bbox` the result is the pure statistical estimate. With a
    /// `bbox`, footprints are fetched and, when residential buildings are
    /// present, blended in as
    /// `round(w_stat × statistical + w_osm × residential × occupancy)`.
    /// A footprint fetch that fails or finds no buildings falls back to
    /// the statistical estimate. Zero population short-circuits to a zero
    /// estimate.
    pub async fn estimate(
        &self,
        population: u64,
        country_code: &str,
        bbox: Option<&BoundingBox>,
    ) -> HouseholdEstimate {
        let ratio_used = ratio_for(country_code);

        if population == 0 {
            return HouseholdEstimate {
                total_households: 0,
                ratio_used,
                method: EstimationMethod::NoPopulation,
                footprint_summary: None,
            };
        }

        let statistical = statistical_households(population, ratio_used);

        let Some(bbox) = bbox else {
            return HouseholdEstimate {
                total_households: statistical,
                ratio_used,
                method: EstimationMethod::StatisticalRatio,
                footprint_summary: None,
            };
        };

        log::debug!("Fetching building footprints for the catchment bounding box");
        let summary = self.source.fetch_summary(bbox).await;

        if summary.residential_count == 0 {
            // Nothing fetched, or no residential buildings: the footprint
            // data did not contribute.
            let footprint_summary = (summary.total_count > 0).then_some(summary);
            return HouseholdEstimate {
                total_households: statistical,
                ratio_used,
                method: EstimationMethod::StatisticalRatio,
                footprint_summary,
            };
        }

        let total_households = self.blend(statistical, &summary);

        HouseholdEstimate {
            total_households,
            ratio_used,
            method: EstimationMethod::HybridStatisticalOsm,
            footprint_summary: Some(summary),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn blend(&self, statistical: u64, summary: &BuildingFootprintSummary) -> u64 {
        let osm_estimate =
            (summary.residential_count as f64 * self.config.households_per_building).round();

        let weighted = self.config.statistical_weight * statistical as f64
            + self.config.osm_weight * osm_estimate;

        // The weights are decimal quantities; snap the weighted sum to one
        // decimal before the final rounding so halves like 3271.5 are not
        // dragged under the boundary by binary representation error.
        let snapped = (weighted * 10.0).round() / 10.0;
        snapped.round() as u64
    }
}
