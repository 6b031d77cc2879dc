#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population statistics value types.
//!
//! These types describe the outcome of aggregating the gridded population
//! dataset over a travel-time catchment. They are separate from the grid
//! engine so API-facing crates can depend on the types without pulling in
//! the geometry stack.

use serde::{Deserialize, Serialize};

/// Aggregated population statistics for a catchment area.
///
/// Invariants: `density_per_km2 = total_population / area_km2` when
/// `area_km2 > 0` (otherwise `0`), and a zero `cell_count` implies a zero
/// `total_population`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationStats {
    /// Sum of the population attribute over all intersecting grid cells.
    pub total_population: u64,
    /// Number of grid cells intersecting the catchment.
    pub cell_count: usize,
    /// Catchment area in square kilometers (equal-area projection).
    pub area_km2: f64,
    /// Population density in inhabitants per square kilometer.
    pub density_per_km2: f64,
}

impl PopulationStats {
    /// An all-zero result, used when the catchment intersects no grid
    /// cells or is degenerate.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_population: 0,
            cell_count: 0,
            area_km2: 0.0,
            density_per_km2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_all_zero() {
        let stats = PopulationStats::empty();
        assert_eq!(stats.total_population, 0);
        assert_eq!(stats.cell_count, 0);
        assert!(stats.area_km2.abs() < f64::EPSILON);
        assert!(stats.density_per_km2.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_camel_case() {
        let stats = PopulationStats {
            total_population: 1200,
            cell_count: 3,
            area_km2: 4.5,
            density_per_km2: 266.67,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalPopulation"], 1200);
        assert_eq!(json["cellCount"], 3);
    }
}
