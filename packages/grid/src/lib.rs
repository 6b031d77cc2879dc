#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory population grid with catchment aggregation.
//!
//! Loads the JRC-style gridded population dataset (EPSG:3035 polygons with
//! a population attribute) from a shapefile at startup, builds an R-tree
//! spatial index, and aggregates population, area, and density for
//! travel-time catchment polygons. The loaded grid is immutable and safe
//! to share across concurrent analysis requests.

mod load;
mod proj;

use std::path::Path;

use geo::{Area, BoundingRect, Intersects, MultiPolygon, Polygon};
use pop_map_grid_models::PopulationStats;
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

pub use load::DEFAULT_POPULATION_FIELD;
pub use proj::CatchmentProjector;

/// Errors from grid loading and projection setup.
#[derive(Debug, Error)]
pub enum GridError {
    /// The shapefile could not be opened or read.
    #[error("failed to read population grid: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// A coordinate transform could not be built or applied.
    #[error("projection error: {message}")]
    Projection {
        /// Description of the failure.
        message: String,
    },
}

/// One cell of the population grid: a polygon in EPSG:3035 with its
/// population count and a cached envelope for the R-tree.
pub struct GridCell {
    population: u64,
    envelope: AABB<[f64; 2]>,
    geometry: MultiPolygon<f64>,
}

impl GridCell {
    /// Creates a cell from a projected geometry and population count.
    #[must_use]
    pub fn new(geometry: MultiPolygon<f64>, population: u64) -> Self {
        let envelope = compute_envelope(&geometry);
        Self {
            population,
            envelope,
            geometry,
        }
    }

    /// Population attributed to this cell.
    #[must_use]
    pub const fn population(&self) -> u64 {
        self.population
    }
}

impl RTreeObject for GridCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// The gridded population dataset with its spatial index.
///
/// Constructed once at startup and shared read-only across requests.
pub struct PopulationGrid {
    cells: RTree<GridCell>,
    projector: CatchmentProjector,
}

impl PopulationGrid {
    /// Loads the grid from a shapefile and builds the R-tree index.
    ///
    /// `population_field` names the numeric attribute carrying the cell
    /// population ([`DEFAULT_POPULATION_FIELD`] for the JRC 2018 grid).
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the shapefile cannot be read or the
    /// projection pipeline cannot be built. Either is fatal at startup:
    /// the service must not serve requests without its dataset.
    pub fn load(path: &Path, population_field: &str) -> Result<Self, GridError> {
        let cells = load::load_cells(path, population_field)?;
        log::info!(
            "Loaded {} population cells from {}",
            cells.len(),
            path.display()
        );
        Self::from_cells(cells)
    }

    /// Builds a grid from already-projected cells (fixtures, tests).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Projection`] if the projection pipeline cannot
    /// be built.
    pub fn from_cells(cells: Vec<GridCell>) -> Result<Self, GridError> {
        Ok(Self {
            cells: RTree::bulk_load(cells),
            projector: CatchmentProjector::new()?,
        })
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.size()
    }

    /// Whether the grid contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.size() == 0
    }

    /// Aggregates population statistics for a catchment polygon given in
    /// WGS84 lon/lat coordinates.
    ///
    /// The polygon is reprojected into the grid's equal-area CRS, every
    /// intersecting cell's population is summed, and area and density are
    /// computed in km². A catchment intersecting no cells yields all-zero
    /// statistics; a degenerate polygon yields zero density. This method
    /// never fails: a vertex outside the projection domain degrades to the
    /// empty result with a warning.
    #[must_use]
    pub fn aggregate(&self, catchment: &Polygon<f64>) -> PopulationStats {
        match self.projector.project(catchment) {
            Ok(projected) => self.aggregate_projected(&projected),
            Err(e) => {
                log::warn!("catchment could not be reprojected, returning empty stats: {e}");
                PopulationStats::empty()
            }
        }
    }

    /// Aggregation over a polygon already in the grid CRS.
    fn aggregate_projected(&self, projected: &Polygon<f64>) -> PopulationStats {
        let Some(rect) = projected.bounding_rect() else {
            return PopulationStats::empty();
        };
        let envelope =
            AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut total_population = 0u64;
        let mut cell_count = 0usize;

        for cell in self.cells.locate_in_envelope_intersecting(&envelope) {
            if cell.geometry.intersects(projected) {
                total_population += cell.population;
                cell_count += 1;
            }
        }

        if cell_count == 0 {
            return PopulationStats::empty();
        }

        let area_km2 = projected.unsigned_area() / 1_000_000.0;
        #[allow(clippy::cast_precision_loss)]
        let density_per_km2 = if area_km2 > 0.0 {
            total_population as f64 / area_km2
        } else {
            0.0
        };

        PopulationStats {
            total_population,
            cell_count,
            area_km2,
            density_per_km2,
        }
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    /// 1 km square cell with its lower-left corner at (x, y) meters.
    fn square_cell(x: f64, y: f64, population: u64) -> GridCell {
        let square = polygon![
            (x: x, y: y),
            (x: x + 1000.0, y: y),
            (x: x + 1000.0, y: y + 1000.0),
            (x: x, y: y + 1000.0),
        ];
        GridCell::new(MultiPolygon(vec![square]), population)
    }

    /// Two adjacent cells straddling the EPSG:3035 false origin
    /// (4321000, 3210000): cell A covers it, cell B sits 500 m east.
    fn fixture_grid() -> PopulationGrid {
        PopulationGrid::from_cells(vec![
            square_cell(4_320_500.0, 3_209_500.0, 100),
            square_cell(4_321_500.0, 3_209_500.0, 50),
        ])
        .unwrap()
    }

    fn projected_square(min_x: f64, min_y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: min_x, y: min_y),
            (x: min_x + size, y: min_y),
            (x: min_x + size, y: min_y + size),
            (x: min_x, y: min_y + size),
        ]
    }

    #[test]
    fn aggregates_single_cell() {
        let grid = fixture_grid();
        let stats = grid.aggregate_projected(&projected_square(4_320_600.0, 3_209_600.0, 200.0));
        assert_eq!(stats.total_population, 100);
        assert_eq!(stats.cell_count, 1);
        assert!((stats.area_km2 - 0.04).abs() < 1e-9);
        assert!((stats.density_per_km2 - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn intersecting_counts_without_containment() {
        // A polygon overlapping both cells counts both populations even
        // though neither cell is fully contained.
        let grid = fixture_grid();
        let stats = grid.aggregate_projected(&projected_square(4_321_300.0, 3_209_600.0, 400.0));
        assert_eq!(stats.total_population, 150);
        assert_eq!(stats.cell_count, 2);
    }

    #[test]
    fn disjoint_catchments_are_additive() {
        let grid = fixture_grid();
        let left = grid.aggregate_projected(&projected_square(4_320_600.0, 3_209_600.0, 100.0));
        let right = grid.aggregate_projected(&projected_square(4_321_600.0, 3_209_600.0, 100.0));
        let both = grid.aggregate_projected(&projected_square(4_320_600.0, 3_209_600.0, 1100.0));

        assert_eq!(
            left.total_population + right.total_population,
            both.total_population
        );
        assert_eq!(left.cell_count + right.cell_count, both.cell_count);
    }

    #[test]
    fn no_intersection_yields_empty_stats() {
        let grid = fixture_grid();
        let stats = grid.aggregate_projected(&projected_square(0.0, 0.0, 500.0));
        assert_eq!(stats, PopulationStats::empty());
    }

    #[test]
    fn degenerate_polygon_has_zero_density() {
        // A zero-area ring must not divide by zero.
        let grid = fixture_grid();
        let point_ring = polygon![
            (x: 4_321_000.0, y: 3_210_000.0),
            (x: 4_321_000.0, y: 3_210_000.0),
            (x: 4_321_000.0, y: 3_210_000.0),
        ];
        let stats = grid.aggregate_projected(&point_ring);
        assert!(stats.area_km2.abs() < f64::EPSILON);
        assert!(stats.density_per_km2.abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_reprojects_geographic_catchments() {
        // A small ring around (10°E, 52°N) lands on the false origin and
        // therefore on cell A only.
        let grid = fixture_grid();
        let catchment = polygon![
            (x: 9.998, y: 51.998),
            (x: 10.002, y: 51.998),
            (x: 10.002, y: 52.002),
            (x: 9.998, y: 52.002),
        ];
        let stats = grid.aggregate(&catchment);
        assert_eq!(stats.total_population, 100);
        assert_eq!(stats.cell_count, 1);
        assert!(stats.area_km2 > 0.0);
        assert!(stats.density_per_km2 > 0.0);
    }
}
