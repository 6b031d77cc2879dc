//! Shapefile loading for the population grid.
//!
//! Reads `.shp`/`.dbf` pairs (JRC GEOSTAT-style: one polygon per 1 km cell
//! with a numeric population attribute, already in EPSG:3035) into
//! [`GridCell`] values ready for R-tree bulk load.

use std::path::Path;

use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape};

use crate::{GridCell, GridError};

/// Default name of the population attribute in the JRC 2018 grid.
pub const DEFAULT_POPULATION_FIELD: &str = "TOT_P_2018";

/// Reads all polygon shapes and their population attribute from the
/// shapefile at `path`.
///
/// Non-polygon shapes are skipped. A missing or negative population
/// attribute counts as zero population (the cell is kept).
///
/// # Errors
///
/// Returns [`GridError::Shapefile`] if the file cannot be opened or a
/// record cannot be read.
pub fn load_cells(path: &Path, population_field: &str) -> Result<Vec<GridCell>, GridError> {
    let mut reader = shapefile::Reader::from_path(path)?;

    let mut cells = Vec::with_capacity(reader.shape_count()?);
    let mut skipped = 0usize;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let Shape::Polygon(polygon) = shape else {
            skipped += 1;
            continue;
        };

        let population = match record.get(population_field) {
            Some(FieldValue::Numeric(Some(n))) => to_population(*n),
            Some(FieldValue::Double(n)) => to_population(*n),
            Some(FieldValue::Float(Some(n))) => to_population(f64::from(*n)),
            Some(FieldValue::Integer(n)) => to_population(f64::from(*n)),
            _ => {
                log::debug!("cell without usable {population_field} attribute, counting as 0");
                0
            }
        };

        cells.push(GridCell::new(shp_to_multi_polygon(&polygon), population));
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} non-polygon shapes in population grid");
    }

    Ok(cells)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_population(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Converts a shapefile polygon into a [`geo::MultiPolygon`].
///
/// Shapefiles store rings in declaration order: each outer ring is
/// followed by its holes. Grid cells are plain squares, but the conversion
/// handles the general ring layout anyway.
fn shp_to_multi_polygon(polygon: &shapefile::Polygon) -> geo::MultiPolygon<f64> {
    let mut polygons: Vec<geo::Polygon<f64>> = Vec::new();
    let mut exterior: Option<geo::LineString<f64>> = None;
    let mut holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in polygon.rings() {
        let coords: Vec<geo::Coord<f64>> = ring
            .points()
            .iter()
            .map(|p| geo::Coord { x: p.x, y: p.y })
            .collect();
        let line = geo::LineString(coords);

        match ring {
            PolygonRing::Outer(_) => {
                if let Some(ext) = exterior.take() {
                    polygons.push(geo::Polygon::new(ext, std::mem::take(&mut holes)));
                }
                exterior = Some(line);
            }
            PolygonRing::Inner(_) => holes.push(line),
        }
    }

    if let Some(ext) = exterior {
        polygons.push(geo::Polygon::new(ext, holes));
    }

    geo::MultiPolygon(polygons)
}
