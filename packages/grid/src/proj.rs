//! Coordinate reprojection for catchment polygons.
//!
//! The population grid is stored in ETRS89-LAEA (EPSG:3035), an equal-area
//! projection in meters. Isochrone polygons arrive in WGS84 (EPSG:4326)
//! and must be reprojected before any area or intersection math.

use geo::{Coord, MapCoords, Polygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::GridError;

/// PROJ.4 definition for the geographic source CRS (EPSG:4326).
const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// PROJ.4 definition for ETRS89-LAEA Europe (EPSG:3035), the CRS of the
/// JRC population grid. Units are meters.
const ETRS89_LAEA: &str = "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 \
     +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Reprojects catchment polygons from WGS84 into the grid's CRS.
pub struct CatchmentProjector {
    from: Proj,
    to: Proj,
}

impl CatchmentProjector {
    /// Builds the WGS84 → ETRS89-LAEA transform pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Projection`] if either PROJ.4 definition fails
    /// to parse.
    pub fn new() -> Result<Self, GridError> {
        let from = Proj::from_proj_string(WGS84).map_err(|e| GridError::Projection {
            message: format!("invalid source CRS definition: {e}"),
        })?;
        let to = Proj::from_proj_string(ETRS89_LAEA).map_err(|e| GridError::Projection {
            message: format!("invalid target CRS definition: {e}"),
        })?;
        Ok(Self { from, to })
    }

    /// Reprojects every vertex of `polygon` from lon/lat degrees into
    /// projected meters.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Projection`] if any vertex falls outside the
    /// transform's domain.
    pub fn project(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, GridError> {
        // proj4rs takes radians in and produces meters out.
        polygon.try_map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&self.from, &self.to, &mut point).map_err(|e| GridError::Projection {
                message: format!("transform failed at ({}, {}): {e}", coord.x, coord.y),
            })?;
            Ok(Coord {
                x: point.0,
                y: point.1,
            })
        })
    }
}
