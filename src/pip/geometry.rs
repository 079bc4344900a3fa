//! Even-odd ray casting containment test.
//!
//! A horizontal ray is cast from the query point towards +x and every
//! polygon edge it crosses flips the inside flag. Works for convex and
//! concave simple polygons with 3 or more vertices.
//!
//! Points lying exactly on an edge or vertex have no guaranteed
//! classification: the result is whatever the crossing count yields.

use geo::Coord;
use tracing::error;

use crate::error::{GeoError, Result};

/// Check whether `point` lies inside `polygon`.
///
/// Polygons with fewer than 3 vertices are reported as `InvalidGeometry`
/// and treated as containing nothing.
pub fn contains(point: Coord<f64>, polygon: &[Coord<f64>]) -> bool {
    match try_contains(point, polygon) {
        Ok(inside) => inside,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

/// Same as [`contains`], but surfaces degenerate polygons as an error.
pub fn try_contains(point: Coord<f64>, polygon: &[Coord<f64>]) -> Result<bool> {
    if polygon.len() < 3 {
        return Err(GeoError::InvalidGeometry {
            vertices: polygon.len(),
        });
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];

        // Straddling guarantees pj.y != pi.y, so the division is safe
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }

        j = i;
    }

    Ok(inside)
}
