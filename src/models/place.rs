//! Place and boundary types shared by the registry and resolver.

use geo::{BoundingRect, Coord, LineString, Rect};
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon) as it appears in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar coordinate used by the containment test: lon -> x, lat -> y
    pub fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// One raw dataset entry, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub points: Vec<GeoPoint>,
}

/// Closed polygon ring. The last vertex implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    vertices: Vec<Coord<f64>>,
}

impl Boundary {
    pub fn new(vertices: Vec<Coord<f64>>) -> Self {
        Self { vertices }
    }

    /// Build a boundary from dataset points.
    ///
    /// A repeated closing vertex is dropped as long as 3 vertices remain.
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let mut vertices: Vec<Coord<f64>> = points.iter().map(|p| p.to_coord()).collect();
        if vertices.len() > 3 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A ring needs at least 3 vertices to enclose anything
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        LineString::new(self.vertices.clone()).bounding_rect()
    }
}

/// A named region. Created once at load time and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub boundary: Boundary,
}

impl Place {
    pub fn new(name: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }

    /// Bounding box of the boundary, if it has any vertices
    pub fn bbox(&self) -> Option<Rect<f64>> {
        self.boundary.bounding_rect()
    }
}
