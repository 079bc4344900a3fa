//! Resolver mapping a coordinate to the name of the place containing it.

use std::sync::Arc;

use geo::Coord;
use tracing::{debug, warn};

use super::geometry::contains;
use super::{PlaceRegistry, PlaceSet};
use crate::error::{GeoError, Result};

/// Point-in-polygon place lookup over a registry.
///
/// Places are tested in registry order and the first containing place wins,
/// so overlapping boundaries resolve to whichever was listed first.
pub struct GeoResolver<'a> {
    registry: &'a PlaceRegistry,
}

impl<'a> GeoResolver<'a> {
    pub fn new(registry: &'a PlaceRegistry) -> Self {
        Self { registry }
    }

    /// Name of the first place containing the point, or `None`.
    ///
    /// Never fails: load errors and invalid input are logged and read as
    /// "no match".
    pub fn resolve(&self, point: Coord<f64>) -> Option<String> {
        match self.try_resolve(point) {
            Ok(name) => name,
            Err(e) => {
                warn!("Place lookup at ({}, {}) failed: {}", point.x, point.y, e);
                None
            }
        }
    }

    /// Convenience wrapper taking (longitude, latitude)
    pub fn resolve_lon_lat(&self, lon: f64, lat: f64) -> Option<String> {
        self.resolve(Coord { x: lon, y: lat })
    }

    /// Like [`resolve`](Self::resolve) but surfaces load and input errors.
    pub fn try_resolve(&self, point: Coord<f64>) -> Result<Option<String>> {
        let set = self.snapshot(point)?;

        let found = set
            .candidates(point)
            .filter(|place| place.boundary.is_valid())
            .find(|place| contains(point, place.boundary.vertices()))
            .map(|place| place.name.clone());

        debug!(
            "Lookup at ({}, {}): {}",
            point.x,
            point.y,
            found.as_deref().unwrap_or("no match")
        );

        Ok(found)
    }

    /// Every place containing the point, in registry order.
    pub fn resolve_all(&self, point: Coord<f64>) -> Vec<String> {
        match self.matching_all(point) {
            Ok(names) => names,
            Err(e) => {
                warn!("Place lookup at ({}, {}) failed: {}", point.x, point.y, e);
                Vec::new()
            }
        }
    }

    fn matching_all(&self, point: Coord<f64>) -> Result<Vec<String>> {
        let set = self.snapshot(point)?;

        Ok(set
            .candidates(point)
            .filter(|place| place.boundary.is_valid())
            .filter(|place| contains(point, place.boundary.vertices()))
            .map(|place| place.name.clone())
            .collect())
    }

    fn snapshot(&self, point: Coord<f64>) -> Result<Arc<PlaceSet>> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(GeoError::InvalidInput {
                x: point.x,
                y: point.y,
            });
        }

        self.registry.ensure_loaded()?;

        self.registry
            .places()
            .ok_or_else(|| GeoError::DatasetUnavailable {
                dataset: self.registry.source(),
                reason: "registry not loaded".to_string(),
            })
    }

    pub fn registry(&self) -> &PlaceRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::StaticSource;

    const OVERLAP: &str = r#"[
        {"name": "A", "points": [{"lat": 0, "lon": 0}, {"lat": 10, "lon": 0}, {"lat": 10, "lon": 10}, {"lat": 0, "lon": 10}]},
        {"name": "B", "points": [{"lat": 5, "lon": 5}, {"lat": 15, "lon": 5}, {"lat": 15, "lon": 15}, {"lat": 5, "lon": 15}]},
        {"name": "C", "points": [{"lat": 20, "lon": 20}, {"lat": 30, "lon": 20}, {"lat": 30, "lon": 30}]}
    ]"#;

    fn registry(text: &'static str) -> PlaceRegistry {
        PlaceRegistry::new(StaticSource::new("test", text))
    }

    #[test]
    fn test_first_registered_wins() {
        let registry = registry(OVERLAP);
        let resolver = GeoResolver::new(&registry);

        assert_eq!(resolver.resolve_lon_lat(7.0, 7.0), Some("A".to_string()));
        assert_eq!(resolver.resolve_lon_lat(12.0, 12.0), Some("B".to_string()));
        assert_eq!(
            resolver.resolve_all(Coord { x: 7.0, y: 7.0 }),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_order_reversed_dataset() {
        let registry = registry(
            r#"[
            {"name": "B", "points": [{"lat": 5, "lon": 5}, {"lat": 15, "lon": 5}, {"lat": 15, "lon": 15}, {"lat": 5, "lon": 15}]},
            {"name": "A", "points": [{"lat": 0, "lon": 0}, {"lat": 10, "lon": 0}, {"lat": 10, "lon": 10}, {"lat": 0, "lon": 10}]}
        ]"#,
        );
        let resolver = GeoResolver::new(&registry);
        assert_eq!(resolver.resolve_lon_lat(7.0, 7.0), Some("B".to_string()));
    }

    #[test]
    fn test_no_match() {
        let registry = registry(OVERLAP);
        let resolver = GeoResolver::new(&registry);

        assert_eq!(resolver.resolve_lon_lat(-50.0, -50.0), None);
        // Inside C's bounding box but outside the triangle
        assert_eq!(resolver.resolve_lon_lat(29.0, 21.0), None);
        assert!(resolver.resolve_all(Coord { x: -50.0, y: -50.0 }).is_empty());
    }

    #[test]
    fn test_lazy_load_on_first_resolve() {
        let registry = registry(OVERLAP);
        assert!(!registry.is_loaded());

        let resolver = GeoResolver::new(&registry);
        assert_eq!(resolver.resolve_lon_lat(22.0, 25.0), Some("C".to_string()));
        assert!(registry.is_loaded());
    }

    #[test]
    fn test_load_failure_degrades_to_none() {
        let registry = registry("not json");
        let resolver = GeoResolver::new(&registry);

        assert_eq!(resolver.resolve_lon_lat(1.0, 1.0), None);
        assert!(matches!(
            resolver.try_resolve(Coord { x: 1.0, y: 1.0 }),
            Err(GeoError::ParseError { .. })
        ));
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_missing_dataset_degrades_to_none() {
        let registry = PlaceRegistry::from_file("/nonexistent/places.json");
        let resolver = GeoResolver::new(&registry);

        assert_eq!(resolver.resolve_lon_lat(1.0, 1.0), None);
        assert!(resolver.resolve_all(Coord { x: 1.0, y: 1.0 }).is_empty());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let registry = registry(OVERLAP);
        let resolver = GeoResolver::new(&registry);

        assert!(matches!(
            resolver.try_resolve(Coord { x: f64::NAN, y: 1.0 }),
            Err(GeoError::InvalidInput { .. })
        ));
        assert!(matches!(
            resolver.try_resolve(Coord { x: 1.0, y: f64::INFINITY }),
            Err(GeoError::InvalidInput { .. })
        ));
        assert_eq!(resolver.resolve_lon_lat(f64::NAN, f64::NAN), None);
    }

    #[test]
    fn test_empty_registry() {
        let registry = registry("[]");
        let resolver = GeoResolver::new(&registry);
        assert_eq!(resolver.try_resolve(Coord { x: 0.0, y: 0.0 }), Ok(None));
    }
}
