use std::path::PathBuf;

use geo::Coord;
use georesolve::pip::StaticSource;
use georesolve::{GeoResolver, PlaceRegistry};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/places.json")
}

#[test]
fn test_sample_dataset_loads() {
    let registry = PlaceRegistry::from_file(sample_path());
    registry.ensure_loaded().unwrap();

    let set = registry.places().unwrap();
    let names: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Praia do Sancho", "Baía dos Porcos", "Baía do Sueste"]
    );
    assert!(set.report().skipped.is_empty());

    // Closing vertex of the KML-style ring is dropped
    assert_eq!(set.places()[1].boundary.len(), 4);
}

#[test]
fn test_sancho() {
    let registry = PlaceRegistry::from_file(sample_path());
    let resolver = GeoResolver::new(&registry);

    assert_eq!(
        resolver.resolve_lon_lat(-32.444, -3.855).as_deref(),
        Some("Praia do Sancho")
    );
}

#[test]
fn test_baia_dos_porcos() {
    let registry = PlaceRegistry::from_file(sample_path());
    let resolver = GeoResolver::new(&registry);

    assert_eq!(
        resolver
            .resolve_lon_lat(-32.44113041999816, -3.8515341888992354)
            .as_deref(),
        Some("Baía dos Porcos")
    );
}

#[test]
fn test_sueste() {
    let registry = PlaceRegistry::from_file(sample_path());
    let resolver = GeoResolver::new(&registry);

    assert_eq!(
        resolver.resolve_lon_lat(-32.421, -3.869).as_deref(),
        Some("Baía do Sueste")
    );
}

#[test]
fn test_unknown_location() {
    let registry = PlaceRegistry::from_file(sample_path());
    let resolver = GeoResolver::new(&registry);

    // Open Atlantic, far from the archipelago
    assert_eq!(resolver.resolve(Coord { x: 0.0, y: 0.0 }), None);
    // On the island but outside every listed beach
    assert_eq!(resolver.resolve_lon_lat(-32.43, -3.86), None);
}

#[test]
fn test_embedded_dataset() {
    let registry = PlaceRegistry::new(StaticSource::new(
        "embedded places.json",
        include_str!("../data/places.json"),
    ));
    let resolver = GeoResolver::new(&registry);

    assert_eq!(
        resolver.resolve_lon_lat(-32.444, -3.855).as_deref(),
        Some("Praia do Sancho")
    );
    assert_eq!(registry.places().unwrap().report().source, "embedded places.json");
}

#[test]
fn test_polling_reuses_snapshot() {
    let registry = PlaceRegistry::from_file(sample_path());
    let resolver = GeoResolver::new(&registry);

    let track = [
        (-32.444, -3.855),
        (-32.4412, -3.8516),
        (0.0, 0.0),
        (-32.421, -3.869),
    ];
    let resolved: Vec<Option<String>> = track
        .iter()
        .map(|&(lon, lat)| resolver.resolve_lon_lat(lon, lat))
        .collect();

    assert_eq!(
        resolved,
        vec![
            Some("Praia do Sancho".to_string()),
            Some("Baía dos Porcos".to_string()),
            None,
            Some("Baía do Sueste".to_string()),
        ]
    );
}
