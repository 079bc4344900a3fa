//! Georesolve - reverse geocoding against a fixed set of named polygons
//!
//! This library provides the place registry and resolver used by the
//! `georesolve` binary.

pub mod config;
pub mod error;
pub mod kml;
pub mod models;
pub mod pip;

pub use error::GeoError;
pub use models::{Boundary, GeoPoint, Place};
pub use pip::{GeoResolver, PlaceRegistry};
