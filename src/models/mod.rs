//! Core data models for place resolution.

pub mod place;

pub use place::{Boundary, GeoPoint, Place, PlaceRecord};
