//! Point-in-Polygon (PIP) place lookup.
//!
//! Loads named place boundaries from a dataset and answers
//! "which place contains this coordinate" with an even-odd ray casting
//! test, using an R-tree over bounding boxes to narrow candidates.

pub mod geometry;
mod index;
mod registry;
mod service;

pub use geometry::{contains, try_contains};
pub use index::PlaceIndex;
pub use registry::{DatasetSource, FileSource, LoadReport, PlaceRegistry, PlaceSet, StaticSource};
pub use service::GeoResolver;
