//! Spatial index for fast place candidate lookups.

use rstar::{RTree, RTreeObject, AABB};

use crate::models::Place;

/// Wrapper for R-tree indexing of a place by its registry ordinal
#[derive(Clone)]
pub struct IndexedPlace {
    pub ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedPlace {
    pub fn new(ordinal: usize, place: &Place) -> Option<Self> {
        let rect = place.bbox()?;
        Some(Self {
            ordinal,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

/// Bounding-box index over an ordered place list.
///
/// Only narrows the search; callers still run the exact containment test.
pub struct PlaceIndex {
    tree: RTree<IndexedPlace>,
}

impl PlaceIndex {
    /// Build spatial index from places in registry order
    pub fn build(places: &[Place]) -> Self {
        let indexed: Vec<IndexedPlace> = places
            .iter()
            .enumerate()
            .filter_map(|(ordinal, place)| IndexedPlace::new(ordinal, place))
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Ordinals of places whose bounding box covers the point, ascending.
    ///
    /// Ascending order keeps first-match-wins resolution identical to a
    /// linear scan over the registry.
    pub fn candidates(&self, lon: f64, lat: f64) -> Vec<usize> {
        let query_envelope = AABB::from_point([lon, lat]);

        let mut ordinals: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|ip| ip.ordinal)
            .collect();
        ordinals.sort_unstable();
        ordinals
    }

    /// Get total number of indexed places
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
