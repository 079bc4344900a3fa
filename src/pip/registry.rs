//! Place registry: dataset loading, validation and cached snapshots.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use geo::Coord;
use tracing::{debug, info, warn};

use super::PlaceIndex;
use crate::error::{GeoError, Result};
use crate::models::{Boundary, Place, PlaceRecord};

/// Where the raw dataset text comes from.
pub trait DatasetSource: Send + Sync {
    /// Read the full dataset text
    fn read(&self) -> Result<String>;

    /// Human readable origin, used in diagnostics
    fn describe(&self) -> String;
}

/// Dataset stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetSource for FileSource {
    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| GeoError::DatasetUnavailable {
            dataset: self.describe(),
            reason: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset held in memory, e.g. an asset embedded with `include_str!`
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: String,
    text: Cow<'static, str>,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl DatasetSource for StaticSource {
    fn read(&self) -> Result<String> {
        Ok(self.text.to_string())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Outcome of a single load cycle
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub source: String,
    pub loaded: usize,
    /// One `MalformedEntry` per skipped dataset entry
    pub skipped: Vec<GeoError>,
}

/// Immutable, ordered snapshot of loaded places.
pub struct PlaceSet {
    places: Vec<Place>,
    index: PlaceIndex,
    report: LoadReport,
}

impl PlaceSet {
    /// Build a snapshot from already validated places, keeping their order
    pub fn new(places: Vec<Place>, report: LoadReport) -> Self {
        let index = PlaceIndex::build(&places);
        Self {
            places,
            index,
            report,
        }
    }

    /// Parse dataset text into a snapshot, skipping malformed entries.
    pub fn parse(text: &str, source: &str) -> Result<Self> {
        let records: Vec<PlaceRecord> =
            serde_json::from_str(text).map_err(|e| GeoError::ParseError {
                dataset: source.to_string(),
                reason: e.to_string(),
            })?;

        let mut places = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match validate(index, record) {
                Ok(place) => places.push(place),
                Err(e) => {
                    warn!("{}: {}", source, e);
                    skipped.push(e);
                }
            }
        }

        let report = LoadReport {
            source: source.to_string(),
            loaded: places.len(),
            skipped,
        };

        Ok(Self::new(places, report))
    }

    /// Places in registry (insertion) order
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Places whose bounding box covers the point, in registry order
    pub fn candidates(&self, point: Coord<f64>) -> impl Iterator<Item = &Place> {
        self.index
            .candidates(point.x, point.y)
            .into_iter()
            .map(move |ordinal| &self.places[ordinal])
    }
}

fn validate(index: usize, record: PlaceRecord) -> Result<Place> {
    let malformed = |reason: String| GeoError::MalformedEntry {
        index,
        name: record.name.clone(),
        reason,
    };

    if record.name.trim().is_empty() {
        return Err(malformed("missing name".to_string()));
    }

    let boundary = Boundary::from_points(&record.points);
    if !boundary.is_valid() {
        return Err(malformed(format!(
            "needs at least 3 points, got {}",
            boundary.len()
        )));
    }

    if let Some(bad) = record
        .points
        .iter()
        .find(|p| !p.lat.is_finite() || !p.lon.is_finite())
    {
        return Err(malformed(format!(
            "non-finite point ({}, {})",
            bad.lat, bad.lon
        )));
    }

    Ok(Place::new(record.name, boundary))
}

/// Owner of the loaded place collection.
///
/// Starts uninitialized; the first `ensure_loaded` reads and parses the
/// dataset, later calls reuse the cached snapshot until `reload`.
pub struct PlaceRegistry {
    source: Box<dyn DatasetSource>,
    state: RwLock<Option<Arc<PlaceSet>>>,
}

impl PlaceRegistry {
    pub fn new<S: DatasetSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            state: RwLock::new(None),
        }
    }

    /// Registry backed by a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Load the dataset if nothing is cached yet.
    pub fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        // The write lock is held across the read so concurrent first callers
        // parse once; readers block until the first snapshot lands
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded while we waited for the lock
        if state.is_some() {
            return Ok(());
        }

        *state = Some(Arc::new(self.load()?));
        Ok(())
    }

    /// Re-read the dataset and replace the cached snapshot wholesale.
    ///
    /// On failure the previous snapshot (or uninitialized state) is kept.
    pub fn reload(&self) -> Result<()> {
        let fresh = Arc::new(self.load()?);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Some(fresh);
        Ok(())
    }

    /// Current snapshot, or `None` while uninitialized
    pub fn places(&self) -> Option<Arc<PlaceSet>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn source(&self) -> String {
        self.source.describe()
    }

    fn load(&self) -> Result<PlaceSet> {
        let source = self.source.describe();
        debug!("Reading place dataset from {}", source);

        let text = self.source.read()?;
        let set = PlaceSet::parse(&text, &source)?;

        info!(
            "Loaded {} places from {} ({} skipped)",
            set.len(),
            source,
            set.report().skipped.len()
        );

        Ok(set)
    }
}
