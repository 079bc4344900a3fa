//! KML to place dataset conversion.
//!
//! Reads Placemarks from every `<Folder id="results">` and turns the first
//! `LinearRing` of each (inside `MultiGeometry`, or directly under the
//! Placemark) into a dataset entry. KML tuples are `lon,lat[,alt]`.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{GeoPoint, PlaceRecord};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";
const RESULTS_FOLDER: &str = "results";

#[derive(Debug, Error)]
pub enum KmlError {
    /// Input is not well-formed XML
    #[error("invalid KML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("no folder with id=\"results\" found")]
    NoResultsFolder,

    /// A coordinate tuple component is not a number
    #[error("placemark {placemark:?}: bad coordinate {value:?}")]
    Coordinate { placemark: String, value: String },
}

/// Element matcher that follows the document's namespace convention.
///
/// A namespaced root means every element is looked up in the KML 2.2
/// namespace; otherwise plain local names are used.
#[derive(Clone, Copy)]
struct Tags {
    ns: Option<&'static str>,
}

impl Tags {
    fn for_document(doc: &Document) -> Self {
        let ns = doc
            .root_element()
            .tag_name()
            .namespace()
            .map(|_| KML_NS);
        Self { ns }
    }

    fn is(&self, node: &Node, name: &str) -> bool {
        node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == self.ns
    }

    /// All matching elements below `node`, excluding `node` itself
    fn find_all<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        name: &'a str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        let tags = *self;
        node.descendants().skip(1).filter(move |n| tags.is(n, name))
    }

    /// First matching direct child
    fn find_one<'a, 'input>(&self, node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        node.children().find(|n| self.is(n, name))
    }
}

/// Convert KML text into dataset entries, in document order.
pub fn parse_kml(text: &str) -> Result<Vec<PlaceRecord>, KmlError> {
    let doc = Document::parse(text)?;
    let tags = Tags::for_document(&doc);
    let root = doc.root_element();

    let folders: Vec<Node> = tags
        .find_all(root, "Folder")
        .filter(|f| f.attribute("id") == Some(RESULTS_FOLDER))
        .collect();

    if folders.is_empty() {
        return Err(KmlError::NoResultsFolder);
    }

    let mut records = Vec::new();

    for folder in folders {
        for placemark in tags.find_all(folder, "Placemark") {
            let Some(name) = tags.find_one(placemark, "name") else {
                continue;
            };

            let ring = match tags.find_one(placemark, "MultiGeometry") {
                Some(multi) => tags.find_one(multi, "LinearRing"),
                None => tags.find_one(placemark, "LinearRing"),
            };
            let Some(ring) = ring else {
                continue;
            };

            let Some(coords) = tags.find_one(ring, "coordinates").and_then(|c| c.text()) else {
                continue;
            };

            let name = name.text().unwrap_or_default().trim().to_string();
            let points = parse_coordinates(&name, coords)?;

            if points.is_empty() {
                debug!("Placemark {:?} has no usable points", name);
                continue;
            }

            records.push(PlaceRecord { name, points });
        }
    }

    if records.is_empty() {
        warn!("No valid Placemarks found");
    }

    info!("Converted {} placemarks", records.len());

    Ok(records)
}

/// Parse a whitespace separated list of `lon,lat[,alt]` tuples.
///
/// Tuples with fewer than two components are ignored.
fn parse_coordinates(placemark: &str, text: &str) -> Result<Vec<GeoPoint>, KmlError> {
    let mut points = Vec::new();

    for vertex in text.split_whitespace() {
        let parts: Vec<&str> = vertex.split(',').collect();
        if parts.len() < 2 {
            continue;
        }

        let number = |value: &str| {
            value.parse::<f64>().map_err(|_| KmlError::Coordinate {
                placemark: placemark.to_string(),
                value: value.to_string(),
            })
        };

        let lon = number(parts[0])?;
        let lat = number(parts[1])?;
        points.push(GeoPoint::new(lat, lon));
    }

    Ok(points)
}

/// Default output path: `.kml` swapped for `.json`
pub fn default_output_path(input: &Path) -> PathBuf {
    let replaced = input.to_string_lossy().replace(".kml", ".json");
    let replaced = PathBuf::from(replaced);
    if replaced == input {
        input.with_extension("json")
    } else {
        replaced
    }
}
