use thiserror::Error;

use crate::geom::{GeoBoundingBox, InvalidBox};
use crate::query::{spatial, wire};
use crate::store::location::{self, Location};
use crate::store::{DocumentStore, StoreError};

/// An error surfaced by a bounding-box search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    InvalidBox(#[from] InvalidBox),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Executes bounding-box searches against a document store.
///
/// A search is a single-pass, stateless computation: the box is split at the
/// antimeridian if necessary, one query per resulting box is executed, and
/// the per-box result lists are concatenated in split order (the half west
/// of the antimeridian first). No deduplication is performed across the
/// sub-queries.
pub struct GeoSearchService<S> {
    store: S,
}

impl<S: DocumentStore> GeoSearchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Finds all locations within the bounding box.
    ///
    /// Documents whose geo field is missing or malformed are returned as
    /// locations without a point; documents without a description are
    /// skipped. Any store failure aborts the whole search, even if another
    /// sub-query already returned results.
    pub fn find_locations(&self, bbox: &GeoBoundingBox) -> Result<Vec<Location>, SearchError> {
        let mut locations = Vec::new();

        for sub_box in bbox.split_by_antimeridian()? {
            let clause = spatial::within_bbox(location::FIELD_GEO_POINT, &sub_box);
            let query = wire::render(&clause);

            for raw in self.store.find(&query)? {
                let raw = raw?;
                if let Ok(location) = location::decode(&raw) {
                    locations.push(location);
                }
            }
        }

        Ok(locations)
    }
}
