pub mod location;
pub mod memory;

use thiserror::Error;

/// A query document in the store's native JSON query language, produced by
/// [`crate::query::wire::render`]
pub type QueryDocument = serde_json::Value;

/// A document as returned by the store, before decoding
pub type RawDocument = serde_json::Value;

/// A failure reported by the store collaborator. Any store failure is fatal
/// to the sub-query it belongs to; the core performs no retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed to execute the query
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// A geo-indexed document store, consumed only through [`find`].
///
/// Implementations must support the geospatial operators the query layer
/// emits: within-box over two corner positions and within-geometry over a
/// single closed GeoJSON polygon ring. Positions are (longitude, latitude).
///
/// [`find`]: DocumentStore::find
pub trait DocumentStore {
    /// Executes the query and returns a cursor over the matching documents
    fn find(
        &self,
        query: &QueryDocument,
    ) -> Result<impl Iterator<Item = Result<RawDocument, StoreError>>, StoreError>;
}
