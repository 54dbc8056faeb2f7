//! Record sources and the read-only data store.
//!
//! A `RecordSource` hands back the raw JSON document for a collection. The
//! `DataStore` decodes it into typed records and degrades every failure to an
//! empty collection, logging the cause instead of returning it.

pub mod cached;
pub mod json;
pub mod memory;

use std::{error::Error, fmt, io, path::PathBuf, sync::Arc};

use dealer_store::{Collection, Contract, Customer, Vehicle, Visit};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub use cached::CachedSource;
pub use json::JsonDirSource;
pub use memory::MemorySource;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Parse { collection: Collection, source: serde_json::Error },
    MissingCollection(Collection),
    NotAnArray(Collection),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { collection, source } => {
                write!(f, "malformed {collection} collection: {source}")
            }
            Self::MissingCollection(collection) => {
                write!(f, "collection not available: {collection}")
            }
            Self::NotAnArray(collection) => {
                write!(f, "collection {collection} is not a JSON array")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::MissingCollection(_) | Self::NotAnArray(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of raw collection documents.
pub trait RecordSource: Send + Sync {
    /// Fetches the JSON document holding every record of `collection`.
    ///
    /// # Errors
    /// Returns `StoreError` when the collection is missing or unreadable.
    fn fetch(&self, collection: Collection) -> StoreResult<Arc<Value>>;
}

/// Typed, failure-tolerant view over a `RecordSource`.
#[derive(Clone)]
pub struct DataStore {
    source: Arc<dyn RecordSource>,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore").finish_non_exhaustive()
    }
}

impl DataStore {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    #[must_use]
    pub fn from_arc(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Loads every decodable record of `collection`.
    ///
    /// A missing or malformed collection yields an empty vector. Records that
    /// do not decode into `T` are skipped.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let document = match self.source.fetch(collection) {
            Ok(document) => document,
            Err(err) => {
                warn!(%collection, error = %err, "collection unavailable, treating as empty");
                return Vec::new();
            }
        };

        let Some(items) = document.as_array() else {
            warn!(
                %collection,
                error = %StoreError::NotAnArray(collection),
                "collection unavailable, treating as empty"
            );
            return Vec::new();
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match T::deserialize(item) {
                Ok(record) => records.push(record),
                Err(err) => warn!(%collection, index, error = %err, "skipping malformed record"),
            }
        }
        debug!(%collection, count = records.len(), "loaded collection");
        records
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.load(Collection::Customers)
    }

    pub fn contracts(&self) -> Vec<Contract> {
        self.load(Collection::Contracts)
    }

    pub fn visits(&self) -> Vec<Visit> {
        self.load(Collection::Visits)
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.load(Collection::Vehicles)
    }
}
