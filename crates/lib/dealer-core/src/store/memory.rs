use std::collections::HashMap;
use std::sync::Arc;

use dealer_store::Collection;
use serde_json::Value;

use super::{RecordSource, StoreError, StoreResult};

/// In-memory record source holding one JSON document per collection.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<Collection, Arc<Value>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_collection(mut self, collection: Collection, document: Value) -> Self {
        self.documents.insert(collection, Arc::new(document));
        self
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, collection: Collection) -> StoreResult<Arc<Value>> {
        self.documents
            .get(&collection)
            .cloned()
            .ok_or(StoreError::MissingCollection(collection))
    }
}
