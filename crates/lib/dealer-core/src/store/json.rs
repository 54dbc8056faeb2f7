use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dealer_store::Collection;
use serde_json::Value;

use super::{RecordSource, StoreError, StoreResult};

/// Reads `<data_dir>/<collection>.json` on every fetch.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    data_dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl RecordSource for JsonDirSource {
    fn fetch(&self, collection: Collection) -> StoreResult<Arc<Value>> {
        let path = self.path_for(collection);
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::MissingCollection(collection)
            } else {
                StoreError::Io { path, source }
            }
        })?;
        let document = serde_json::from_str(&text)
            .map_err(|source| StoreError::Parse { collection, source })?;
        Ok(Arc::new(document))
    }
}
