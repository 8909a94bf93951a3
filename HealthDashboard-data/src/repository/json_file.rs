use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::errors::RepositoryError;
use super::store::{validate_collection_name, CollectionStore};

/// Collection store keeping each collection in `<dir>/<collection>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> Result<PathBuf, RepositoryError> {
        validate_collection_name(collection)?;
        Ok(self.dir.join(format!("{}.json", collection)))
    }
}

impl CollectionStore for JsonFileStore {
    fn read_raw(&self, collection: &str) -> Result<Option<String>, RepositoryError> {
        let path = self.path_for(collection)?;
        match fs::read_to_string(&path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    fn write_raw(&self, collection: &str, document: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(collection)?;
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling file first so readers never see a torn document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, document)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote collection '{}' to {}", collection, path.display());
        Ok(())
    }

    fn remove(&self, collection: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(collection)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}
