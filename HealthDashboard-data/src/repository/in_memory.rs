use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::errors::RepositoryError;
use super::store::CollectionStore;

/// In-memory collection store, the stand-in for browser local storage
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    /// Raw JSON documents keyed by collection name
    documents: Arc<Mutex<HashMap<String, String>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Pre-populate a collection with a raw document
    pub fn with_document(self, collection: &str, document: &str) -> Self {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(collection.to_string(), document.to_string());
        }
        self
    }

    /// Names of the collections currently held
    pub fn collection_names(&self) -> Result<Vec<String>, RepositoryError> {
        let documents = self.documents.lock()?;
        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl CollectionStore for InMemoryStore {
    fn read_raw(&self, collection: &str) -> Result<Option<String>, RepositoryError> {
        let documents = self.documents.lock()?;
        Ok(documents.get(collection).cloned())
    }

    fn write_raw(&self, collection: &str, document: &str) -> Result<(), RepositoryError> {
        let mut documents = self.documents.lock()?;
        documents.insert(collection.to_string(), document.to_string());
        Ok(())
    }

    fn remove(&self, collection: &str) -> Result<(), RepositoryError> {
        let mut documents = self.documents.lock()?;
        documents.remove(collection);
        Ok(())
    }
}
