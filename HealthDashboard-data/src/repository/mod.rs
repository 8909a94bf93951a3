// Repository module structure
pub mod errors;
mod in_memory;
mod json_file;
mod store;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use store::{
    collections, load_collection, load_collection_for_write, load_collection_or, save_collection,
    validate_collection_name, CollectionStore, WritableCollection,
};

/// Store doubles for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::{CollectionStore, RepositoryError};

    /// Store that fails every operation, as if storage were disabled
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UnavailableStore;

    impl CollectionStore for UnavailableStore {
        fn read_raw(&self, _collection: &str) -> Result<Option<String>, RepositoryError> {
            Err(RepositoryError::Unavailable("storage disabled".to_string()))
        }

        fn write_raw(&self, _collection: &str, _document: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("storage disabled".to_string()))
        }

        fn remove(&self, _collection: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("storage disabled".to_string()))
        }
    }
}
