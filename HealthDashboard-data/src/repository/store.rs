use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::RepositoryError;

/// Well-known collection names
pub mod collections {
    pub const READINGS: &str = "readings";
    pub const LAB_REPORTS: &str = "lab_reports";
    pub const MEDICATIONS: &str = "medications";
    pub const DOSES: &str = "doses";
}

/// Key-value store holding one JSON document per named collection
///
/// Implementations only move raw documents; decoding and the fallback rules
/// live in [`load_collection`] and [`save_collection`].
pub trait CollectionStore: Send + Sync {
    /// Read the raw document for a collection, `None` if the key is absent
    fn read_raw(&self, collection: &str) -> Result<Option<String>, RepositoryError>;

    /// Replace the raw document for a collection
    fn write_raw(&self, collection: &str, document: &str) -> Result<(), RepositoryError>;

    /// Drop a collection entirely
    fn remove(&self, collection: &str) -> Result<(), RepositoryError>;
}

impl<S: CollectionStore + ?Sized> CollectionStore for Arc<S> {
    fn read_raw(&self, collection: &str) -> Result<Option<String>, RepositoryError> {
        (**self).read_raw(collection)
    }

    fn write_raw(&self, collection: &str, document: &str) -> Result<(), RepositoryError> {
        (**self).write_raw(collection, document)
    }

    fn remove(&self, collection: &str) -> Result<(), RepositoryError> {
        (**self).remove(collection)
    }
}

/// Reject names that could escape a directory or clash with file suffixes
pub fn validate_collection_name(collection: &str) -> Result<(), RepositoryError> {
    let valid = !collection.is_empty()
        && collection.len() <= 64
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidCollection(collection.to_string()))
    }
}

/// Split a document into its array elements
fn parse_entries(collection: &str, document: &str) -> Result<Vec<Value>, RepositoryError> {
    match serde_json::from_str::<Value>(document)? {
        Value::Array(entries) => Ok(entries),
        _ => Err(RepositoryError::Malformed(collection.to_string())),
    }
}

/// Load a collection, falling back to `seed` when it is absent or unreadable
///
/// Never fails: an absent key yields the seed, and a storage error or a
/// document that is not a JSON array is logged and also yields the seed.
/// Entries that do not decode are skipped.
pub fn load_collection_or<T, S, F>(store: &S, collection: &str, seed: F) -> Vec<T>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
    F: FnOnce() -> Vec<T>,
{
    let document = match store.read_raw(collection) {
        Ok(Some(document)) => document,
        Ok(None) => {
            debug!("Collection '{}' not present, using defaults", collection);
            return seed();
        }
        Err(e) => {
            warn!("Failed to read collection '{}', using defaults: {}", collection, e);
            return seed();
        }
    };

    match parse_entries(collection, &document) {
        Ok(entries) => {
            let total = entries.len();
            let items: Vec<T> = entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect();
            if items.len() < total {
                warn!("Skipped {} malformed entries in collection '{}'", total - items.len(), collection);
            }
            debug!("Loaded {} entries from collection '{}'", items.len(), collection);
            items
        }
        Err(e) => {
            warn!("Malformed JSON in collection '{}', using defaults: {}", collection, e);
            seed()
        }
    }
}

/// Load a collection, falling back to an empty list
pub fn load_collection<T, S>(store: &S, collection: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    load_collection_or(store, collection, Vec::new)
}

/// Serialize and write a whole collection back to the store
pub fn save_collection<T, S>(store: &S, collection: &str, items: &[T]) -> Result<(), RepositoryError>
where
    T: Serialize,
    S: CollectionStore + ?Sized,
{
    let document = serde_json::to_string(items)?;
    store.write_raw(collection, &document)?;
    debug!("Saved {} entries to collection '{}'", items.len(), collection);
    Ok(())
}

/// One element of a collection loaded for rewriting
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Entry<T> {
    Decoded(T),
    Raw(Value),
}

/// A collection loaded for a read-modify-write cycle
///
/// Elements that do not decode as `T` are carried through untouched and
/// written back in place, so a rewrite never loses stored data.
#[derive(Debug, Clone)]
pub struct WritableCollection<T> {
    name: String,
    entries: Vec<Entry<T>>,
}

impl<T: Serialize> WritableCollection<T> {
    /// Decoded entries, in stored order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Decoded(item) => Some(item),
            Entry::Raw(_) => None,
        })
    }

    /// First decoded entry matching `predicate`
    pub fn find_mut<P>(&mut self, mut predicate: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Decoded(item) if predicate(&*item) => Some(item),
            _ => None,
        })
    }

    /// Ids of the entries that did not decode
    pub fn raw_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Raw(value) => value.get("id").and_then(Value::as_str),
            Entry::Decoded(_) => None,
        })
    }

    /// Number of entries that did not decode
    pub fn raw_count(&self) -> usize {
        self.entries.iter().filter(|entry| matches!(entry, Entry::Raw(_))).count()
    }

    /// Append a new entry
    pub fn push(&mut self, item: T) {
        self.entries.push(Entry::Decoded(item));
    }

    /// Drop every entry, decoded or not, whose `id` equals `id`
    pub fn remove_id(&mut self, id: &str, id_of: impl Fn(&T) -> &str) {
        self.entries.retain(|entry| match entry {
            Entry::Decoded(item) => id_of(item) != id,
            Entry::Raw(value) => value.get("id").and_then(Value::as_str) != Some(id),
        });
    }

    /// Serialize every entry and write the collection back
    pub fn save<S>(&self, store: &S) -> Result<(), RepositoryError>
    where
        S: CollectionStore + ?Sized,
    {
        let document = serde_json::to_string(&self.entries)?;
        store.write_raw(&self.name, &document)?;
        debug!(
            "Saved {} entries ({} kept undecoded) to collection '{}'",
            self.entries.len(),
            self.raw_count(),
            self.name
        );
        Ok(())
    }
}

/// Load a collection for rewriting
///
/// Unlike [`load_collection`], read failures and documents that are not a
/// JSON array are returned as errors.
pub fn load_collection_for_write<T, S>(store: &S, collection: &str) -> Result<WritableCollection<T>, RepositoryError>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    let entries = match store.read_raw(collection)? {
        Some(document) => parse_entries(collection, &document)?
            .into_iter()
            .map(|value| match serde_json::from_value::<T>(value.clone()) {
                Ok(item) => Entry::Decoded(item),
                Err(e) => {
                    warn!("Keeping undecodable entry in collection '{}': {}", collection, e);
                    Entry::Raw(value)
                }
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(WritableCollection {
        name: collection.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::in_memory::InMemoryStore;
    use crate::repository::tests::UnavailableStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    fn note(id: &str) -> Note {
        Note { id: id.to_string(), text: format!("note {}", id) }
    }

    #[test]
    fn test_collection_name_validation() {
        assert!(validate_collection_name("lab_reports").is_ok());
        assert!(validate_collection_name("doses-2024").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("../etc/passwd").is_err());
        assert!(validate_collection_name("a.json").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let store = InMemoryStore::new();
        save_collection(&store, "notes", &[note("1"), note("2")]).unwrap();

        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert_eq!(loaded, vec![note("1"), note("2")]);
    }

    #[test]
    fn test_absent_collection_is_empty() {
        let store = InMemoryStore::new();
        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_absent_collection_uses_seed() {
        let store = InMemoryStore::new();
        let loaded: Vec<Note> = load_collection_or(&store, "notes", || vec![note("seed")]);
        assert_eq!(loaded, vec![note("seed")]);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let store = InMemoryStore::new().with_document("notes", "{not json");
        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert!(loaded.is_empty());

        let store = InMemoryStore::new().with_document("notes", r#"{"id": "1"}"#);
        let loaded: Vec<Note> = load_collection_or(&store, "notes", || vec![note("seed")]);
        assert_eq!(loaded, vec![note("seed")]);
    }

    #[test]
    fn test_read_failure_falls_back() {
        let loaded: Vec<Note> = load_collection(&UnavailableStore, "notes");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let result = save_collection(&UnavailableStore, "notes", &[note("1")]);
        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = Arc::new(InMemoryStore::new());
        let shared = Arc::clone(&store);
        save_collection(&shared, "notes", &[note("1")]).unwrap();

        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_skips_malformed_entries() {
        let store = InMemoryStore::new().with_document("notes", r#"[{"id":"1","text":"note 1"},{"id":"2"}]"#);
        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert_eq!(loaded, vec![note("1")]);
    }

    #[test]
    fn test_rewrite_keeps_undecodable_entries() {
        let store = InMemoryStore::new().with_document("notes", r#"[{"id":"1","text":"note 1"},{"id":"2"}]"#);

        let mut notes: WritableCollection<Note> = load_collection_for_write(&store, "notes").unwrap();
        assert_eq!(notes.iter().count(), 1);
        assert_eq!(notes.raw_ids().collect::<Vec<_>>(), vec!["2"]);
        notes.push(note("3"));
        notes.save(&store).unwrap();

        let document = store.read_raw("notes").unwrap().unwrap();
        let values: Vec<Value> = serde_json::from_str(&document).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], serde_json::json!({"id": "2"}));

        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert_eq!(loaded, vec![note("1"), note("3")]);
    }

    #[test]
    fn test_rewrite_replaces_by_id() {
        let store = InMemoryStore::new().with_document("notes", r#"[{"id":"1","text":"old"},{"id":"1"},{"id":"2","text":"note 2"}]"#);

        let mut notes: WritableCollection<Note> = load_collection_for_write(&store, "notes").unwrap();
        notes.remove_id("1", |n| n.id.as_str());
        notes.push(note("1"));
        if let Some(second) = notes.find_mut(|n| n.id == "2") {
            second.text = "edited".to_string();
        }
        notes.save(&store).unwrap();

        let loaded: Vec<Note> = load_collection(&store, "notes");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text, "edited");
        assert_eq!(loaded[1], note("1"));
    }

    #[test]
    fn test_load_for_write_propagates_failures() {
        let result = load_collection_for_write::<Note, _>(&UnavailableStore, "notes");
        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));

        let store = InMemoryStore::new().with_document("notes", r#"{"id": "1"}"#);
        let result = load_collection_for_write::<Note, _>(&store, "notes");
        assert!(matches!(result, Err(RepositoryError::Malformed(_))));

        let store = InMemoryStore::new().with_document("notes", "{not json");
        let result = load_collection_for_write::<Note, _>(&store, "notes");
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn test_load_for_write_absent_is_empty() {
        let store = InMemoryStore::new();
        let notes: WritableCollection<Note> = load_collection_for_write(&store, "notes").unwrap();
        assert_eq!(notes.iter().count(), 0);
    }
}
