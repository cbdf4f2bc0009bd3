//! Session snapshot persistence over a key-value backend.

mod memory;

pub use memory::{MemoryStore, MemoryStoreError};

use alloc::{string::String, vec::Vec};
use core::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::session::Speed;

/// Fixed slot the session snapshot lives under.
pub const STORAGE_KEY: &str = "@reading_app_state";

/// Serializable subset of a reading session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "texto")]
    pub full_text: String,
    #[serde(rename = "currentIndex")]
    pub current_index: usize,
    pub speed: Speed,
    pub words: Vec<String>,
    #[serde(rename = "isReading")]
    pub is_reading: bool,
}

impl SessionSnapshot {
    /// Clamps fields that another writer could have left inconsistent.
    pub fn normalized(mut self) -> Self {
        self.current_index = self.current_index.min(self.words.len());
        self
    }
}

/// String key-value storage surface.
pub trait KeyValueStore {
    type Error: fmt::Debug;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// A missing backend behaves as volatile storage: nothing is ever found and
/// every write is accepted.
impl<KV> KeyValueStore for Option<KV>
where
    KV: KeyValueStore,
{
    type Error = KV::Error;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            Some(store) => store.get(key),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            Some(store) => store.set(key, value),
            None => Ok(()),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        match self {
            Some(store) => store.remove(key),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub enum PersistenceError<E> {
    Backend(E),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

/// Best-effort snapshot store.
///
/// Failures are logged and reported as `false`/`None`; they never reach the
/// session as errors.
#[derive(Debug)]
pub struct SessionStore<KV> {
    backend: KV,
    key: &'static str,
}

impl<KV> SessionStore<KV>
where
    KV: KeyValueStore,
{
    pub fn new(backend: KV) -> Self {
        Self {
            backend,
            key: STORAGE_KEY,
        }
    }

    pub fn backend(&self) -> &KV {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut KV {
        &mut self.backend
    }

    pub fn save(&mut self, snapshot: &SessionSnapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => {
                info!(
                    "storage: snapshot saved index={} words={}",
                    snapshot.current_index,
                    snapshot.words.len()
                );
                true
            }
            Err(err) => {
                warn!("storage: save failed: {:?}", err);
                false
            }
        }
    }

    pub fn load(&mut self) -> Option<SessionSnapshot> {
        match self.try_load() {
            Ok(Some(snapshot)) => Some(snapshot.normalized()),
            Ok(None) => {
                debug!("storage: no snapshot under {}", self.key);
                None
            }
            Err(err) => {
                warn!("storage: load failed: {:?}", err);
                None
            }
        }
    }

    pub fn clear(&mut self) -> bool {
        match self.backend.remove(self.key) {
            Ok(()) => true,
            Err(err) => {
                warn!("storage: clear failed: {:?}", PersistenceError::Backend(err));
                false
            }
        }
    }

    pub fn try_save(
        &mut self,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError<KV::Error>> {
        let encoded = serde_json::to_string(snapshot).map_err(PersistenceError::Encode)?;
        self.backend
            .set(self.key, &encoded)
            .map_err(PersistenceError::Backend)
    }

    pub fn try_load(&mut self) -> Result<Option<SessionSnapshot>, PersistenceError<KV::Error>> {
        let Some(raw) = self.backend.get(self.key).map_err(PersistenceError::Backend)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(PersistenceError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            full_text: "one two".to_string(),
            current_index: 2,
            speed: Speed::from_tenths(15),
            words: vec!["one".to_string(), "two".to_string(), "three".to_string()],
            is_reading: false,
        }
    }

    #[test]
    fn record_uses_expected_field_names() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert!(store.save(&snapshot()));

        let raw = store.backend().raw(STORAGE_KEY).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["texto"], "one two");
        assert_eq!(value["currentIndex"], 2);
        assert_eq!(value["speed"], 1.5);
        assert_eq!(value["words"][2], "three");
        assert_eq!(value["isReading"], false);
    }

    #[test]
    fn save_then_load_returns_the_same_snapshot() {
        let mut store = SessionStore::new(MemoryStore::new());
        store.save(&snapshot());
        assert_eq!(store.load(), Some(snapshot()));
    }

    #[test]
    fn loads_record_written_by_another_client() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                STORAGE_KEY,
                r#"{"texto":"a b","currentIndex":1,"speed":2,"words":["a","b","c"],"isReading":true}"#,
            )
            .unwrap();
        let mut store = SessionStore::new(backend);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.full_text, "a b");
        assert_eq!(loaded.current_index, 1);
        assert_eq!(loaded.speed, Speed::from_tenths(20));
        assert!(loaded.is_reading);
    }

    #[test]
    fn corrupt_record_loads_as_nothing() {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, "{not json").unwrap();
        let mut store = SessionStore::new(backend);

        assert_eq!(store.load(), None);
        assert!(matches!(store.try_load(), Err(PersistenceError::Decode(_))));
    }

    #[test]
    fn out_of_range_values_are_normalized_on_load() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                STORAGE_KEY,
                r#"{"texto":"x","currentIndex":99,"speed":7.5,"words":["x"],"isReading":false}"#,
            )
            .unwrap();
        let mut store = SessionStore::new(backend);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.current_index, 1);
        assert_eq!(loaded.speed, Speed::MAX);
    }

    #[test]
    fn clear_removes_the_slot() {
        let mut store = SessionStore::new(MemoryStore::new());
        store.save(&snapshot());
        assert!(store.clear());
        assert_eq!(store.load(), None);
        assert!(store.clear());
    }

    #[test]
    fn backend_failures_are_reported_not_raised() {
        let mut store = SessionStore::new(MemoryStore::new());
        store.save(&snapshot());
        store.backend_mut().set_failing(true);

        assert!(!store.save(&snapshot()));
        assert!(!store.clear());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn missing_backend_is_volatile() {
        let mut store = SessionStore::new(None::<MemoryStore>);
        assert!(store.save(&snapshot()));
        assert_eq!(store.load(), None);
        assert!(store.clear());
    }
}
