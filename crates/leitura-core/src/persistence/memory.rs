use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
};

use super::KeyValueStore;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemoryStoreError;

/// In-memory backend for bring-up and tests. Can be switched into a failing
/// mode to exercise best-effort paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn check(&self) -> Result<(), MemoryStoreError> {
        if self.failing {
            Err(MemoryStoreError)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        self.check()?;
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.check()?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.check()?;
        self.slots.remove(key);
        Ok(())
    }
}
