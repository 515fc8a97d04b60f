use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::LocalStorage;

/// In-process storage. Clones share the same map, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with one entry
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut items) = storage.items.write() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }

    /// Make every subsequent `set_item`/`remove_item` fail (quota exceeded)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("storage quota exceeded");
        }
        Ok(())
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.check_writable()?;
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v2".to_string()));

        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_clones_share_items() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.set_item("k", "v").unwrap();
        assert_eq!(observer.get_item("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_fail_writes() {
        let mut storage = MemoryStorage::with_item("k", "old");
        storage.set_fail_writes(true);

        let err = storage.set_item("k", "new").unwrap_err();
        assert!(err.to_string().contains("quota"));
        assert!(storage.remove_item("k").is_err());
        // Reads still work and nothing changed
        assert_eq!(storage.get_item("k").unwrap(), Some("old".to_string()));

        storage.set_fail_writes(false);
        storage.set_item("k", "new").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("new".to_string()));
    }
}
