// 🗄️ Local Storage - durable string key/value store
//
// The store persists one JSON snapshot under one fixed key. Backends only
// need to hold strings; serialization stays in the store.
//
// Backends:
// - FileStorage:   one `<key>.json` file per key inside a data directory
// - SqliteStorage: `kv_store` table in a WAL-mode SQLite database
// - MemoryStorage: shared in-process map, with a switch to simulate failures

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use anyhow::{bail, Result};

/// Key/value storage shaped like browser local storage.
pub trait LocalStorage {
    /// Read the value stored under `key`, `None` if absent
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Keys become file names, so keep them to a safe alphabet.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("storage key must not be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        || key.starts_with('.')
    {
        bail!("invalid storage key: {:?}", key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("salary-calculator-storage").is_ok());
        assert!(validate_key("a_b.c").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("with space").is_err());
    }
}
