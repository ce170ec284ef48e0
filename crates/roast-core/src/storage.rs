//! Key-value blob store boundary.

use crate::error::Result;

/// A string key-value store (the browser-storage shape: get/set/remove).
///
/// Implementations must treat removing a missing key as success.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
