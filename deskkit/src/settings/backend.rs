//! Settings backend trait.

use super::StorageError;

/// Backend trait for settings storage.
///
/// Implementations handle raw string storage/retrieval.
/// The `SettingsProvider` wraps this with typed serialization.
pub trait SettingsBackend: Send + Sync {
    /// Get the raw value for a key.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set the raw value for a key.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a key.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Get all keys matching a prefix.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
