use crate::error::Result;

/// Trait for key-value storage backends
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Delete every key
    fn clear(&mut self) -> Result<()>;

    /// Keys currently stored
    fn keys(&self) -> Vec<String>;
}
