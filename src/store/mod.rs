mod filesystem;
mod memory;
mod record;
mod storage;

pub use filesystem::FileStore;
pub use memory::MemoryStore;
pub use record::{record_key, RecordStore, ACTIVE_PORTAL_KEY};
pub use storage::KeyValueStore;
