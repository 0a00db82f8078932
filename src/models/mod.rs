mod message;
mod portal;
mod record;

pub use message::{Message, Role};
pub use portal::{default_portals, Portal};
pub use record::{SessionRecord, DAY_CEILING};
