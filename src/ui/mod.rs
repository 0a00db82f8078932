mod output;

pub use output::{
    display_error, display_info, display_message, display_messages_from, display_portal_header,
    display_portals,
};
