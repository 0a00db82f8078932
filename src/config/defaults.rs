pub const DEFAULT_API_ENDPOINT: &str = "https://mufasabrain.onrender.com";

pub fn default_advance_day() -> bool {
    true
}

pub fn default_mode() -> String {
    "chat".to_string()
}
