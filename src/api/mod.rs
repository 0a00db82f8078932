pub mod client;
pub mod models;

pub use client::{normalize_base_url, AnswerService, HttpAnswerService};
pub use models::{AskRequest, AskResponse, HealthStatus};
