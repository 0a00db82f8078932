pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod speech;
pub mod store;
pub mod ui;

pub use controller::{ControllerOptions, PendingQuestion, PortalController, SubmitOutcome};
pub use error::{PortalError, Result};
