//! Library side of the `poet` command line tool, split out for testing.

pub mod client;
pub mod commands;
pub mod logging;
pub mod settings;

pub use client::{PoEditorClient, ServiceError};
pub use commands::ExportCommand;
pub use settings::Settings;
