//! Interchange adapter for style-dictionary build configs.
//!
//! Import maps external transform groups, transform identifiers and format
//! identifiers onto local platforms; export runs the same tables in reverse.
//! Only structurally invalid input is an error. Unsupported entries are
//! coerced or dropped and reported as [`ImportWarning`]s.

pub mod error;
pub mod export;
pub mod import;
pub mod tables;

pub use error::InterchangeError;
pub use export::export_config;
pub use import::{ImportResult, ImportWarning, import_config, import_value};
