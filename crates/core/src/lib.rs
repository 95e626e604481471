//! # strata-core
//!
//! Project documents and the build chain for layered design tokens.
//!
//! This crate ties the pipeline crates together:
//! - **project**: the persisted project document (pipeline plus platforms)
//! - **build**: merge → resolve → transform → format for every target
//! - **bundle**: a gzipped tar of build outputs
//! - **error**: the umbrella error type
//!
//! ## Design Principle
//!
//! Nothing here touches the filesystem. Documents come in as text and
//! bundles go out through any `Write`; callers own the IO.

// Re-export foundation crates
pub use strata_tokens as tokens;
pub use strata_types as types;
pub use strata_values as values;

// Re-export pipeline crates
pub use strata_format as format;
pub use strata_interchange as interchange;
pub use strata_pipeline as pipeline;
pub use strata_transform as transform;

pub mod build;
pub mod bundle;
pub mod error;
pub mod project;

pub use build::{
    BuildOutput, BuildReport, ReportedDefect, build_all, build_filtered, build_one, output_file_name,
    render_platform, resolve_config,
};
pub use bundle::{bundle_path, write_bundle};
pub use error::StrataError;
pub use project::Project;
