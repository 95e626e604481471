//! # strata
//!
//! Layered design-token pipeline. Tokens live in pages arranged in ordered
//! layers; build configs pick one page per layer, the merged tree is resolved
//! and then transformed and formatted for every platform.
//!
//! The crates are re-exported under their concern names. [`files`] holds the
//! filesystem edge used by the `strata` binary.

pub use strata_core::{
    BuildOutput, BuildReport, Project, ReportedDefect, StrataError, build_all, build_filtered,
    build_one, resolve_config, write_bundle,
};
pub use strata_format as format;
pub use strata_interchange as interchange;
pub use strata_pipeline as pipeline;
pub use strata_tokens as tokens;
pub use strata_transform as transform;
pub use strata_types as types;
pub use strata_values as values;

pub mod files;
