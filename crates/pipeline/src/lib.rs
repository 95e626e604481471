//! The layered token pipeline.
//!
//! A [`Pipeline`] owns ordered [`Layer`]s, parameterization [`Variable`]s and
//! the [`Page`] collection. Pages reference their layer by id. Everything
//! that computes a view of the pipeline (slots, merges, provenance, build
//! configs) is a pure function of the pipeline passed in.

pub mod config;
pub mod effective;
pub mod error;
pub mod merge;
pub mod model;
pub mod slots;

pub use config::{BuildConfig, all_build_configs, default_build_config};
pub use effective::{EffectiveTokens, NodeKind, Provenance, compute_effective_tokens};
pub use error::PipelineModelError;
pub use merge::{BuildDefect, DefectReason, MergeResult, build_tokens, build_tokens_up_to};
pub use model::{Assignment, Dependent, Layer, Page, PathChange, Pipeline, Variable};
