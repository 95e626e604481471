//! Transform engine.
//!
//! Rewrites the display name and value of every resolved token for a target
//! platform. Name transforms always apply; color, size and time transforms
//! only touch tokens whose declared or inherited type belongs to their
//! family, and leave values they cannot parse unchanged.

pub mod groups;
pub mod matcher;
pub mod name;
pub mod transform;

pub use groups::{TRANSFORM_GROUPS, transform_group};
pub use matcher::TokenMatcher;
pub use name::NameCase;
pub use transform::{
    Transform, TransformKind, TransformOptions, TransformedToken, apply_transforms,
};
