//! Token tree model for layered design tokens.
//!
//! A token file is a nested JSON object. A node carrying `$value` is a
//! [`Token`]; any other object is a [`Group`]. Files are parsed into the
//! [`TokenNode`] sum type once at the boundary and every other operation
//! works on that type.

pub mod alias;
pub mod error;
pub mod flatten;
pub mod merge;
pub mod node;
pub mod path;
pub mod store;

pub use alias::{
    DEFAULT_MAX_DEPTH, ResolvedToken, alias_target, is_alias, resolve_alias, resolve_tokens,
    resolve_value_deep,
};
pub use error::TokenError;
pub use flatten::{FlatToken, flatten};
pub use merge::{merge_group, merge_tree};
pub use node::{Group, Token, TokenNode, TokenTree};
pub use path::{join_path, split_path, validate_name};
pub use store::{GroupAttributes, StoredNode, TokenStore};
