//! Flattens a token tree into an ordered list of leaf tokens.

use crate::node::{Group, TokenNode, TokenTree};
use crate::path::join_path;
use serde_json::{Map, Value};

/// A token with its full path and its effective (declared or inherited) type.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken {
    pub path: Vec<String>,
    pub value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub extensions: Option<Map<String, Value>>,
}

impl FlatToken {
    /// Dot-joined path, the token's canonical name.
    pub fn name(&self) -> String {
        join_path(&self.path)
    }
}

/// Returns every token in document order. A token without `$type` takes the
/// nearest ancestor group's `$type`.
pub fn flatten(tree: &TokenTree) -> Vec<FlatToken> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    walk(&tree.root, tree.root.token_type.as_deref(), &mut path, &mut out);
    out
}

fn walk(group: &Group, inherited: Option<&str>, path: &mut Vec<String>, out: &mut Vec<FlatToken>) {
    for (name, node) in &group.children {
        path.push(name.clone());
        match node {
            TokenNode::Token(token) => out.push(FlatToken {
                path: path.clone(),
                value: token.value.clone(),
                token_type: token
                    .token_type
                    .clone()
                    .or_else(|| inherited.map(str::to_string)),
                description: token.description.clone(),
                extensions: token.extensions.clone(),
            }),
            TokenNode::Group(child) => {
                let inherited = child.token_type.as_deref().or(inherited);
                walk(child, inherited, path, out);
            }
        }
        path.pop();
    }
}
