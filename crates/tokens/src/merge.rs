//! Deep structural merge of token trees.
//!
//! Tokens are atomic: an incoming token replaces whatever sits at its path.
//! Groups merge recursively, so the merged group holds the union of children.
//! Reserved (`$`) attributes are taken from the last tree that defines them.

use crate::node::{Group, TokenNode, TokenTree};

/// Merges `source` over `target`.
pub fn merge_tree(target: &mut TokenTree, source: &TokenTree) {
    merge_group(&mut target.root, &source.root);
}

pub fn merge_group(target: &mut Group, source: &Group) {
    merge_attributes(target, source);

    for (name, node) in &source.children {
        match node {
            TokenNode::Token(_) => {
                target.children.insert(name.clone(), node.clone());
            }
            TokenNode::Group(incoming) => {
                let slot = target
                    .children
                    .entry(name.clone())
                    .or_insert_with(|| TokenNode::Group(Group::new()));
                if slot.is_token() {
                    log::trace!("Group '{}' replaces a token during merge", name);
                    *slot = TokenNode::Group(Group::new());
                }
                if let TokenNode::Group(existing) = slot {
                    merge_group(existing, incoming);
                }
            }
        }
    }
}

fn merge_attributes(target: &mut Group, source: &Group) {
    if source.token_type.is_some() {
        target.token_type = source.token_type.clone();
    }
    if source.description.is_some() {
        target.description = source.description.clone();
    }
    if source.extensions.is_some() {
        target.extensions = source.extensions.clone();
    }
    for (key, value) in &source.meta {
        target.meta.insert(key.clone(), value.clone());
    }
}
