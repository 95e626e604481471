//! Path-indexed token storage.
//!
//! `TokenStore` keeps every node in a flat map keyed by its dot-path, plus a
//! parent → ordered-children index. Writes to a single path touch only that
//! path and its ancestors instead of cloning the whole tree. Renames and
//! moves re-key the affected subtree only. All validation happens before the
//! first mutation, so a rejected edit leaves the store unchanged. On the wire
//! a store is the nested token tree it holds.

use crate::alias::value_target;
use crate::error::TokenError;
use crate::node::{Group, Token, TokenNode, TokenTree};
use crate::path::{child_path, is_within, last_segment, parent_path, split_path, validate_name};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

const ROOT: &str = "";

/// Group attributes stored without the children (those live in the index).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupAttributes {
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub extensions: Option<Map<String, Value>>,
    pub meta: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoredNode {
    Token(Token),
    Group(GroupAttributes),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenStore {
    nodes: HashMap<String, StoredNode>,
    children: HashMap<String, Vec<String>>,
}

impl Default for TokenStore {
    fn default() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT.to_string(), StoredNode::Group(GroupAttributes::default()));
        Self {
            nodes,
            children: HashMap::new(),
        }
    }
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: &TokenTree) -> Self {
        let mut store = Self::new();
        store.load_group(ROOT, &tree.root);
        store
    }

    fn load_group(&mut self, path: &str, group: &Group) {
        self.nodes.insert(
            path.to_string(),
            StoredNode::Group(GroupAttributes {
                token_type: group.token_type.clone(),
                description: group.description.clone(),
                extensions: group.extensions.clone(),
                meta: group.meta.clone(),
            }),
        );
        let names: Vec<String> = group.children.keys().cloned().collect();
        for (name, child) in &group.children {
            let key = child_path(path, name);
            match child {
                TokenNode::Token(token) => {
                    self.nodes.insert(key, StoredNode::Token(token.clone()));
                }
                TokenNode::Group(g) => self.load_group(&key, g),
            }
        }
        if !names.is_empty() {
            self.children.insert(path.to_string(), names);
        }
    }

    pub fn to_tree(&self) -> TokenTree {
        TokenTree {
            root: self.build_group(ROOT),
        }
    }

    fn build_group(&self, path: &str) -> Group {
        let mut group = match self.nodes.get(path) {
            Some(StoredNode::Group(attrs)) => Group {
                token_type: attrs.token_type.clone(),
                description: attrs.description.clone(),
                extensions: attrs.extensions.clone(),
                meta: attrs.meta.clone(),
                children: IndexMap::new(),
            },
            _ => Group::new(),
        };
        for name in self.children(path) {
            let child = child_path(path, name);
            match self.nodes.get(&child) {
                Some(StoredNode::Token(token)) => {
                    group.children.insert(name.clone(), TokenNode::Token(token.clone()));
                }
                Some(StoredNode::Group(_)) => {
                    group
                        .children
                        .insert(name.clone(), TokenNode::Group(self.build_group(&child)));
                }
                None => {}
            }
        }
        group
    }

    pub fn get(&self, path: &str) -> Option<&StoredNode> {
        self.nodes.get(path)
    }

    pub fn token(&self, path: &str) -> Option<&Token> {
        match self.nodes.get(path) {
            Some(StoredNode::Token(token)) => Some(token),
            _ => None,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Ordered child names of a group (empty for tokens and unknown paths).
    pub fn children(&self, path: &str) -> &[String] {
        self.children.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes, excluding the root group.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_group(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(StoredNode::Group(_)))
    }

    fn link(&mut self, parent: &str, name: &str) {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(name.to_string());
    }

    fn unlink(&mut self, parent: &str, name: &str) {
        if let Some(names) = self.children.get_mut(parent) {
            names.retain(|n| n != name);
            if names.is_empty() {
                self.children.remove(parent);
            }
        }
    }

    /// Creates every missing group along `path`.
    pub fn ensure_group(&mut self, path: &str) -> Result<(), TokenError> {
        let segments = split_path(path);
        for segment in &segments {
            validate_name(segment)?;
        }
        // Validate the whole chain before creating anything.
        let mut walked = String::new();
        for segment in &segments {
            walked = child_path(&walked, segment);
            if let Some(StoredNode::Token(_)) = self.nodes.get(&walked) {
                return Err(TokenError::NotAGroup(walked));
            }
        }

        let mut parent = String::new();
        for segment in segments {
            let current = child_path(&parent, segment);
            if !self.nodes.contains_key(&current) {
                self.nodes
                    .insert(current.clone(), StoredNode::Group(GroupAttributes::default()));
                self.link(&parent, segment);
            }
            parent = current;
        }
        Ok(())
    }

    /// Inserts or replaces the token at `path`.
    pub fn set_token(&mut self, path: &str, token: Token) -> Result<(), TokenError> {
        let parent = parent_path(path).ok_or_else(|| TokenError::NotFound(path.to_string()))?;
        let name = last_segment(path);
        validate_name(name)?;
        if self.is_group(path) {
            return Err(TokenError::NotAToken(path.to_string()));
        }
        self.ensure_group(parent)?;
        if self
            .nodes
            .insert(path.to_string(), StoredNode::Token(token))
            .is_none()
        {
            self.link(parent, name);
        }
        Ok(())
    }

    /// `path` followed by its descendants, depth-first in document order.
    fn subtree_paths(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![path.to_string()];
        while let Some(current) = stack.pop() {
            for name in self.children(&current).iter().rev() {
                stack.push(child_path(&current, name));
            }
            out.push(current);
        }
        out
    }

    /// Removes `path` and everything below it.
    pub fn remove(&mut self, path: &str) -> Result<StoredNode, TokenError> {
        let parent = parent_path(path).ok_or_else(|| TokenError::NotFound(path.to_string()))?;
        if !self.nodes.contains_key(path) {
            return Err(TokenError::NotFound(path.to_string()));
        }
        let mut removed = None;
        for p in self.subtree_paths(path) {
            let node = self.nodes.remove(&p);
            self.children.remove(&p);
            if p == path {
                removed = node;
            }
        }
        self.unlink(parent, last_segment(path));
        removed.ok_or_else(|| TokenError::NotFound(path.to_string()))
    }

    fn rekey(&mut self, from: &str, to: &str) {
        for old in self.subtree_paths(from) {
            let new = format!("{}{}", to, &old[from.len()..]);
            if let Some(node) = self.nodes.remove(&old) {
                self.nodes.insert(new.clone(), node);
            }
            if let Some(names) = self.children.remove(&old) {
                self.children.insert(new, names);
            }
        }
    }

    /// Renames the last segment of `path`, keeping its position among siblings.
    /// Returns the new path.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<String, TokenError> {
        let parent = parent_path(path).ok_or_else(|| TokenError::NotFound(path.to_string()))?;
        validate_name(new_name)?;
        if !self.nodes.contains_key(path) {
            return Err(TokenError::NotFound(path.to_string()));
        }
        let old_name = last_segment(path).to_string();
        if old_name == new_name {
            return Ok(path.to_string());
        }
        let target = child_path(parent, new_name);
        if self.nodes.contains_key(&target) {
            return Err(TokenError::AlreadyExists(target));
        }

        self.rekey(path, &target);
        if let Some(names) = self.children.get_mut(parent)
            && let Some(slot) = names.iter_mut().find(|n| **n == old_name)
        {
            *slot = new_name.to_string();
        }
        Ok(target)
    }

    /// Moves `path` under the group `new_parent` (`""` for the root).
    /// Returns the new path.
    pub fn move_node(&mut self, path: &str, new_parent: &str) -> Result<String, TokenError> {
        let old_parent = parent_path(path).ok_or_else(|| TokenError::NotFound(path.to_string()))?;
        if !self.nodes.contains_key(path) {
            return Err(TokenError::NotFound(path.to_string()));
        }
        if !self.nodes.contains_key(new_parent) {
            return Err(TokenError::NotFound(new_parent.to_string()));
        }
        if !self.is_group(new_parent) {
            return Err(TokenError::NotAGroup(new_parent.to_string()));
        }
        if is_within(new_parent, path) {
            return Err(TokenError::MoveIntoSelf {
                path: path.to_string(),
                target: new_parent.to_string(),
            });
        }
        if old_parent == new_parent {
            return Ok(path.to_string());
        }
        let name = last_segment(path).to_string();
        let target = child_path(new_parent, &name);
        if self.nodes.contains_key(&target) {
            return Err(TokenError::AlreadyExists(target));
        }

        let old_parent = old_parent.to_string();
        self.rekey(path, &target);
        self.unlink(&old_parent, &name);
        self.link(new_parent, &name);
        Ok(target)
    }

    /// All token paths in document order.
    pub fn token_paths(&self) -> Vec<String> {
        self.subtree_paths(ROOT)
            .into_iter()
            .filter(|p| matches!(self.nodes.get(p), Some(StoredNode::Token(_))))
            .collect()
    }

    /// Paths of every token whose value references `target` or a path below
    /// it, in document order.
    pub fn find_references(&self, target: &str) -> Vec<String> {
        self.token_paths()
            .into_iter()
            .filter(|path| {
                self.token(path)
                    .and_then(|token| value_target(&token.value))
                    .is_some_and(|t| is_within(t, target))
            })
            .collect()
    }

    /// Points the reference held by the token at `path` from the `from`
    /// subtree into `to`. Returns whether the token changed.
    pub fn rewrite_reference(&mut self, path: &str, from: &str, to: &str) -> bool {
        let Some(StoredNode::Token(token)) = self.nodes.get_mut(path) else {
            return false;
        };
        let replacement = value_target(&token.value)
            .filter(|t| is_within(t, from))
            .map(|t| format!("{{{}{}}}", to, &t[from.len()..]));
        match replacement {
            Some(value) => {
                token.value = Value::String(value);
                true
            }
            None => false,
        }
    }
}

impl Serialize for TokenStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_tree().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TokenTree::deserialize(deserializer).map(|tree| Self::from_tree(&tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TokenStore {
        let tree = TokenTree::from_value(&json!({
            "colors": {
                "$type": "color",
                "blue": { "$value": "#0066FF" },
                "red": { "$value": "#FF0000" }
            },
            "spacing": { "sm": { "$value": "8px" } }
        }))
        .unwrap();
        TokenStore::from_tree(&tree)
    }

    #[test]
    fn test_tree_round_trip() {
        let s = store();
        assert_eq!(s.len(), 5);
        let tree = s.to_tree();
        assert_eq!(TokenStore::from_tree(&tree), s);
        assert_eq!(s.children("colors"), ["blue", "red"]);
    }

    #[test]
    fn test_set_token_creates_parents() {
        let mut s = store();
        s.set_token("radius.card.lg", Token::new("12px")).unwrap();
        assert!(matches!(s.get("radius.card"), Some(StoredNode::Group(_))));
        assert_eq!(s.token("radius.card.lg").unwrap().value, json!("12px"));
        assert_eq!(s.children(""), ["colors", "spacing", "radius"]);
    }

    #[test]
    fn test_set_token_under_token_is_rejected_without_mutation() {
        let mut s = store();
        let before = s.clone();
        assert_eq!(
            s.set_token("colors.blue.light", Token::new("#fff")),
            Err(TokenError::NotAGroup("colors.blue".to_string()))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_rename_keeps_position_and_subtree() {
        let mut s = store();
        let new_path = s.rename("colors", "palette").unwrap();
        assert_eq!(new_path, "palette");
        assert_eq!(s.children(""), ["palette", "spacing"]);
        assert!(s.token("palette.blue").is_some());
        assert!(s.get("colors.blue").is_none());
    }

    #[test]
    fn test_rename_rejects_duplicates_and_bad_names() {
        let mut s = store();
        let before = s.clone();
        assert_eq!(
            s.rename("colors.blue", "red"),
            Err(TokenError::AlreadyExists("colors.red".to_string()))
        );
        assert!(matches!(
            s.rename("colors.blue", "bad.name"),
            Err(TokenError::InvalidName { .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_move_node() {
        let mut s = store();
        let moved = s.move_node("spacing.sm", "colors").unwrap();
        assert_eq!(moved, "colors.sm");
        assert!(s.children("spacing").is_empty());
        assert_eq!(s.children("colors"), ["blue", "red", "sm"]);

        assert!(matches!(
            s.move_node("colors", "colors"),
            Err(TokenError::MoveIntoSelf { .. })
        ));
        assert_eq!(
            s.move_node("colors.blue", "colors.red"),
            Err(TokenError::NotAGroup("colors.red".to_string()))
        );
    }

    #[test]
    fn test_remove_subtree() {
        let mut s = store();
        s.remove("colors").unwrap();
        assert_eq!(s.token_paths(), vec!["spacing.sm".to_string()]);
        assert_eq!(s.remove("colors"), Err(TokenError::NotFound("colors".to_string())));
    }

    #[test]
    fn test_find_and_rewrite_references() {
        let mut s = store();
        s.set_token("colors.brand", Token::new("{colors.blue}")).unwrap();
        s.set_token("alias.ink", Token::new("{colors}")).unwrap();
        s.set_token("alias.gap", Token::new("{spacing.sm}")).unwrap();
        assert_eq!(s.find_references("colors"), vec!["colors.brand", "alias.ink"]);
        assert_eq!(s.find_references("colors.blue"), vec!["colors.brand"]);

        assert!(s.rewrite_reference("colors.brand", "colors.blue", "colors.azure"));
        assert_eq!(s.token("colors.brand").unwrap().value, json!("{colors.azure}"));
        assert!(!s.rewrite_reference("alias.gap", "colors", "palette"));
        assert!(!s.rewrite_reference("colors", "colors", "palette"));
    }

    #[test]
    fn test_serializes_as_token_tree() {
        let s = store();
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["colors"]["blue"]["$value"], json!("#0066FF"));
        let back: TokenStore = serde_json::from_value(value).unwrap();
        assert_eq!(back, s);
    }
}
