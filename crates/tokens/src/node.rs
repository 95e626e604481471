//! The recursive token/group structure and its JSON boundary.

use crate::alias::is_alias;
use crate::error::TokenError;
use crate::path::{child_path, split_path, validate_name};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub const VALUE_KEY: &str = "$value";
pub const TYPE_KEY: &str = "$type";
pub const DESCRIPTION_KEY: &str = "$description";
pub const EXTENSIONS_KEY: &str = "$extensions";
pub const NAME_KEY: &str = "$name";

/// A leaf design value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Token {
    pub value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
    /// Vendor-specific metadata, e.g. source-layer provenance.
    pub extensions: Option<Map<String, Value>>,
}

impl Token {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_alias(&self) -> bool {
        is_alias(&self.value)
    }
}

/// An interior node. Children keep their insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Inherited by descendant tokens that lack their own type.
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub extensions: Option<Map<String, Value>>,
    /// Any other `$`-prefixed keys (e.g. the tree-level `$name`).
    pub meta: IndexMap<String, Value>,
    pub children: IndexMap<String, TokenNode>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this group's attributes without its children.
    pub fn shell(&self) -> Self {
        Self {
            token_type: self.token_type.clone(),
            description: self.description.clone(),
            extensions: self.extensions.clone(),
            meta: self.meta.clone(),
            children: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(Group),
}

impl TokenNode {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenNode::Token(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            TokenNode::Group(group) => Some(group),
            TokenNode::Token(_) => None,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, TokenNode::Token(_))
    }
}

/// One complete token document: a root group plus tree-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenTree {
    pub root: Group,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, TokenError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, TokenError> {
        let object = value.as_object().ok_or(TokenError::RootNotObject)?;
        Ok(Self {
            root: parse_group(object, "")?,
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(group_to_map(&self.root))
    }

    pub fn to_json_pretty(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// The tree-level `$name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.root.meta.get(NAME_KEY).and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.root
            .meta
            .insert(NAME_KEY.to_string(), Value::String(name.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walks `path` segment by segment. The empty path is not a node.
    pub fn lookup(&self, path: &str) -> Option<&TokenNode> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut group = &self.root;
        for segment in parents {
            group = group.children.get(*segment)?.as_group()?;
        }
        group.children.get(*last)
    }

    pub fn token(&self, path: &str) -> Option<&Token> {
        self.lookup(path).and_then(TokenNode::as_token)
    }

    /// Inserts or replaces a token, creating intermediate groups.
    pub fn set_token(&mut self, path: &str, token: Token) -> Result<(), TokenError> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(TokenError::NotFound(path.to_string()));
        };
        for segment in &segments {
            validate_name(segment)?;
        }

        let mut group = &mut self.root;
        let mut walked = String::new();
        for segment in parents {
            walked = child_path(&walked, segment);
            let entry = group
                .children
                .entry(segment.to_string())
                .or_insert_with(|| TokenNode::Group(Group::new()));
            group = match entry {
                TokenNode::Group(g) => g,
                TokenNode::Token(_) => return Err(TokenError::NotAGroup(walked)),
            };
        }
        if let Some(TokenNode::Group(_)) = group.children.get(*last) {
            return Err(TokenError::NotAToken(path.to_string()));
        }
        group
            .children
            .insert(last.to_string(), TokenNode::Token(token));
        Ok(())
    }

    /// Number of tokens (not groups) in the tree.
    pub fn token_count(&self) -> usize {
        fn count(group: &Group) -> usize {
            group
                .children
                .values()
                .map(|node| match node {
                    TokenNode::Token(_) => 1,
                    TokenNode::Group(g) => count(g),
                })
                .sum()
        }
        count(&self.root)
    }
}

impl Serialize for TokenTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        TokenTree::from_value(&value).map_err(serde::de::Error::custom)
    }
}

// --- JSON boundary ---

fn string_attribute(value: &Value, path: &str, attribute: &str) -> Result<String, TokenError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TokenError::InvalidAttribute {
            path: path.to_string(),
            attribute: attribute.to_string(),
            message: "expected a string".to_string(),
        })
}

fn object_attribute(
    value: &Value,
    path: &str,
    attribute: &str,
) -> Result<Map<String, Value>, TokenError> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| TokenError::InvalidAttribute {
            path: path.to_string(),
            attribute: attribute.to_string(),
            message: "expected an object".to_string(),
        })
}

fn parse_node(value: &Value, path: &str) -> Result<TokenNode, TokenError> {
    match value.as_object() {
        Some(object) if object.contains_key(VALUE_KEY) => Ok(TokenNode::Token(parse_token(object, path)?)),
        Some(object) => Ok(TokenNode::Group(parse_group(object, path)?)),
        None => {
            log::debug!("Treating bare value at '{}' as token shorthand", path);
            Ok(TokenNode::Token(Token::new(value.clone())))
        }
    }
}

fn parse_token(object: &Map<String, Value>, path: &str) -> Result<Token, TokenError> {
    let mut token = Token::default();
    for (key, value) in object {
        match key.as_str() {
            VALUE_KEY => token.value = value.clone(),
            TYPE_KEY => token.token_type = Some(string_attribute(value, path, key)?),
            DESCRIPTION_KEY => token.description = Some(string_attribute(value, path, key)?),
            EXTENSIONS_KEY => token.extensions = Some(object_attribute(value, path, key)?),
            other => log::trace!("Ignoring key '{}' on token '{}'", other, path),
        }
    }
    Ok(token)
}

fn parse_group(object: &Map<String, Value>, path: &str) -> Result<Group, TokenError> {
    let mut group = Group::new();
    for (key, value) in object {
        if key.starts_with('$') {
            match key.as_str() {
                TYPE_KEY => group.token_type = Some(string_attribute(value, path, key)?),
                DESCRIPTION_KEY => group.description = Some(string_attribute(value, path, key)?),
                EXTENSIONS_KEY => group.extensions = Some(object_attribute(value, path, key)?),
                _ => {
                    group.meta.insert(key.clone(), value.clone());
                }
            }
            continue;
        }
        validate_name(key)?;
        let child = child_path(path, key);
        group.children.insert(key.clone(), parse_node(value, &child)?);
    }
    Ok(group)
}

fn token_to_map(token: &Token) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(VALUE_KEY.to_string(), token.value.clone());
    if let Some(t) = &token.token_type {
        map.insert(TYPE_KEY.to_string(), Value::String(t.clone()));
    }
    if let Some(d) = &token.description {
        map.insert(DESCRIPTION_KEY.to_string(), Value::String(d.clone()));
    }
    if let Some(e) = &token.extensions {
        map.insert(EXTENSIONS_KEY.to_string(), Value::Object(e.clone()));
    }
    map
}

fn group_to_map(group: &Group) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in &group.meta {
        map.insert(key.clone(), value.clone());
    }
    if let Some(t) = &group.token_type {
        map.insert(TYPE_KEY.to_string(), Value::String(t.clone()));
    }
    if let Some(d) = &group.description {
        map.insert(DESCRIPTION_KEY.to_string(), Value::String(d.clone()));
    }
    if let Some(e) = &group.extensions {
        map.insert(EXTENSIONS_KEY.to_string(), Value::Object(e.clone()));
    }
    for (name, child) in &group.children {
        let value = match child {
            TokenNode::Token(token) => token_to_map(token),
            TokenNode::Group(g) => group_to_map(g),
        };
        map.insert(name.clone(), Value::Object(value));
    }
    map
}
