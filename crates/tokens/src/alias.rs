//! Alias (reference) resolution.
//!
//! A token value of the exact form `{dot.separated.path}` refers to another
//! token in the same resolved tree. Resolution never fails: a reference to a
//! missing path stays as the reference string, and a chain that exhausts the
//! depth budget freezes at the last value reached.

use crate::flatten::FlatToken;
use crate::node::{TokenNode, TokenTree};
use serde_json::Value;
use std::collections::HashMap;

/// Depth budget for following alias chains.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Returns the referenced path if `text` is a single-braced reference.
pub fn alias_target(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('{') || inner.contains('}') {
        return None;
    }
    Some(inner)
}

pub fn is_alias(value: &Value) -> bool {
    value.as_str().and_then(alias_target).is_some()
}

pub(crate) fn value_target(value: &Value) -> Option<&str> {
    value.as_str().and_then(alias_target)
}

/// A top-level alias chain followed as far as the budget allows.
struct Chain {
    value: Value,
    budget: usize,
    token_type: Option<String>,
    /// Path of the last token the chain landed on.
    last: Option<String>,
}

/// Follows `value` through `lookup` while it is a reference. A target in
/// `expanding` is a composite already being resolved further up, so the
/// chain stops there instead of looping through its fields.
fn follow_chain<F>(value: &Value, budget: usize, expanding: &[String], lookup: &F) -> Chain
where
    F: Fn(&str) -> Option<(Value, Option<String>)>,
{
    let mut chain = Chain {
        value: value.clone(),
        budget,
        token_type: None,
        last: None,
    };
    while let Some(target) = value_target(&chain.value) {
        if chain.budget == 0 {
            log::debug!("Alias depth budget exhausted at '{}'", target);
            break;
        }
        if expanding.iter().any(|p| p == target) {
            log::debug!("Alias cycle through composite '{}'", target);
            break;
        }
        let Some((next, token_type)) = lookup(target) else {
            break;
        };
        if chain.token_type.is_none() {
            chain.token_type = token_type;
        }
        chain.last = Some(target.to_string());
        chain.value = next;
        chain.budget -= 1;
    }
    chain
}

/// Resolves `value` and every reference nested in its object fields and
/// array items. Nested references draw on the budget left by the chain that
/// reached them.
fn resolve_nested<F>(
    value: &Value,
    budget: usize,
    expanding: &mut Vec<String>,
    lookup: &F,
) -> (Value, Option<String>)
where
    F: Fn(&str) -> Option<(Value, Option<String>)>,
{
    let chain = follow_chain(value, budget, &expanding[..], lookup);
    let composite = matches!(chain.value, Value::Object(_) | Value::Array(_));
    let pushed = match chain.last {
        Some(last) if composite => {
            expanding.push(last);
            true
        }
        _ => false,
    };

    let budget = chain.budget;
    let value = match chain.value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let (resolved, _) = resolve_nested(&v, budget, expanding, lookup);
                    (k, resolved)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| resolve_nested(v, budget, expanding, lookup).0)
                .collect(),
        ),
        other => other,
    };

    if pushed {
        expanding.pop();
    }
    (value, chain.token_type)
}

fn tree_lookup(tree: &TokenTree) -> impl Fn(&str) -> Option<(Value, Option<String>)> + '_ {
    move |target: &str| match tree.lookup(target) {
        Some(TokenNode::Token(token)) => Some((token.value.clone(), token.token_type.clone())),
        _ => None,
    }
}

/// Resolves `value` against the tree. Run this against the fully merged tree
/// so references across layers resolve.
pub fn resolve_alias(value: &Value, tree: &TokenTree, max_depth: usize) -> Value {
    follow_chain(value, max_depth, &[], &tree_lookup(tree)).value
}

/// Like [`resolve_alias`], but also resolves references nested inside
/// composite values (objects and arrays, e.g. typography fields). The whole
/// value shares one depth budget.
pub fn resolve_value_deep(value: &Value, tree: &TokenTree, max_depth: usize) -> Value {
    resolve_nested(value, max_depth, &mut Vec::new(), &tree_lookup(tree)).0
}

/// A flattened token after alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    pub path: Vec<String>,
    pub value: Value,
    pub original_value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
}

impl ResolvedToken {
    pub fn is_alias(&self) -> bool {
        is_alias(&self.original_value)
    }
}

struct FlatIndex<'a> {
    by_name: HashMap<String, &'a FlatToken>,
    source: &'a TokenTree,
}

impl FlatIndex<'_> {
    /// Looks a target up in the flat index first, then in the source tree.
    fn lookup(&self, target: &str) -> Option<(Value, Option<String>)> {
        if let Some(token) = self.by_name.get(target) {
            return Some((token.value.clone(), token.token_type.clone()));
        }
        self.source
            .token(target)
            .map(|token| (token.value.clone(), token.token_type.clone()))
    }

    /// Resolves the value of the token `name`. A composite token counts as
    /// being expanded, so its fields cannot loop back into it.
    fn resolve(&self, name: String, value: &Value, max_depth: usize) -> (Value, Option<String>) {
        let mut expanding = match value {
            Value::Object(_) | Value::Array(_) => vec![name],
            _ => Vec::new(),
        };
        resolve_nested(value, max_depth, &mut expanding, &|target: &str| self.lookup(target))
    }
}

/// Resolves a flat token list. Each reference is looked up by name in the
/// list first and falls back to a walk of `source` for targets that were not
/// flattened. A token without its own type takes the type of the token its
/// alias chain reaches.
pub fn resolve_tokens(
    tokens: &[FlatToken],
    source: &TokenTree,
    max_depth: usize,
) -> Vec<ResolvedToken> {
    let index = FlatIndex {
        by_name: tokens.iter().map(|t| (t.name(), t)).collect(),
        source,
    };

    tokens
        .iter()
        .map(|token| {
            let (value, target_type) = index.resolve(token.name(), &token.value, max_depth);
            if value_target(&value).is_some() {
                log::warn!(
                    "Unresolved reference {} in token '{}'",
                    value,
                    token.name()
                );
            }
            ResolvedToken {
                path: token.path.clone(),
                value,
                original_value: token.value.clone(),
                token_type: token.token_type.clone().or(target_type),
                description: token.description.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use serde_json::json;

    fn tree() -> TokenTree {
        TokenTree::from_value(&json!({
            "colors": {
                "$type": "color",
                "blue": { "500": { "$value": "#0066FF" } },
                "brand": { "$value": "{colors.blue.500}" },
                "primary": { "$value": "{colors.brand}" },
                "loop-a": { "$value": "{colors.loop-b}" },
                "loop-b": { "$value": "{colors.loop-a}" },
                "broken": { "$value": "{colors.missing}" }
            },
            "type": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontFamily": "{font.base}", "fontSize": "16px" }
                }
            },
            "font": { "base": { "$value": "Inter", "$type": "fontFamily" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_alias_syntax() {
        assert_eq!(alias_target("{colors.blue}"), Some("colors.blue"));
        assert_eq!(alias_target("{}"), None);
        assert_eq!(alias_target("{{a}}"), None);
        assert_eq!(alias_target("colors.blue"), None);
        assert!(!is_alias(&json!(12)));
    }

    #[test]
    fn test_resolves_chain() {
        let t = tree();
        assert_eq!(
            resolve_alias(&json!("{colors.primary}"), &t, DEFAULT_MAX_DEPTH),
            json!("#0066FF")
        );
        assert_eq!(resolve_alias(&json!("plain"), &t, DEFAULT_MAX_DEPTH), json!("plain"));
    }

    #[test]
    fn test_missing_target_returns_reference() {
        let t = tree();
        assert_eq!(
            resolve_alias(&json!("{colors.missing}"), &t, DEFAULT_MAX_DEPTH),
            json!("{colors.missing}")
        );
        // A group is not a token.
        assert_eq!(
            resolve_alias(&json!("{colors.blue}"), &t, DEFAULT_MAX_DEPTH),
            json!("{colors.blue}")
        );
    }

    #[test]
    fn test_cycle_terminates_within_budget() {
        let t = tree();
        let out = resolve_alias(&json!("{colors.loop-a}"), &t, DEFAULT_MAX_DEPTH);
        // Ten hops from loop-a lands back on a reference to loop-b.
        assert_eq!(out, json!("{colors.loop-a}"));
        assert_eq!(
            resolve_alias(&json!("{colors.loop-a}"), &t, 0),
            json!("{colors.loop-a}")
        );
        assert_eq!(
            resolve_alias(&json!("{colors.loop-a}"), &t, 1),
            json!("{colors.loop-b}")
        );
    }

    #[test]
    fn test_resolve_value_deep() {
        let t = tree();
        let body = t.token("type.body").unwrap();
        assert_eq!(
            resolve_value_deep(&body.value, &t, DEFAULT_MAX_DEPTH),
            json!({ "fontFamily": "Inter", "fontSize": "16px" })
        );
    }

    #[test]
    fn test_resolve_tokens_falls_back_to_tree() {
        let t = tree();
        // Only the primary token is in the flat list; its targets live in the tree.
        let flat: Vec<_> = flatten(&t)
            .into_iter()
            .filter(|f| f.name() == "colors.primary" || f.name() == "colors.broken")
            .collect();
        let resolved = resolve_tokens(&flat, &t, DEFAULT_MAX_DEPTH);
        assert_eq!(resolved[0].value, json!("#0066FF"));
        assert!(resolved[0].is_alias());
        assert_eq!(resolved[1].value, json!("{colors.missing}"));
    }

    #[test]
    fn test_resolved_type_follows_alias() {
        let t = TokenTree::from_value(&json!({
            "base": { "$value": "#fff", "$type": "color" },
            "surface": { "$value": "{base}" }
        }))
        .unwrap();
        let resolved = resolve_tokens(&flatten(&t), &t, DEFAULT_MAX_DEPTH);
        assert_eq!(resolved[1].token_type.as_deref(), Some("color"));
    }

    fn composites() -> TokenTree {
        TokenTree::from_value(&json!({
            "font": { "base": { "$value": "Inter", "$type": "fontFamily" } },
            "type": {
                "$type": "typography",
                "self": { "$value": { "fontFamily": "{type.self}", "fontSize": "16px" } },
                "a": { "$value": { "fontFamily": "{type.b}" } },
                "b": { "$value": { "fontFamily": "{type.a}" } },
                "stack": { "$value": { "fontFamily": ["{font.base}", "sans-serif"] } }
            },
            "shadow": {
                "$type": "shadow",
                "ring": { "$value": [{ "color": "{colors.ink}", "blur": "2px" }] }
            },
            "colors": { "ink": { "$value": "#111111", "$type": "color" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_composite_self_cycle_terminates() {
        let t = composites();
        assert_eq!(
            resolve_value_deep(&json!("{type.self}"), &t, DEFAULT_MAX_DEPTH),
            json!({ "fontFamily": "{type.self}", "fontSize": "16px" })
        );

        let resolved = resolve_tokens(&flatten(&t), &t, DEFAULT_MAX_DEPTH);
        let body = resolved.iter().find(|r| r.path == ["type", "self"]).unwrap();
        assert_eq!(body.value, json!({ "fontFamily": "{type.self}", "fontSize": "16px" }));
    }

    #[test]
    fn test_composite_mutual_cycle_terminates() {
        let t = composites();
        let deep = resolve_value_deep(&json!("{type.a}"), &t, DEFAULT_MAX_DEPTH);
        assert_eq!(deep, json!({ "fontFamily": { "fontFamily": "{type.a}" } }));

        let resolved = resolve_tokens(&flatten(&t), &t, DEFAULT_MAX_DEPTH);
        let a = resolved.iter().find(|r| r.path == ["type", "a"]).unwrap();
        assert_eq!(a.value, json!({ "fontFamily": { "fontFamily": "{type.a}" } }));
    }

    #[test]
    fn test_nested_references_share_the_budget() {
        let t = composites();
        // One hop reaches the composite; nothing is left for its fields.
        assert_eq!(
            resolve_value_deep(&json!("{type.stack}"), &t, 1),
            json!({ "fontFamily": ["{font.base}", "sans-serif"] })
        );
        assert_eq!(
            resolve_value_deep(&json!("{type.stack}"), &t, 2),
            json!({ "fontFamily": ["Inter", "sans-serif"] })
        );
    }

    #[test]
    fn test_flat_resolution_handles_arrays() {
        let t = composites();
        let resolved = resolve_tokens(&flatten(&t), &t, DEFAULT_MAX_DEPTH);
        let value = |path: &[&str]| {
            resolved
                .iter()
                .find(|r| r.path == path)
                .map(|r| r.value.clone())
        };

        assert_eq!(
            value(&["type", "stack"]),
            Some(json!({ "fontFamily": ["Inter", "sans-serif"] }))
        );
        assert_eq!(
            value(&["shadow", "ring"]),
            Some(json!([{ "color": "#111111", "blur": "2px" }]))
        );
        assert_eq!(
            value(&["type", "stack"]),
            Some(resolve_value_deep(&json!("{type.stack}"), &t, DEFAULT_MAX_DEPTH))
        );
    }
}
