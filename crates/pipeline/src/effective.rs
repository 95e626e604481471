//! The merged view of one layer with per-path provenance.
//!
//! Aliases in this view resolve against the tree merged up to the active
//! layer; layers above it are not visible.

use crate::config::BuildConfig;
use crate::error::PipelineModelError;
use crate::merge::{BuildDefect, select_pages};
use crate::model::{Layer, Pipeline};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use strata_tokens::{DEFAULT_MAX_DEPTH, Group, TokenNode, TokenTree, merge_tree, resolve_value_deep};
use strata_types::LayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Token,
    Group,
}

/// Which layer a path belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub layer_id: LayerId,
    pub layer_name: String,
    /// True when the path comes from a layer other than the active one.
    pub inherited: bool,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveTokens {
    pub active_layer: LayerId,
    pub tree: TokenTree,
    /// Keyed by dot-path. Tokens map to their last writer, groups to the
    /// layer that first introduced them.
    pub provenance: BTreeMap<String, Provenance>,
    pub defects: Vec<BuildDefect>,
}

impl EffectiveTokens {
    pub fn provenance(&self, path: &str) -> Option<&Provenance> {
        self.provenance.get(path)
    }

    /// Paths written by the active layer itself.
    pub fn own_paths(&self) -> impl Iterator<Item = &str> {
        self.provenance
            .iter()
            .filter(|(_, p)| !p.inherited)
            .map(|(path, _)| path.as_str())
    }

    /// Resolves the token at `path` through its alias chain, including
    /// references nested in composite values.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        self.tree
            .token(path)
            .map(|token| resolve_value_deep(&token.value, &self.tree, DEFAULT_MAX_DEPTH))
    }
}

fn record(
    group: &Group,
    prefix: &str,
    layer: &Layer,
    active: &LayerId,
    out: &mut BTreeMap<String, Provenance>,
) {
    for (name, node) in &group.children {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        let provenance = |kind| Provenance {
            layer_id: layer.id.clone(),
            layer_name: layer.name.clone(),
            inherited: &layer.id != active,
            kind,
        };
        match node {
            TokenNode::Token(_) => {
                out.insert(path, provenance(NodeKind::Token));
            }
            TokenNode::Group(child) => {
                let introduced = out
                    .get(&path)
                    .is_none_or(|existing| existing.kind == NodeKind::Token);
                if introduced {
                    out.insert(path.clone(), provenance(NodeKind::Group));
                }
                record(child, &path, layer, active, out);
            }
        }
    }
}

/// Merges layers up to and including `active_layer` for `config`, recording
/// where every path came from.
pub fn compute_effective_tokens(
    pipeline: &Pipeline,
    active_layer: &LayerId,
    config: &BuildConfig,
) -> Result<EffectiveTokens, PipelineModelError> {
    if pipeline.layer(active_layer).is_none() {
        return Err(PipelineModelError::UnknownLayer(active_layer.to_string()));
    }

    let selection = select_pages(pipeline, config, Some(active_layer));
    let mut tree = TokenTree::new();
    let mut provenance = BTreeMap::new();
    for (layer, page) in &selection.pages {
        let page_tree = page.tokens.to_tree();
        merge_tree(&mut tree, &page_tree);
        record(&page_tree.root, "", layer, active_layer, &mut provenance);
    }

    // A token replaced by a group (or the reverse) leaves stale entries below it.
    provenance.retain(|path, entry| match tree.lookup(path) {
        Some(TokenNode::Token(_)) => entry.kind == NodeKind::Token,
        Some(TokenNode::Group(_)) => entry.kind == NodeKind::Group,
        None => false,
    });

    Ok(EffectiveTokens {
        active_layer: active_layer.clone(),
        tree,
        provenance,
        defects: selection.defects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;
    use serde_json::json;
    use strata_tokens::Token;

    fn layered() -> (Pipeline, LayerId, LayerId) {
        let mut p = Pipeline::new();
        let base = p.add_layer("Primitives", vec![], true).unwrap();
        let brand = p.add_layer("Brand", vec![], true).unwrap();
        let base_page = p.get_or_create_page(&base, &Assignment::new()).unwrap().id.clone();
        let brand_page = p.get_or_create_page(&brand, &Assignment::new()).unwrap().id.clone();

        p.set_token(&base_page, "colors.blue", Token::new("#0066FF")).unwrap();
        p.set_token(&base_page, "colors.red", Token::new("#FF0000")).unwrap();
        p.set_token(&brand_page, "colors.blue", Token::new("#0044CC")).unwrap();
        p.set_token(&brand_page, "colors.accent", Token::new("{colors.red}"))
            .unwrap();
        (p, base, brand)
    }

    #[test]
    fn test_token_provenance_is_last_writer() {
        let (p, base, brand) = layered();
        let view = compute_effective_tokens(&p, &brand, &BuildConfig::empty()).unwrap();

        let blue = view.provenance("colors.blue").unwrap();
        assert_eq!(blue.layer_id, brand);
        assert!(!blue.inherited);

        let red = view.provenance("colors.red").unwrap();
        assert_eq!(red.layer_id, base);
        assert!(red.inherited);
    }

    #[test]
    fn test_group_provenance_is_first_introducer() {
        let (p, base, brand) = layered();
        let view = compute_effective_tokens(&p, &brand, &BuildConfig::empty()).unwrap();
        let colors = view.provenance("colors").unwrap();
        assert_eq!(colors.layer_id, base);
        assert_eq!(colors.kind, NodeKind::Group);
        assert!(colors.inherited);

        let own: Vec<_> = view.own_paths().collect();
        assert_eq!(own, vec!["colors.accent", "colors.blue"]);
    }

    #[test]
    fn test_view_excludes_layers_above_active() {
        let (p, base, _) = layered();
        let view = compute_effective_tokens(&p, &base, &BuildConfig::empty()).unwrap();
        assert!(view.provenance("colors.accent").is_none());
        assert_eq!(view.resolve("colors.blue"), Some(json!("#0066FF")));
    }

    #[test]
    fn test_resolve_in_view() {
        let (p, _, brand) = layered();
        let view = compute_effective_tokens(&p, &brand, &BuildConfig::empty()).unwrap();
        assert_eq!(view.resolve("colors.accent"), Some(json!("#FF0000")));
        assert_eq!(view.resolve("colors.missing"), None);
    }

    #[test]
    fn test_resolve_composite_in_view() {
        let (mut p, _, brand) = layered();
        let brand_page = p.find_page(&brand, &Assignment::new()).unwrap().id.clone();
        p.set_token(
            &brand_page,
            "borders.focus",
            Token::new(json!({ "color": "{colors.accent}", "width": "2px" })),
        )
        .unwrap();

        let view = compute_effective_tokens(&p, &brand, &BuildConfig::empty()).unwrap();
        assert_eq!(
            view.resolve("borders.focus"),
            Some(json!({ "color": "#FF0000", "width": "2px" }))
        );
    }

    #[test]
    fn test_token_replaced_by_group_drops_stale_entries() {
        let (mut p, base, brand) = layered();
        let base_page = p.find_page(&base, &Assignment::new()).unwrap().id.clone();
        let brand_page = p.find_page(&brand, &Assignment::new()).unwrap().id.clone();
        p.set_token(&base_page, "spacing.sm", Token::new("4px")).unwrap();
        p.set_token(&brand_page, "spacing", Token::new("8px")).unwrap();

        let view = compute_effective_tokens(&p, &brand, &BuildConfig::empty()).unwrap();
        assert_eq!(view.provenance("spacing").unwrap().kind, NodeKind::Token);
        assert!(view.provenance("spacing.sm").is_none());
    }

    #[test]
    fn test_unknown_active_layer() {
        let (p, _, _) = layered();
        assert!(matches!(
            compute_effective_tokens(&p, &LayerId::new("x"), &BuildConfig::empty()),
            Err(PipelineModelError::UnknownLayer(_))
        ));
    }
}
