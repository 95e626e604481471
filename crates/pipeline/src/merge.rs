//! Layered merge: one effective token tree per build config.

use crate::config::BuildConfig;
use crate::error::PipelineModelError;
use crate::model::{Assignment, Layer, Page, Pipeline, describe_assignment};
use serde::Serialize;
use std::fmt;
use strata_tokens::{TokenTree, merge_tree};
use strata_types::LayerId;

/// Why a required layer contributed nothing to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DefectReason {
    /// No page exists for the layer's projection of the config.
    MissingPage { assignment: Assignment },
    /// The config does not select a value for one of the layer's variables.
    UnselectedVariable { key: String },
}

impl fmt::Display for DefectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefectReason::MissingPage { assignment } => {
                write!(f, "missing page for {}", describe_assignment(assignment))
            }
            DefectReason::UnselectedVariable { key } => {
                write!(f, "no value selected for variable '{}'", key)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefect {
    pub layer_id: LayerId,
    pub layer_name: String,
    pub reason: DefectReason,
}

impl fmt::Display for BuildDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer '{}': {}", self.layer_name, self.reason)
    }
}

/// The merged tree plus every defect found on the way. A non-empty defect
/// list means the tree is partial, not that the merge failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeResult {
    pub tree: TokenTree,
    pub defects: Vec<BuildDefect>,
}

impl MergeResult {
    pub fn is_complete(&self) -> bool {
        self.defects.is_empty()
    }
}

/// The pages selected for one config, in merge order.
pub(crate) struct Selection<'a> {
    pub pages: Vec<(&'a Layer, &'a Page)>,
    pub defects: Vec<BuildDefect>,
}

/// Walks layers in ascending order, stopping after `up_to` when given, and
/// picks the page matching each layer's projection of `config`.
pub(crate) fn select_pages<'a>(
    pipeline: &'a Pipeline,
    config: &BuildConfig,
    up_to: Option<&LayerId>,
) -> Selection<'a> {
    let mut selection = Selection {
        pages: Vec::new(),
        defects: Vec::new(),
    };

    for layer in pipeline.layers_in_order() {
        let reason = match unselected_key(config, layer) {
            Some(key) => Some(DefectReason::UnselectedVariable { key }),
            None => {
                let assignment = config.project(layer).unwrap_or_default();
                match pipeline.find_page(&layer.id, &assignment) {
                    Some(page) => {
                        selection.pages.push((layer, page));
                        None
                    }
                    None => Some(DefectReason::MissingPage { assignment }),
                }
            }
        };

        if let Some(reason) = reason {
            if layer.required {
                log::warn!(
                    "Required layer '{}' skipped in config '{}': {}",
                    layer.name,
                    config.name,
                    reason
                );
                selection.defects.push(BuildDefect {
                    layer_id: layer.id.clone(),
                    layer_name: layer.name.clone(),
                    reason,
                });
            } else {
                log::debug!("Optional layer '{}' skipped: {}", layer.name, reason);
            }
        }

        if up_to == Some(&layer.id) {
            break;
        }
    }
    selection
}

fn unselected_key(config: &BuildConfig, layer: &Layer) -> Option<String> {
    layer
        .variable_keys
        .iter()
        .find(|key| !config.selections.contains_key(*key))
        .cloned()
}

fn merge_selection(selection: Selection<'_>) -> MergeResult {
    let mut tree = TokenTree::new();
    for (layer, page) in &selection.pages {
        log::trace!("Merging page '{}' of layer '{}'", page.name, layer.name);
        merge_tree(&mut tree, &page.tokens.to_tree());
    }
    MergeResult {
        tree,
        defects: selection.defects,
    }
}

/// Merges every layer for `config`. Missing pages of required layers are
/// reported as defects and the remaining layers still merge.
pub fn build_tokens(pipeline: &Pipeline, config: &BuildConfig) -> MergeResult {
    merge_selection(select_pages(pipeline, config, None))
}

/// Merges layers up to and including `layer_id`.
pub fn build_tokens_up_to(
    pipeline: &Pipeline,
    config: &BuildConfig,
    layer_id: &LayerId,
) -> Result<MergeResult, PipelineModelError> {
    if pipeline.layer(layer_id).is_none() {
        return Err(PipelineModelError::UnknownLayer(layer_id.to_string()));
    }
    Ok(merge_selection(select_pages(pipeline, config, Some(layer_id))))
}
