//! The pipeline aggregate and its validated mutations.

use crate::error::PipelineModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strata_tokens::{Token, TokenStore, TokenTree, alias_target};
use strata_types::{LayerId, PageId, VariableId};

/// One concrete assignment of variable keys to values.
pub type Assignment = BTreeMap<String, String>;

/// A named parameterization axis (e.g. `mode` = light / dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    /// Machine key used in layer bindings and page assignments.
    pub key: String,
    /// Permissible values; the order sets default-selection priority.
    pub values: Vec<String>,
}

/// An ordered stage in the merge pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Merge sequence, ascending. Later layers override earlier ones.
    pub order: i32,
    #[serde(default)]
    pub variable_keys: Vec<String>,
    /// A missing page for a needed slot is reported as a build defect.
    #[serde(default)]
    pub required: bool,
}

/// One stored token tree for a (layer, assignment) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub layer_id: LayerId,
    pub name: String,
    #[serde(default)]
    pub variable_values: Assignment,
    #[serde(default)]
    pub tokens: TokenStore,
}

/// A token in some page that references a renamed or moved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub page_id: PageId,
    pub path: String,
}

/// Outcome of renaming or moving a token path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub new_path: String,
    /// References pointed at the new path because nothing defines the old
    /// one any more.
    pub rewritten: Vec<Dependent>,
    /// References left alone because another page still defines their
    /// target, so some build config still resolves them.
    pub retained: Vec<Dependent>,
}

impl Page {
    /// Exact match: same layer, same key set, same values.
    pub fn matches(&self, layer_id: &LayerId, assignment: &Assignment) -> bool {
        &self.layer_id == layer_id && &self.variable_values == assignment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    #[serde(default)]
    variables: Vec<Variable>,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    pages: Vec<Page>,
}

fn invalid_name(name: &str, reason: &str) -> PipelineModelError {
    PipelineModelError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_display_name(name: &str) -> Result<(), PipelineModelError> {
    if name.trim().is_empty() {
        return Err(invalid_name(name, "name must not be empty"));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<(), PipelineModelError> {
    if key.is_empty() {
        return Err(invalid_name(key, "key must not be empty"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid_name(
            key,
            "keys may only contain ASCII letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

fn validate_values(key: &str, values: &[String]) -> Result<(), PipelineModelError> {
    let mut seen = HashSet::new();
    for value in values {
        validate_display_name(value)?;
        if !seen.insert(value.as_str()) {
            return Err(PipelineModelError::DuplicateVariableValue {
                key: key.to_string(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// A slug-based id that is not yet `taken`.
fn unique_id(prefix: &str, name: &str, taken: impl Fn(&str) -> bool) -> String {
    let slug = slug::slugify(name);
    let base = if slug.is_empty() {
        prefix.to_string()
    } else {
        format!("{}-{}", prefix, slug)
    };
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub(crate) fn describe_assignment(assignment: &Assignment) -> String {
    if assignment.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = assignment
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Read access ---

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn variable(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    /// Layers sorted by ascending `order`; ties keep declaration order.
    pub fn layers_in_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| l.order);
        ordered
    }

    pub fn pages_for_layer(&self, layer_id: &LayerId) -> Vec<&Page> {
        self.pages.iter().filter(|p| &p.layer_id == layer_id).collect()
    }

    pub fn find_page(&self, layer_id: &LayerId, assignment: &Assignment) -> Option<&Page> {
        self.pages.iter().find(|p| p.matches(layer_id, assignment))
    }

    /// Pages that no longer match any slot of their layer: the layer is gone,
    /// its bindings changed, or an assigned value was removed. They are kept
    /// until deleted explicitly with [`Pipeline::remove_page`].
    pub fn orphaned_pages(&self) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|page| match self.layer(&page.layer_id) {
                None => true,
                Some(layer) => !self.is_valid_assignment(layer, &page.variable_values),
            })
            .collect()
    }

    pub(crate) fn is_valid_assignment(&self, layer: &Layer, assignment: &Assignment) -> bool {
        assignment.len() == layer.variable_keys.len()
            && layer.variable_keys.iter().all(|key| {
                match (assignment.get(key), self.variable(key)) {
                    (Some(value), Some(variable)) => variable.values.contains(value),
                    _ => false,
                }
            })
    }

    fn layer_index(&self, id: &LayerId) -> Result<usize, PipelineModelError> {
        self.layers
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| PipelineModelError::UnknownLayer(id.to_string()))
    }

    fn variable_index(&self, key: &str) -> Result<usize, PipelineModelError> {
        self.variables
            .iter()
            .position(|v| v.key == key)
            .ok_or_else(|| PipelineModelError::UnknownVariable(key.to_string()))
    }

    fn page_index(&self, id: &PageId) -> Result<usize, PipelineModelError> {
        self.pages
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| PipelineModelError::UnknownPage(id.to_string()))
    }

    /// Checks invariants that deserialized input could violate.
    pub fn validate(&self) -> Result<(), PipelineModelError> {
        let mut keys = HashSet::new();
        for variable in &self.variables {
            validate_key(&variable.key)?;
            if !keys.insert(variable.key.as_str()) {
                return Err(PipelineModelError::DuplicateVariableKey(variable.key.clone()));
            }
            validate_values(&variable.key, &variable.values)?;
        }

        let mut names = HashSet::new();
        for layer in &self.layers {
            if !names.insert(layer.name.as_str()) {
                return Err(PipelineModelError::DuplicateLayerName(layer.name.clone()));
            }
            for key in &layer.variable_keys {
                if self.variable(key).is_none() {
                    return Err(PipelineModelError::UnknownVariable(key.clone()));
                }
            }
        }

        let mut slots = HashSet::new();
        for page in &self.pages {
            if !slots.insert((&page.layer_id, &page.variable_values)) {
                return Err(PipelineModelError::DuplicatePage {
                    layer: page.layer_id.to_string(),
                    assignment: describe_assignment(&page.variable_values),
                });
            }
        }
        Ok(())
    }

    // --- Variables ---

    pub fn add_variable(
        &mut self,
        name: &str,
        key: &str,
        values: Vec<String>,
    ) -> Result<VariableId, PipelineModelError> {
        validate_display_name(name)?;
        validate_key(key)?;
        if self.variable(key).is_some() {
            return Err(PipelineModelError::DuplicateVariableKey(key.to_string()));
        }
        validate_values(key, &values)?;

        let id = VariableId::new(unique_id("var", key, |candidate| {
            self.variables.iter().any(|v| v.id.as_str() == candidate)
        }));
        self.variables.push(Variable {
            id: id.clone(),
            name: name.to_string(),
            key: key.to_string(),
            values,
        });
        Ok(id)
    }

    pub fn rename_variable(&mut self, key: &str, name: &str) -> Result<(), PipelineModelError> {
        validate_display_name(name)?;
        let idx = self.variable_index(key)?;
        self.variables[idx].name = name.to_string();
        Ok(())
    }

    /// Changes a variable's machine key, cascading into layer bindings and
    /// page assignments.
    pub fn set_variable_key(&mut self, key: &str, new_key: &str) -> Result<(), PipelineModelError> {
        let idx = self.variable_index(key)?;
        validate_key(new_key)?;
        if key == new_key {
            return Ok(());
        }
        if self.variable(new_key).is_some() {
            return Err(PipelineModelError::DuplicateVariableKey(new_key.to_string()));
        }

        self.variables[idx].key = new_key.to_string();
        for layer in &mut self.layers {
            for bound in &mut layer.variable_keys {
                if bound == key {
                    *bound = new_key.to_string();
                }
            }
        }
        for page in &mut self.pages {
            if let Some(value) = page.variable_values.remove(key) {
                page.variable_values.insert(new_key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Deletes a variable and prunes it from every layer binding. Pages whose
    /// assignment used the key are left in place as orphans.
    pub fn remove_variable(&mut self, key: &str) -> Result<Variable, PipelineModelError> {
        let idx = self.variable_index(key)?;
        let removed = self.variables.remove(idx);
        for layer in &mut self.layers {
            layer.variable_keys.retain(|k| k != key);
        }
        let orphaned = self
            .pages
            .iter()
            .filter(|p| p.variable_values.contains_key(key))
            .count();
        if orphaned > 0 {
            log::warn!(
                "Removing variable '{}' orphaned {} page(s); they are kept until deleted explicitly",
                key,
                orphaned
            );
        }
        Ok(removed)
    }

    pub fn add_variable_value(&mut self, key: &str, value: &str) -> Result<(), PipelineModelError> {
        let idx = self.variable_index(key)?;
        validate_display_name(value)?;
        let variable = &mut self.variables[idx];
        if variable.values.iter().any(|v| v == value) {
            return Err(PipelineModelError::DuplicateVariableValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        variable.values.push(value.to_string());
        Ok(())
    }

    /// Removes a permissible value. Pages assigned to it become orphans.
    pub fn remove_variable_value(&mut self, key: &str, value: &str) -> Result<(), PipelineModelError> {
        let idx = self.variable_index(key)?;
        let variable = &mut self.variables[idx];
        let pos = variable.values.iter().position(|v| v == value).ok_or_else(|| {
            PipelineModelError::UnknownVariableValue {
                key: key.to_string(),
                value: value.to_string(),
            }
        })?;
        variable.values.remove(pos);
        Ok(())
    }

    /// Renames a value, cascading into page assignments.
    pub fn rename_variable_value(
        &mut self,
        key: &str,
        value: &str,
        new_value: &str,
    ) -> Result<(), PipelineModelError> {
        let idx = self.variable_index(key)?;
        validate_display_name(new_value)?;
        let variable = &self.variables[idx];
        let pos = variable.values.iter().position(|v| v == value).ok_or_else(|| {
            PipelineModelError::UnknownVariableValue {
                key: key.to_string(),
                value: value.to_string(),
            }
        })?;
        if value != new_value && variable.values.iter().any(|v| v == new_value) {
            return Err(PipelineModelError::DuplicateVariableValue {
                key: key.to_string(),
                value: new_value.to_string(),
            });
        }

        self.variables[idx].values[pos] = new_value.to_string();
        for page in &mut self.pages {
            if let Some(assigned) = page.variable_values.get_mut(key)
                && assigned == value
            {
                *assigned = new_value.to_string();
            }
        }
        self.refresh_page_names();
        Ok(())
    }

    /// Recomputes the display name of every page that still matches a slot.
    fn refresh_page_names(&mut self) {
        let names: Vec<Option<String>> = self
            .pages
            .iter()
            .map(|page| {
                self.layer(&page.layer_id)
                    .filter(|layer| self.is_valid_assignment(layer, &page.variable_values))
                    .map(|layer| self.page_name(layer, &page.variable_values))
            })
            .collect();
        for (page, name) in self.pages.iter_mut().zip(names) {
            if let Some(name) = name {
                page.name = name;
            }
        }
    }

    // --- Layers ---

    /// Appends a layer after every existing one.
    pub fn add_layer(
        &mut self,
        name: &str,
        variable_keys: Vec<String>,
        required: bool,
    ) -> Result<LayerId, PipelineModelError> {
        validate_display_name(name)?;
        if self.layer_by_name(name).is_some() {
            return Err(PipelineModelError::DuplicateLayerName(name.to_string()));
        }
        let mut seen = HashSet::new();
        for key in &variable_keys {
            if self.variable(key).is_none() {
                return Err(PipelineModelError::UnknownVariable(key.clone()));
            }
            if !seen.insert(key.as_str()) {
                return Err(PipelineModelError::AlreadyBound {
                    layer: name.to_string(),
                    key: key.clone(),
                });
            }
        }

        let id = LayerId::new(unique_id("layer", name, |candidate| {
            self.layers.iter().any(|l| l.id.as_str() == candidate)
        }));
        let order = self.layers.iter().map(|l| l.order + 1).max().unwrap_or(0);
        self.layers.push(Layer {
            id: id.clone(),
            name: name.to_string(),
            order,
            variable_keys,
            required,
        });
        Ok(id)
    }

    pub fn rename_layer(&mut self, id: &LayerId, name: &str) -> Result<(), PipelineModelError> {
        let idx = self.layer_index(id)?;
        validate_display_name(name)?;
        if self.layers.iter().any(|l| l.name == name && &l.id != id) {
            return Err(PipelineModelError::DuplicateLayerName(name.to_string()));
        }
        self.layers[idx].name = name.to_string();
        self.refresh_page_names();
        Ok(())
    }

    /// Removes a layer together with all of its pages.
    pub fn remove_layer(&mut self, id: &LayerId) -> Result<(Layer, Vec<Page>), PipelineModelError> {
        let idx = self.layer_index(id)?;
        let layer = self.layers.remove(idx);
        let (removed, kept): (Vec<Page>, Vec<Page>) =
            std::mem::take(&mut self.pages)
                .into_iter()
                .partition(|p| &p.layer_id == id);
        self.pages = kept;
        Ok((layer, removed))
    }

    /// Moves a layer to `position` in merge order and renumbers every layer's
    /// `order` to `0..n`.
    pub fn move_layer(&mut self, id: &LayerId, position: usize) -> Result<(), PipelineModelError> {
        self.layer_index(id)?;
        let mut ordered: Vec<Layer> = {
            let mut layers = std::mem::take(&mut self.layers);
            layers.sort_by_key(|l| l.order);
            layers
        };
        let from = ordered.iter().position(|l| &l.id == id).unwrap_or(0);
        let layer = ordered.remove(from);
        let to = position.min(ordered.len());
        ordered.insert(to, layer);
        for (order, layer) in ordered.iter_mut().enumerate() {
            layer.order = order as i32;
        }
        self.layers = ordered;
        Ok(())
    }

    pub fn set_layer_required(&mut self, id: &LayerId, required: bool) -> Result<(), PipelineModelError> {
        let idx = self.layer_index(id)?;
        self.layers[idx].required = required;
        Ok(())
    }

    /// Binds a variable to a layer. Existing pages of the layer keep their
    /// old assignments and become orphans.
    pub fn bind_variable(&mut self, id: &LayerId, key: &str) -> Result<(), PipelineModelError> {
        let idx = self.layer_index(id)?;
        self.variable_index(key)?;
        let layer = &mut self.layers[idx];
        if layer.variable_keys.iter().any(|k| k == key) {
            return Err(PipelineModelError::AlreadyBound {
                layer: layer.name.clone(),
                key: key.to_string(),
            });
        }
        layer.variable_keys.push(key.to_string());
        Ok(())
    }

    pub fn unbind_variable(&mut self, id: &LayerId, key: &str) -> Result<(), PipelineModelError> {
        let idx = self.layer_index(id)?;
        let layer = &mut self.layers[idx];
        let pos = layer
            .variable_keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| PipelineModelError::UnknownVariable(key.to_string()))?;
        layer.variable_keys.remove(pos);
        Ok(())
    }

    // --- Pages ---

    /// Returns the page for `(layer_id, assignment)`, creating an empty one
    /// if none exists. The assignment must cover exactly the layer's keys
    /// with permissible values.
    pub fn get_or_create_page(
        &mut self,
        layer_id: &LayerId,
        assignment: &Assignment,
    ) -> Result<&Page, PipelineModelError> {
        let layer = self
            .layer(layer_id)
            .ok_or_else(|| PipelineModelError::UnknownLayer(layer_id.to_string()))?;

        // Orphaned pages never match.
        if !self.is_valid_assignment(layer, assignment) {
            return Err(PipelineModelError::InvalidAssignment {
                layer: layer.name.clone(),
                reason: format!(
                    "{} does not match bindings [{}]",
                    describe_assignment(assignment),
                    layer.variable_keys.join(", ")
                ),
            });
        }
        if let Some(idx) = self.pages.iter().position(|p| p.matches(layer_id, assignment)) {
            return Ok(&self.pages[idx]);
        }

        let name = self.page_name(layer, assignment);
        let id = PageId::new(unique_id(layer_id.as_str(), &name, |candidate| {
            self.pages.iter().any(|p| p.id.as_str() == candidate)
        }));
        log::debug!("Creating page '{}' for layer '{}'", name, layer.name);
        self.pages.push(Page {
            id,
            layer_id: layer_id.clone(),
            name,
            variable_values: assignment.clone(),
            tokens: TokenStore::new(),
        });
        let last = self.pages.len() - 1;
        Ok(&self.pages[last])
    }

    pub fn remove_page(&mut self, id: &PageId) -> Result<Page, PipelineModelError> {
        let idx = self.page_index(id)?;
        Ok(self.pages.remove(idx))
    }

    pub fn set_page_tokens(&mut self, id: &PageId, tokens: TokenTree) -> Result<(), PipelineModelError> {
        let idx = self.page_index(id)?;
        self.pages[idx].tokens = TokenStore::from_tree(&tokens);
        Ok(())
    }

    /// Applies a path-scoped edit to a page's [`TokenStore`] in place. Store
    /// operations validate before they mutate, so a single rejected operation
    /// leaves the page unchanged.
    pub fn edit_page<T>(
        &mut self,
        id: &PageId,
        edit: impl FnOnce(&mut TokenStore) -> Result<T, strata_tokens::TokenError>,
    ) -> Result<T, PipelineModelError> {
        let idx = self.page_index(id)?;
        Ok(edit(&mut self.pages[idx].tokens)?)
    }

    pub fn set_token(&mut self, id: &PageId, path: &str, token: Token) -> Result<(), PipelineModelError> {
        self.edit_page(id, |store| store.set_token(path, token))
    }

    pub fn remove_token(&mut self, id: &PageId, path: &str) -> Result<(), PipelineModelError> {
        self.edit_page(id, |store| store.remove(path).map(|_| ()))
    }

    /// Renames a token or group within one page and updates references to it
    /// (see [`PathChange`]).
    pub fn rename_token(
        &mut self,
        id: &PageId,
        path: &str,
        new_name: &str,
    ) -> Result<PathChange, PipelineModelError> {
        let new_path = self.edit_page(id, |store| store.rename(path, new_name))?;
        Ok(self.update_dependents(path, new_path))
    }

    /// Moves a token or group under another group within one page and
    /// updates references to it (see [`PathChange`]).
    pub fn move_token(
        &mut self,
        id: &PageId,
        path: &str,
        new_parent: &str,
    ) -> Result<PathChange, PipelineModelError> {
        let new_path = self.edit_page(id, |store| store.move_node(path, new_parent))?;
        Ok(self.update_dependents(path, new_path))
    }

    /// Every token, in any page, that references `path` or a path below it.
    pub fn dependents(&self, path: &str) -> Vec<Dependent> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.tokens
                    .find_references(path)
                    .into_iter()
                    .map(|token_path| Dependent {
                        page_id: page.id.clone(),
                        path: token_path,
                    })
            })
            .collect()
    }

    fn defines_token(&self, path: &str) -> bool {
        self.pages.iter().any(|page| page.tokens.token(path).is_some())
    }

    /// Rewrites the references into `from` whose target no page defines any
    /// more. References that another page still satisfies are kept.
    fn update_dependents(&mut self, from: &str, new_path: String) -> PathChange {
        let mut change = PathChange {
            new_path,
            rewritten: Vec::new(),
            retained: Vec::new(),
        };
        if from == change.new_path {
            return change;
        }

        for dependent in self.dependents(from) {
            let still_defined = self
                .page(&dependent.page_id)
                .and_then(|page| page.tokens.token(&dependent.path))
                .and_then(|token| token.value.as_str())
                .and_then(alias_target)
                .is_some_and(|target| self.defines_token(target));
            if still_defined {
                change.retained.push(dependent);
            } else {
                change.rewritten.push(dependent);
            }
        }

        for dependent in &change.rewritten {
            if let Ok(idx) = self.page_index(&dependent.page_id) {
                self.pages[idx]
                    .tokens
                    .rewrite_reference(&dependent.path, from, &change.new_path);
            }
        }

        if !change.rewritten.is_empty() {
            log::debug!(
                "Rewrote {} reference(s) from '{}' to '{}'",
                change.rewritten.len(),
                from,
                change.new_path
            );
        }
        if !change.retained.is_empty() {
            log::info!(
                "Kept {} reference(s) to '{}'; other pages still define it",
                change.retained.len(),
                from
            );
        }
        change
    }
}
