//! Slot enumeration: which assignments a layer can hold pages for.

use crate::model::{Assignment, Layer, Pipeline};
use itertools::Itertools;

impl Pipeline {
    /// Every valid assignment for `layer`, in binding order with the last
    /// bound variable varying fastest. An unbound layer has exactly one
    /// empty slot; a binding with no values yields none.
    pub fn layer_slots(&self, layer: &Layer) -> Vec<Assignment> {
        let axes: Vec<(&str, &[String])> = layer
            .variable_keys
            .iter()
            .filter_map(|key| {
                self.variable(key)
                    .map(|variable| (key.as_str(), variable.values.as_slice()))
            })
            .collect();

        if axes.is_empty() {
            return vec![Assignment::new()];
        }

        axes.into_iter()
            .map(|(key, values)| values.iter().map(move |value| (key, value)))
            .multi_cartesian_product()
            .map(|combination| {
                combination
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect()
            })
            .collect()
    }

    /// Display name for a page: the layer name, followed by the assigned
    /// values in the layer's binding order.
    pub fn page_name(&self, layer: &Layer, assignment: &Assignment) -> String {
        let values: Vec<&str> = layer
            .variable_keys
            .iter()
            .filter_map(|key| assignment.get(key).map(String::as_str))
            .collect();
        if values.is_empty() {
            layer.name.clone()
        } else {
            format!("{} / {}", layer.name, values.join(" / "))
        }
    }

    /// Slots of `layer` that have no page yet.
    pub fn missing_slots(&self, layer: &Layer) -> Vec<Assignment> {
        self.layer_slots(layer)
            .into_iter()
            .filter(|slot| self.find_page(&layer.id, slot).is_none())
            .collect()
    }
}
