//! Value-source selector.
//!
//! An [`ArraySelector`] picks the data array a range control operates on.
//! Several controls may depend on the same selector, which is why cloning
//! goes through an identity map.

use serde::{Deserialize, Serialize};

use crate::core::ids::{SourceId, WidgetId};

/// Selector of the input array feeding dependent controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySelector {
    label: String,
    input_name: String,
    selected_array: Option<String>,
    source: Option<SourceId>,
    enabled: bool,
    dependents: Vec<WidgetId>,
}

impl ArraySelector {
    /// Creates a selector with a label and the name of the input it reads.
    #[must_use]
    pub fn new(label: &str, input_name: &str) -> Self {
        Self {
            label: label.to_string(),
            input_name: input_name.to_string(),
            selected_array: None,
            source: None,
            enabled: true,
            dependents: Vec::new(),
        }
    }

    /// Label shown next to the selector.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the input the arrays are listed from.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Currently selected array.
    #[must_use]
    pub fn selected_array(&self) -> Option<&str> {
        self.selected_array.as_deref()
    }

    /// Selects an array by name.
    pub fn select_array(&mut self, name: Option<&str>) {
        self.selected_array = name.map(ToString::to_string);
    }

    /// Data source the selector is attached to.
    #[must_use]
    pub const fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Attaches the selector to a data source.
    pub const fn set_source(&mut self, source: Option<SourceId>) {
        self.source = source;
    }

    /// Whether the selector accepts interaction.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the selector.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Widgets refreshed when the selection changes.
    #[must_use]
    pub fn dependents(&self) -> &[WidgetId] {
        &self.dependents
    }

    /// Registers a dependent widget once.
    pub fn add_dependent(&mut self, widget: WidgetId) {
        if !self.dependents.contains(&widget) {
            self.dependents.push(widget);
        }
    }

    /// Copy for another source. Dependents belong to the original.
    #[must_use]
    pub fn clone_prototype(&self, target: SourceId) -> Self {
        Self {
            source: Some(target),
            dependents: Vec::new(),
            ..self.clone()
        }
    }
}
