//! Range control configuration.
//!
//! A control is described by a small JSON document naming its labels, help
//! texts, the property it sets and the selector it reads arrays from. Every
//! attribute is required; a missing one is reported by name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ArraySelector, RangeControl, SourceId, WidgetId};
use crate::error::{Error, Result};
use crate::prototype::WidgetArena;

/// Description of the value-source selector a control depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Label shown next to the selector.
    #[serde(default)]
    pub label: String,
    /// Input the arrays are listed from.
    #[serde(default)]
    pub input_name: String,
}

/// Description of one range control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeControlConfig {
    /// Label of the minimum endpoint.
    pub min_label: Option<String>,
    /// Label of the maximum endpoint.
    pub max_label: Option<String>,
    /// Help text of the minimum endpoint.
    pub min_help: Option<String>,
    /// Help text of the maximum endpoint.
    pub max_help: Option<String>,
    /// Property the control sets.
    pub set_command: Option<String>,
    /// Selector the control depends on.
    pub array_menu: Option<SelectorConfig>,
    /// Explicit trace name; defaults to the minimum label.
    #[serde(default)]
    pub trace_name: Option<String>,
}

impl RangeControlConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON or a missing attribute.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config {
            message: format!("invalid control description: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that every required attribute is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first missing attribute.
    pub fn validate(&self) -> Result<()> {
        match &self.array_menu {
            None => return Err(missing("array_menu")),
            Some(menu) if menu.label.is_empty() => {
                return Err(Error::Config {
                    message: "Couldn't get ArrayMenu widget: no label.".to_string(),
                });
            }
            Some(_) => {}
        }

        for (name, value) in [
            ("min_label", &self.min_label),
            ("max_label", &self.max_label),
            ("min_help", &self.min_help),
            ("max_help", &self.max_help),
            ("set_command", &self.set_command),
        ] {
            if value.as_deref().is_none_or(str::is_empty) {
                return Err(missing(name));
            }
        }
        Ok(())
    }

    /// Builds the control and its selector into `arena`.
    ///
    /// Returns the id of the range control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the description is incomplete.
    pub fn build(&self, arena: &mut WidgetArena, source: SourceId) -> Result<WidgetId> {
        self.validate()?;

        let mut control = RangeControl::new();
        control.set_source(Some(source));
        control.set_minimum_label(self.min_label.as_deref().unwrap_or_default());
        control.set_maximum_label(self.max_label.as_deref().unwrap_or_default());
        control.set_minimum_help(self.min_help.as_deref());
        control.set_maximum_help(self.max_help.as_deref());
        control.set_set_command(self.set_command.as_deref());
        match self.trace_name.as_deref() {
            Some(name) => control.set_trace_name(name),
            None => {
                control.assign_trace_name_from_label();
            }
        }
        let id = arena.insert(control);

        if let Some(menu) = &self.array_menu {
            let mut selector = ArraySelector::new(&menu.label, &menu.input_name);
            selector.set_source(Some(source));
            let selector = arena.insert(selector);
            arena.attach_selector(id, selector)?;
        }

        Ok(id)
    }
}

fn missing(attribute: &str) -> Error {
    Error::Config {
        message: format!("No {attribute} attribute."),
    }
}
