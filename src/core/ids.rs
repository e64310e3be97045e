//! Identifiers for widgets and data sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a widget inside a [`crate::prototype::WidgetArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub usize);

/// Identifier of the data source a widget is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SourceId {
    /// Script variable naming this source in a trace.
    #[must_use]
    pub fn script_handle(self) -> String {
        format!("pvSource{}", self.0)
    }
}
