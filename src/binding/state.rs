//! Binding state between a control and its remote property.

use serde::Serialize;

/// Where a control stands relative to its remote property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    /// The property has not been resolved.
    Unbound,
    /// Resolved, nothing committed, no local edits.
    Bound,
    /// Local values match the last committed values.
    Committed,
    /// Local edits not yet pushed.
    Diverged,
}

impl std::fmt::Display for BindingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unbound => "unbound",
            Self::Bound => "bound",
            Self::Committed => "committed",
            Self::Diverged => "diverged",
        };
        write!(f, "{s}")
    }
}

/// Lazily resolved reference to a named remote property.
///
/// The binding never owns the property; it only remembers the name, whether
/// the last lookup succeeded and what was last pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBinding {
    property_name: Option<String>,
    resolved: bool,
    committed: Option<(f64, f64)>,
    accept_called: bool,
}

impl PropertyBinding {
    /// Creates a binding with no property name.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            property_name: None,
            resolved: false,
            committed: None,
            accept_called: false,
        }
    }

    /// Creates a fresh binding to `name`.
    #[must_use]
    pub fn named(name: Option<&str>) -> Self {
        Self {
            property_name: name.map(str::to_string),
            ..Self::new()
        }
    }

    /// Name of the bound property.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// Renames the property.
    ///
    /// A different name drops the resolution and any commit made against
    /// the old property.
    pub fn set_property_name(&mut self, name: Option<&str>) {
        if self.property_name.as_deref() != name {
            self.property_name = name.map(str::to_string);
            self.resolved = false;
            self.committed = None;
            self.accept_called = false;
        }
    }

    /// Returns `true` if the last lookup succeeded.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) const fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    pub(crate) const fn mark_unresolved(&mut self) {
        self.resolved = false;
    }

    pub(crate) const fn record_commit(&mut self, values: (f64, f64)) {
        self.committed = Some(values);
        self.accept_called = true;
    }

    /// Values last pushed by a successful Accept.
    #[must_use]
    pub const fn committed_values(&self) -> Option<(f64, f64)> {
        self.committed
    }

    /// Returns `true` once an Accept has gone through.
    #[must_use]
    pub const fn accept_called(&self) -> bool {
        self.accept_called
    }

    /// Derives the state given the control's modified flag.
    #[must_use]
    pub const fn state(&self, modified: bool) -> BindingState {
        if !self.resolved {
            BindingState::Unbound
        } else if modified {
            BindingState::Diverged
        } else if self.committed.is_some() {
            BindingState::Committed
        } else {
            BindingState::Bound
        }
    }
}
