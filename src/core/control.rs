//! Dual min/max range control.
//!
//! A [`RangeControl`] owns two [`EndpointScale`]s and keeps them ordered
//! while the user edits them. Every value mutation marks the control as
//! modified and notifies the registered change listeners. Syncing with the
//! remote property lives in [`crate::binding`].

use std::fmt;

use crate::binding::PropertyBinding;
use crate::core::ids::{SourceId, WidgetId};
use crate::core::scale::EndpointScale;
use crate::error::{Error, Result};
use crate::trace::TraceState;

/// Script variable used until the control is placed in an arena.
pub const DEFAULT_SCRIPT_HANDLE: &str = "pvMinMax";

/// Payload of a change notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeEvent {
    /// Minimum after the change.
    pub min: f64,
    /// Maximum after the change.
    pub max: f64,
}

/// Callback invoked on every value mutation.
pub type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;

/// Compound control editing an ordered `(min, max)` pair.
///
/// # Examples
///
/// ```
/// use rangebind::core::RangeControl;
///
/// let mut control = RangeControl::new();
/// control.set_range(0.0, 10.0);
/// control.on_min_edited(4.0);
/// control.on_max_edited(2.0);
/// assert_eq!(control.min_value(), 2.0);
/// assert_eq!(control.max_value(), 2.0);
/// assert!(control.is_modified());
/// ```
pub struct RangeControl {
    min: EndpointScale,
    max: EndpointScale,
    modified: bool,
    enabled: bool,
    binding: PropertyBinding,
    source: Option<SourceId>,
    array_selector: Option<WidgetId>,
    trace_name: Option<String>,
    trace_state: TraceState,
    script_handle: String,
    listeners: Vec<ChangeListener>,
}

impl Default for RangeControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeControl {
    /// Creates an unbound control spanning the widest range.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min: EndpointScale::new(),
            max: EndpointScale::new(),
            modified: false,
            enabled: true,
            binding: PropertyBinding::new(),
            source: None,
            array_selector: None,
            trace_name: None,
            trace_state: TraceState::Uninitialized,
            script_handle: DEFAULT_SCRIPT_HANDLE.to_string(),
            listeners: Vec::new(),
        }
    }

    /// Creates a control bound (lazily) to the named property.
    #[must_use]
    pub fn with_property(name: &str) -> Self {
        let mut control = Self::new();
        control.set_set_command(Some(name));
        control
    }

    // ==================== Values ====================

    /// Current minimum.
    #[must_use]
    pub const fn min_value(&self) -> f64 {
        self.min.value()
    }

    /// Current maximum.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max.value()
    }

    /// Sets the minimum without clamping or ordering repair.
    pub fn set_min_value(&mut self, value: f64) {
        self.min.set_value(value);
        self.modified_callback();
    }

    /// Sets the maximum without clamping or ordering repair.
    pub fn set_max_value(&mut self, value: f64) {
        self.max.set_value(value);
        self.modified_callback();
    }

    /// User edited the minimum.
    ///
    /// The value is clamped into the bounds; a minimum above the maximum
    /// drags the maximum up with it.
    pub fn on_min_edited(&mut self, value: f64) {
        self.min.set_value_clamped(value);
        if self.min.value() > self.max.value() {
            self.max.set_value(self.min.value());
        }
        self.modified_callback();
    }

    /// User edited the maximum.
    ///
    /// The value is clamped into the bounds; a maximum below the minimum
    /// drags the minimum down with it.
    pub fn on_max_edited(&mut self, value: f64) {
        self.max.set_value_clamped(value);
        if self.max.value() < self.min.value() {
            self.min.set_value(self.max.value());
        }
        self.modified_callback();
    }

    /// Both endpoints as a pair.
    #[must_use]
    pub const fn values(&self) -> (f64, f64) {
        (self.min.value(), self.max.value())
    }

    // ==================== Range and resolution ====================

    /// Inclusive slider bounds.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.min.bounds()
    }

    /// Sets the slider bounds of both endpoints.
    pub const fn set_range(&mut self, low: f64, high: f64) {
        self.min.set_bounds(low, high);
        self.max.set_bounds(low, high);
    }

    /// Smallest representable increment.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.min.resolution()
    }

    /// Sets the resolution of both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RangeError::InvalidResolution`] for a
    /// non-positive value; neither endpoint is changed then.
    pub fn set_resolution(&mut self, resolution: f64) -> Result<()> {
        self.min.set_resolution(resolution)?;
        self.max.set_resolution(resolution)
    }

    // ==================== Labels and help ====================

    /// Label of the minimum endpoint.
    #[must_use]
    pub fn minimum_label(&self) -> &str {
        self.min.label()
    }

    /// Sets the label of the minimum endpoint.
    pub fn set_minimum_label(&mut self, label: &str) {
        self.min.set_label(label);
    }

    /// Label of the maximum endpoint.
    #[must_use]
    pub fn maximum_label(&self) -> &str {
        self.max.label()
    }

    /// Sets the label of the maximum endpoint.
    pub fn set_maximum_label(&mut self, label: &str) {
        self.max.set_label(label);
    }

    /// Help text of the minimum endpoint.
    #[must_use]
    pub fn minimum_help(&self) -> Option<&str> {
        self.min.help()
    }

    /// Sets the help text of the minimum endpoint.
    pub fn set_minimum_help(&mut self, help: Option<&str>) {
        self.min.set_help(help);
    }

    /// Help text of the maximum endpoint.
    #[must_use]
    pub fn maximum_help(&self) -> Option<&str> {
        self.max.help()
    }

    /// Sets the help text of the maximum endpoint.
    pub fn set_maximum_help(&mut self, help: Option<&str>) {
        self.max.set_help(help);
    }

    // ==================== Wiring ====================

    /// Name of the remote property (and batch command) this control sets.
    #[must_use]
    pub fn set_command(&self) -> Option<&str> {
        self.binding.property_name()
    }

    /// Sets the property name. Changing it drops any resolved binding.
    pub fn set_set_command(&mut self, command: Option<&str>) {
        self.binding.set_property_name(command);
    }

    /// Property binding state.
    #[must_use]
    pub const fn binding(&self) -> &PropertyBinding {
        &self.binding
    }

    pub(crate) const fn binding_mut(&mut self) -> &mut PropertyBinding {
        &mut self.binding
    }

    /// Data source the control is attached to.
    #[must_use]
    pub const fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Attaches the control to a data source.
    pub const fn set_source(&mut self, source: Option<SourceId>) {
        self.source = source;
    }

    /// Value-source selector this control depends on.
    #[must_use]
    pub const fn array_selector(&self) -> Option<WidgetId> {
        self.array_selector
    }

    /// Sets the value-source selector reference.
    pub const fn set_array_selector(&mut self, selector: Option<WidgetId>) {
        self.array_selector = selector;
    }

    /// Whether the control accepts interaction.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the control and both endpoints.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.min.set_enabled(enabled);
        self.max.set_enabled(enabled);
    }

    // ==================== Modification tracking ====================

    /// Returns `true` if local state diverges from the committed state.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) const fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Registers a change listener.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn modified_callback(&mut self) {
        self.modified = true;
        let event = ChangeEvent {
            min: self.min.value(),
            max: self.max.value(),
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    // ==================== Trace identity ====================

    /// Trace identity state.
    #[must_use]
    pub const fn trace_state(&self) -> TraceState {
        self.trace_state
    }

    /// Overrides the trace identity state.
    pub const fn set_trace_state(&mut self, state: TraceState) {
        self.trace_state = state;
    }

    /// Name the control is looked up by in a replayed script.
    ///
    /// Falls back to the minimum label, then the script handle.
    #[must_use]
    pub fn trace_name(&self) -> &str {
        match self.trace_name.as_deref() {
            Some(name) => name,
            None if !self.min.label().is_empty() => self.min.label(),
            None => &self.script_handle,
        }
    }

    /// Sets the trace name explicitly.
    pub fn set_trace_name(&mut self, name: &str) {
        self.trace_name = Some(name.to_string());
        if self.trace_state.accepts_label_name() {
            self.trace_state = TraceState::Initialized;
        }
    }

    /// Uses the minimum label as trace name unless one was already given.
    ///
    /// Returns `true` if the name was taken from the label.
    pub fn assign_trace_name_from_label(&mut self) -> bool {
        if self.min.label().is_empty() || !self.trace_state.accepts_label_name() {
            return false;
        }
        self.trace_name = Some(self.min.label().to_string());
        self.trace_state = TraceState::Initialized;
        true
    }

    /// Script variable holding this control in a trace.
    #[must_use]
    pub fn script_handle(&self) -> &str {
        &self.script_handle
    }

    /// Sets the script variable.
    pub fn set_script_handle(&mut self, handle: &str) {
        handle.clone_into(&mut self.script_handle);
    }

    /// Script variable of the source the bootstrap statement looks into.
    #[must_use]
    pub fn source_handle(&self) -> String {
        self.source
            .map_or_else(|| "pvSource".to_string(), SourceId::script_handle)
    }

    // ==================== Batch export ====================

    /// Batch-script line assigning the current values to the property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no set command is configured.
    pub fn batch_script(&self, source: SourceId) -> Result<String> {
        let command = self.set_command().ok_or_else(|| Error::InvalidState {
            message: format!("range control {} has no set command", self.trace_name()),
        })?;
        Ok(format!(
            "  [$pvTemp{source} GetProperty {command}] SetElements2 {} {}\n",
            self.min_value(),
            self.max_value()
        ))
    }

    /// Copy of the configuration and values, without listeners.
    ///
    /// The copy is a fresh instance: its binding is unresolved, nothing is
    /// committed and its trace bootstrap is still pending.
    #[must_use]
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            min: self.min.clone(),
            max: self.max.clone(),
            modified: self.modified,
            enabled: self.enabled,
            binding: PropertyBinding::named(self.binding.property_name()),
            source: self.source,
            array_selector: self.array_selector,
            trace_name: self.trace_name.clone(),
            trace_state: match self.trace_state {
                TraceState::SelfInitialized => TraceState::Initialized,
                state => state,
            },
            script_handle: self.script_handle.clone(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for RangeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeControl")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("modified", &self.modified)
            .field("enabled", &self.enabled)
            .field("binding", &self.binding)
            .field("source", &self.source)
            .field("array_selector", &self.array_selector)
            .field("trace_name", &self.trace_name)
            .field("trace_state", &self.trace_state)
            .field("script_handle", &self.script_handle)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
