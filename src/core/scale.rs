//! Endpoint scales.
//!
//! An [`EndpointScale`] is the value model behind one slider-with-entry of a
//! range control: a value, inclusive bounds, a resolution, a label and help
//! text. It performs no notification of its own; the owning control does.

use serde::{Deserialize, Serialize};

use crate::core::domain::LARGE_VALUE;
use crate::error::{RangeError, Result};

/// Default resolution of a freshly created scale.
pub const DEFAULT_RESOLUTION: f64 = 1.0;

/// Value model of one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointScale {
    value: f64,
    bounds: (f64, f64),
    resolution: f64,
    label: String,
    help: Option<String>,
    enabled: bool,
}

impl Default for EndpointScale {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointScale {
    /// Creates a scale spanning the widest range.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 0.0,
            bounds: (-LARGE_VALUE, LARGE_VALUE),
            resolution: DEFAULT_RESOLUTION,
            label: String::new(),
            help: None,
            enabled: true,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Sets the value verbatim.
    pub const fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Sets the value, clamped into the bounds.
    pub fn set_value_clamped(&mut self, value: f64) {
        self.value = value.max(self.bounds.0).min(self.bounds.1);
    }

    /// Inclusive bounds.
    #[must_use]
    pub const fn bounds(&self) -> (f64, f64) {
        self.bounds
    }

    /// Sets the bounds, ordering them if given reversed.
    pub const fn set_bounds(&mut self, low: f64, high: f64) {
        self.bounds = if low <= high { (low, high) } else { (high, low) };
    }

    /// Smallest representable increment.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Sets the resolution.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidResolution`] unless `resolution` is
    /// finite and strictly positive.
    pub fn set_resolution(&mut self, resolution: f64) -> Result<()> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(RangeError::InvalidResolution { value: resolution }.into());
        }
        self.resolution = resolution;
        Ok(())
    }

    /// Label shown next to the scale.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the label.
    pub fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    /// Balloon help text.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Sets the help text.
    pub fn set_help(&mut self, help: Option<&str>) {
        self.help = help.map(ToString::to_string);
    }

    /// Whether the scale accepts interaction.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables interaction.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
