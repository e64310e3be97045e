//! Accept, Reset and Trace for range controls.

use serde::Serialize;
use tracing::{debug, warn};

use crate::autoscale::{AutoscaleOutcome, autoscale};
use crate::binding::session::Session;
use crate::binding::state::BindingState;
use crate::core::{DomainRange, RangeControl, SourceId};
use crate::error::{PropertyError, Result};
use crate::property::PropertyRegistry;
use crate::trace::{TraceSink, TraceState, assignment_statement, bootstrap_statement};

/// Name reported when a control has no set command.
const UNNAMED_PROPERTY: &str = "(null)";

/// Capability of a control that mirrors a remote property.
pub trait Bindable {
    /// Pushes local values to the remote property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotFound`] if the property cannot be
    /// resolved; local state is left as it was.
    fn accept(&mut self, session: &mut Session<'_>) -> Result<AcceptOutcome>;

    /// Discards local edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain range is invalid or the registry
    /// fails.
    fn reset(&mut self, session: &mut Session<'_>) -> Result<ResetOutcome>;

    /// Records the current values into `sink`. No sink means no-op.
    ///
    /// Returns `true` if anything was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a statement.
    fn trace(&mut self, sink: Option<&mut (dyn TraceSink + '_)>) -> Result<bool>;

    /// Copies the control for another data source.
    ///
    /// References to sub-widgets are not carried over; clone through
    /// [`crate::prototype::WidgetArena::clone_prototype`] to clone them
    /// along with the control.
    #[must_use]
    fn clone_prototype(&self, source: SourceId) -> Self
    where
        Self: Sized;
}

/// Result of a successful Accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcceptOutcome {
    /// Minimum pushed.
    pub min: f64,
    /// Maximum pushed.
    pub max: f64,
    /// Whether a trace record was written.
    pub traced: bool,
}

/// Result of a successful Reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResetOutcome {
    /// Last committed values pulled back from the property.
    Restored {
        /// Restored minimum.
        min: f64,
        /// Restored maximum.
        max: f64,
    },
    /// Bounds re-derived from the live domain.
    Refreshed {
        /// What the autoscale did.
        autoscale: AutoscaleOutcome,
        /// Whether the property resolved.
        property_found: bool,
    },
}

impl RangeControl {
    /// Resolves the named property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotFound`] if the lookup fails; the binding
    /// stays unbound.
    pub fn bind(&mut self, registry: &mut dyn PropertyRegistry) -> Result<BindingState> {
        let name = self.property_name_or_null();
        let found = match self.set_command() {
            Some(_) => registry.contains(&name)?,
            None => false,
        };

        if found {
            self.binding_mut().mark_resolved();
            Ok(self.binding_state())
        } else {
            self.binding_mut().mark_unresolved();
            warn!(property = %name, "could not find property");
            Err(PropertyError::NotFound { name }.into())
        }
    }

    /// Current binding state.
    #[must_use]
    pub const fn binding_state(&self) -> BindingState {
        self.binding().state(self.is_modified())
    }

    /// Re-derives bounds from the property's domain.
    ///
    /// An unresolvable property, or one without a domain, contributes an
    /// unbounded range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RangeError::InvalidRange`] for an inverted
    /// domain.
    pub fn refresh_from_domain(&mut self, session: &mut Session<'_>) -> Result<ResetOutcome> {
        let name = self.set_command().map(str::to_string);
        let resolved = match &name {
            Some(name) => session
                .registry()
                .resolve(name)?
                .map(|property| property.domain().unwrap_or_else(DomainRange::unbounded)),
            None => None,
        };

        let property_found = resolved.is_some();
        if !property_found {
            warn!(
                property = name.as_deref().unwrap_or(UNNAMED_PROPERTY),
                "could not find property; using unbounded domain"
            );
        }

        let domain = resolved.unwrap_or_else(DomainRange::unbounded);
        let outcome = autoscale(self, &domain)?;
        if property_found {
            self.binding_mut().mark_resolved();
        } else {
            self.binding_mut().mark_unresolved();
        }
        Ok(ResetOutcome::Refreshed {
            autoscale: outcome,
            property_found,
        })
    }

    /// Reads the first two elements of the property.
    ///
    /// Returns `None` if the property does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the property has fewer than two elements.
    pub fn pull(&mut self, session: &mut Session<'_>) -> Result<Option<(f64, f64)>> {
        let Some(name) = self.set_command().map(str::to_string) else {
            return Ok(None);
        };

        let values = match session.registry().resolve(&name)? {
            Some(property) => Some((property.element(0)?, property.element(1)?)),
            None => None,
        };

        if values.is_some() {
            self.binding_mut().mark_resolved();
        } else {
            self.binding_mut().mark_unresolved();
        }
        Ok(values)
    }

    /// Writes the bootstrap statement unless this control already did.
    ///
    /// Returns `true` if the statement was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the statement.
    pub fn initialize_trace(&mut self, sink: &mut (dyn TraceSink + '_)) -> Result<bool> {
        if self.trace_state() == TraceState::SelfInitialized {
            return Ok(false);
        }
        let statement =
            bootstrap_statement(self.script_handle(), &self.source_handle(), self.trace_name());
        sink.append(&statement)?;
        self.set_trace_state(TraceState::SelfInitialized);
        Ok(true)
    }

    fn property_name_or_null(&self) -> String {
        self.set_command().unwrap_or(UNNAMED_PROPERTY).to_string()
    }
}

impl Bindable for RangeControl {
    fn accept(&mut self, session: &mut Session<'_>) -> Result<AcceptOutcome> {
        let was_modified = self.is_modified();
        let (min, max) = self.values();
        let name = self.property_name_or_null();

        let pushed = match self.set_command() {
            Some(_) => match session.registry().resolve(&name)? {
                Some(mut property) => {
                    property.set_elements(&[min, max])?;
                    true
                }
                None => false,
            },
            None => false,
        };

        if !pushed {
            self.binding_mut().mark_unresolved();
            warn!(property = %name, "could not find property; edits kept");
            return Err(PropertyError::NotFound { name }.into());
        }

        self.binding_mut().mark_resolved();
        self.binding_mut().record_commit((min, max));
        self.clear_modified();
        debug!(property = %name, min, max, "accepted");

        let traced = if was_modified {
            self.trace(session.trace_sink()).unwrap_or_else(|e| {
                warn!(error = %e, "trace not recorded");
                false
            })
        } else {
            false
        };

        Ok(AcceptOutcome { min, max, traced })
    }

    fn reset(&mut self, session: &mut Session<'_>) -> Result<ResetOutcome> {
        let outcome = if self.binding().accept_called() {
            match self.pull(session)? {
                Some((min, max)) => {
                    self.set_min_value(min);
                    self.set_max_value(max);
                    ResetOutcome::Restored { min, max }
                }
                None => {
                    warn!(
                        property = %self.property_name_or_null(),
                        "could not find property; no committed state"
                    );
                    self.refresh_from_domain(session)?
                }
            }
        } else {
            self.refresh_from_domain(session)?
        };

        self.clear_modified();
        debug!(widget = self.trace_name(), ?outcome, "reset");
        Ok(outcome)
    }

    fn trace(&mut self, sink: Option<&mut (dyn TraceSink + '_)>) -> Result<bool> {
        let Some(sink) = sink else {
            return Ok(false);
        };

        self.initialize_trace(sink)?;
        let handle = self.script_handle().to_string();
        sink.append(&assignment_statement(&handle, "SetMaxValue", self.max_value()))?;
        sink.append(&assignment_statement(&handle, "SetMinValue", self.min_value()))?;
        Ok(true)
    }

    fn clone_prototype(&self, source: SourceId) -> Self {
        let mut copy = self.duplicate();
        copy.set_source(Some(source));
        copy.set_array_selector(None);
        copy
    }
}
