//! Explicit per-call context for Accept, Reset and Trace.

use crate::property::PropertyRegistry;
use crate::trace::TraceSink;

/// Collaborators a control reaches while syncing: the property registry and,
/// when a recording is active, the trace sink.
pub struct Session<'a> {
    registry: &'a mut dyn PropertyRegistry,
    trace: Option<&'a mut dyn TraceSink>,
}

impl<'a> Session<'a> {
    /// Creates a session without trace recording.
    pub fn new(registry: &'a mut dyn PropertyRegistry) -> Self {
        Self {
            registry,
            trace: None,
        }
    }

    /// Enables trace recording into `sink`.
    #[must_use]
    pub fn with_trace(mut self, sink: &'a mut dyn TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Property registry.
    pub fn registry(&mut self) -> &mut (dyn PropertyRegistry + 'a) {
        &mut *self.registry
    }

    /// Active trace sink, if any.
    pub fn trace_sink(&mut self) -> Option<&mut (dyn TraceSink + 'a)> {
        self.trace.as_deref_mut()
    }

    /// Returns `true` if a recording is active.
    #[must_use]
    pub const fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tracing", &self.is_tracing())
            .finish_non_exhaustive()
    }
}
