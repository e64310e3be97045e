//! Trace recording.
//!
//! User actions are recorded as replayable script statements appended to a
//! [`TraceSink`]. A control first emits a one-time bootstrap statement that
//! binds its script variable, then plain assignment statements.

pub mod sink;

pub use sink::{FileTraceSink, TraceLog, TraceSink};

use serde::{Deserialize, Serialize};

/// How far a control's trace identity has been established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceState {
    /// Nothing known yet.
    #[default]
    Uninitialized,
    /// Identity given by a default name.
    Default,
    /// Bootstrap statement already written by the control itself.
    SelfInitialized,
    /// Identity assigned explicitly, bootstrap still pending.
    Initialized,
}

impl TraceState {
    /// Returns `true` once the bootstrap statement has been written.
    #[must_use]
    pub const fn is_bootstrapped(self) -> bool {
        matches!(self, Self::SelfInitialized)
    }

    /// Returns `true` if a label may still replace the trace name.
    #[must_use]
    pub const fn accepts_label_name(self) -> bool {
        matches!(self, Self::Uninitialized | Self::Default)
    }
}

/// Statement binding `handle` to the widget named `trace_name` on `source`.
#[must_use]
pub fn bootstrap_statement(handle: &str, source_handle: &str, trace_name: &str) -> String {
    format!("set kw({handle}) [$kw({source_handle}) GetPVWidget {{{trace_name}}}]")
}

/// Statement calling `method` with `value` on the widget bound to `handle`.
#[must_use]
pub fn assignment_statement(handle: &str, method: &str, value: f64) -> String {
    format!("$kw({handle}) {method} {value}")
}
