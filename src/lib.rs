//! # rangebind
//!
//! Range controls bound to named remote properties.
//!
//! A [`RangeControl`] edits an ordered `(min, max)` pair locally and keeps it
//! consistent with a two-element vector property that lives in a property
//! registry, standing in for server-side state.
//!
//! ## Features
//!
//! - **Ordering repair**: user edits are clamped and keep `min <= max`
//! - **Autoscale**: bounds and resolution derived from a live data domain
//! - **Accept/Reset**: commit and discard against the property, with the
//!   modified flag cleared only on a confirmed push
//! - **Prototype cloning**: arena clones with an identity map so shared
//!   sub-widgets are cloned once
//! - **Trace recording**: replayable script statements with a one-time
//!   bootstrap per control
//! - **`SQLite` registry**: persistent properties and domains for the CLI

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod autoscale;
pub mod binding;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod property;
pub mod prototype;
pub mod trace;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{ArraySelector, DomainRange, LARGE_VALUE, RangeControl, RangeDomain, SourceId, WidgetId};

// Re-export protocol types
pub use autoscale::{AutoscaleOutcome, Quantization, autoscale, quantize};
pub use binding::{AcceptOutcome, Bindable, BindingState, ResetOutcome, Session};
pub use prototype::{CloneMap, Widget, WidgetArena};
pub use trace::{FileTraceSink, TraceLog, TraceSink, TraceState};

// Re-export property types
pub use property::{
    DEFAULT_DB_PATH, MemoryProperty, MemoryRegistry, PropertyRegistry, SqliteRegistry,
    VectorProperty,
};

// Re-export configuration and CLI types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::RangeControlConfig;
