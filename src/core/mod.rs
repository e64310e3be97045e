//! Core domain models for rangebind.
//!
//! This module contains the value models the synchronization protocol works
//! on: domains, endpoint scales, the range control itself and the
//! value-source selector. These are pure models with no I/O dependencies.

pub mod control;
pub mod domain;
pub mod ids;
pub mod scale;
pub mod selector;

pub use control::{ChangeEvent, ChangeListener, DEFAULT_SCRIPT_HANDLE, RangeControl};
pub use domain::{DomainRange, LARGE_VALUE, RangeDomain};
pub use ids::{SourceId, WidgetId};
pub use scale::{DEFAULT_RESOLUTION, EndpointScale};
pub use selector::ArraySelector;
