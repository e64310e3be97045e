//! Proxy property binding.
//!
//! Keeps a [`RangeControl`](crate::core::RangeControl) and a named remote
//! vector property in sync through the Accept/Reset lifecycle:
//!
//! - **Accept** pushes `(min, max)` and clears the modified flag only once
//!   the push went through.
//! - **Reset** pulls the last committed values back, or re-derives the
//!   bounds from the live domain when nothing was ever accepted.
//! - **Trace** records the values as replayable statements when a session
//!   carries a sink.

pub mod bindable;
pub mod session;
pub mod state;

pub use bindable::{AcceptOutcome, Bindable, ResetOutcome};
pub use session::Session;
pub use state::{BindingState, PropertyBinding};
