//! Property registry layer.
//!
//! The synchronization core talks to remote properties only through
//! [`PropertyRegistry`] and [`VectorProperty`]. Two registries ship with the
//! crate: an in-memory one for embedding and tests, and a `SQLite` one that
//! persists properties and their domains between runs.

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::{MemoryProperty, MemoryRegistry};
pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::{PropertyRecord, SqliteRegistry};
pub use traits::{PropertyRegistry, VectorProperty};

/// Default database file name.
pub const DEFAULT_DB_NAME: &str = "properties.db";

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".rangebind/properties.db";
