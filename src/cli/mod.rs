//! CLI layer for rangebind.
//!
//! Provides the command-line interface using clap, with commands for
//! declaring properties, scaling controls to their domains, accepting
//! edits and exporting batch scripts.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
