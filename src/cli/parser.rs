//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rangebind: range controls bound to named remote properties.
///
/// Keeps a local min/max control and a stored two-element property in sync:
/// autoscale from the property's domain, accept edits, export and trace.
#[derive(Parser, Debug)]
#[command(name = "rangebind")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the property database file.
    ///
    /// Defaults to `.rangebind/properties.db` in the current directory.
    #[arg(short, long, env = "RANGEBIND_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the property database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Declare a two-element property.
    Define {
        /// Property name.
        name: String,

        /// Lower bound of the property's domain.
        #[arg(long, allow_hyphen_values = true)]
        low: Option<f64>,

        /// Upper bound of the property's domain.
        #[arg(long, allow_hyphen_values = true)]
        high: Option<f64>,

        /// Initial minimum element.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        min: f64,

        /// Initial maximum element.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        max: f64,
    },

    /// Replace a property's domain, as a data refresh would.
    Domain {
        /// Property name.
        name: String,

        /// New lower bound (omit for unconstrained).
        #[arg(long, allow_hyphen_values = true)]
        low: Option<f64>,

        /// New upper bound (omit for unconstrained).
        #[arg(long, allow_hyphen_values = true)]
        high: Option<f64>,
    },

    /// List all properties.
    #[command(name = "list", alias = "ls")]
    List,

    /// Show property details.
    Show {
        /// Property name.
        name: String,
    },

    /// Compute bounds and resolution from a property's domain.
    Autoscale {
        /// Property name.
        name: String,
    },

    /// Edit a control bound to a property and accept it.
    ///
    /// The control is first scaled to the property's domain; the edits are
    /// then applied as user edits (clamped, ordering repaired).
    Accept {
        /// Property name.
        name: String,

        /// New minimum.
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,

        /// New maximum.
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,

        /// Append trace statements to this file.
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// Control description (JSON) for labels and trace name.
        #[arg(short, long)]
        control: Option<PathBuf>,

        /// Data source id the control is attached to.
        #[arg(short, long, default_value = "1")]
        source: u32,
    },

    /// Print the batch-script line restoring a property.
    Export {
        /// Property name.
        name: String,

        /// Data source id used in the script.
        #[arg(short, long, default_value = "1")]
        source: u32,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::property::DEFAULT_DB_PATH))
    }
}
