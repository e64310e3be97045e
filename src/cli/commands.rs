//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::autoscale::quantize;
use crate::binding::{Bindable, Session};
use crate::cli::output::{
    OutputFormat, format_accept, format_export, format_message, format_property,
    format_property_list, format_quantization,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::RangeControlConfig;
use crate::core::{DomainRange, RangeControl, SourceId};
use crate::error::{CommandError, PropertyError, Result};
use crate::prototype::WidgetArena;
use crate::property::{PropertyRecord, SqliteRegistry};
use crate::trace::FileTraceSink;
use std::path::Path;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Define {
            name,
            low,
            high,
            min,
            max,
        } => cmd_define(&db_path, name, *low, *high, (*min, *max), format),
        Commands::Domain { name, low, high } => cmd_domain(&db_path, name, *low, *high, format),
        Commands::List => cmd_list(&db_path, format),
        Commands::Show { name } => cmd_show(&db_path, name, format),
        Commands::Autoscale { name } => cmd_autoscale(&db_path, name, format),
        Commands::Accept {
            name,
            min,
            max,
            trace,
            control,
            source,
        } => cmd_accept(
            &db_path,
            name,
            (*min, *max),
            trace.as_deref(),
            control.as_deref(),
            SourceId(*source),
            format,
        ),
        Commands::Export { name, source } => cmd_export(&db_path, name, *source, format),
    }
}

/// Opens the registry and checks it is initialized.
fn open_registry(db_path: &Path) -> Result<SqliteRegistry> {
    let registry = SqliteRegistry::open(db_path)?;

    if !registry.is_initialized()? {
        return Err(PropertyError::NotInitialized.into());
    }

    Ok(registry)
}

/// Loads a property record or reports it missing.
fn require_property(registry: &SqliteRegistry, name: &str) -> Result<PropertyRecord> {
    registry.get(name)?.ok_or_else(|| {
        PropertyError::NotFound {
            name: name.to_string(),
        }
        .into()
    })
}

/// Builds a domain from optional CLI bounds.
fn domain_from_args(low: Option<f64>, high: Option<f64>) -> Result<Option<DomainRange>> {
    if let (Some(low), Some(high)) = (low, high)
        && low > high
    {
        return Err(CommandError::InvalidArgument(format!(
            "domain low {low} is above high {high}"
        ))
        .into());
    }
    let domain = DomainRange { low, high };
    Ok(domain.is_declared().then_some(domain))
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, format: OutputFormat) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut registry = SqliteRegistry::open(db_path)?;
    registry.init()?;

    Ok(format_message(
        &format!("Initialized property database at: {}", db_path.display()),
        format,
    ))
}

fn cmd_define(
    db_path: &Path,
    name: &str,
    low: Option<f64>,
    high: Option<f64>,
    (min, max): (f64, f64),
    format: OutputFormat,
) -> Result<String> {
    if min > max {
        return Err(CommandError::InvalidArgument(format!(
            "min {min} is above max {max}"
        ))
        .into());
    }
    let domain = domain_from_args(low, high)?;

    let mut registry = open_registry(db_path)?;
    registry.define(name, &[min, max], domain)?;
    debug!(property = name, ?domain, "defined property");

    Ok(format_message(&format!("Defined property {name}"), format))
}

fn cmd_domain(
    db_path: &Path,
    name: &str,
    low: Option<f64>,
    high: Option<f64>,
    format: OutputFormat,
) -> Result<String> {
    let domain = domain_from_args(low, high)?.unwrap_or_else(DomainRange::unbounded);

    let mut registry = open_registry(db_path)?;
    registry.set_domain(name, domain)?;

    Ok(format_message(&format!("Updated domain of {name}"), format))
}

fn cmd_list(db_path: &Path, format: OutputFormat) -> Result<String> {
    let registry = open_registry(db_path)?;
    let records = registry.list()?;
    Ok(format_property_list(&records, format))
}

fn cmd_show(db_path: &Path, name: &str, format: OutputFormat) -> Result<String> {
    let registry = open_registry(db_path)?;
    let record = require_property(&registry, name)?;
    Ok(format_property(&record, format))
}

fn cmd_autoscale(db_path: &Path, name: &str, format: OutputFormat) -> Result<String> {
    let registry = open_registry(db_path)?;
    let record = require_property(&registry, name)?;
    let quantization = quantize(&record.domain.unwrap_or_else(DomainRange::unbounded))?;
    Ok(format_quantization(name, &quantization, format))
}

fn cmd_accept(
    db_path: &Path,
    name: &str,
    (min, max): (Option<f64>, Option<f64>),
    trace: Option<&Path>,
    control_path: Option<&Path>,
    source: SourceId,
    format: OutputFormat,
) -> Result<String> {
    let mut registry = open_registry(db_path)?;
    let mut trace_sink = trace.map(FileTraceSink::open).transpose()?;

    let mut arena = WidgetArena::new();
    let id = match control_path {
        Some(path) => RangeControlConfig::load(path)?.build(&mut arena, source)?,
        None => {
            let mut control = RangeControl::new();
            control.set_source(Some(source));
            arena.insert(control)
        }
    };
    let control = arena.range_control_mut(id)?;
    control.set_set_command(Some(name));

    let mut session = Session::new(&mut registry);
    if let Some(sink) = trace_sink.as_mut() {
        session = session.with_trace(sink);
    }

    let scaled = control.reset(&mut session)?;
    if let Some(min) = min {
        control.on_min_edited(min);
    }
    if let Some(max) = max {
        control.on_max_edited(max);
    }
    let accepted = control.accept(&mut session)?;

    Ok(format_accept(name, &scaled, &accepted, format))
}

fn cmd_export(db_path: &Path, name: &str, source: u32, format: OutputFormat) -> Result<String> {
    let mut registry = open_registry(db_path)?;
    let mut control = RangeControl::with_property(name);

    let (min, max) = control
        .pull(&mut Session::new(&mut registry))?
        .ok_or_else(|| PropertyError::NotFound {
            name: name.to_string(),
        })?;
    control.set_min_value(min);
    control.set_max_value(max);

    let script = control.batch_script(SourceId(source))?;
    Ok(format_export(name, source, &script, format))
}
