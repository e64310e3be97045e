//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::autoscale::Quantization;
use crate::binding::{AcceptOutcome, ResetOutcome};
use crate::core::DomainRange;
use crate::error::Error;
use crate::property::PropertyRecord;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a property list.
#[must_use]
pub fn format_property_list(records: &[PropertyRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_property_list_text(records),
        OutputFormat::Json => format_json(&records),
    }
}

fn format_property_list_text(records: &[PropertyRecord]) -> String {
    if records.is_empty() {
        return "No properties found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Properties:\n");
    let _ = writeln!(
        output,
        "{:<24} {:<24} {:<24} Pushes",
        "Name", "Elements", "Domain"
    );
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for record in records {
        let _ = writeln!(
            output,
            "{:<24} {:<24} {:<24} {}",
            truncate(&record.name, 24),
            truncate(&format_elements(&record.elements), 24),
            truncate(&format_domain(record.domain.as_ref()), 24),
            record.push_count
        );
    }

    output
}

/// Formats a single property.
#[must_use]
pub fn format_property(record: &PropertyRecord, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Property: {}", record.name);
            let _ = writeln!(output, "  Elements:  {}", format_elements(&record.elements));
            let _ = writeln!(
                output,
                "  Domain:    {}",
                format_domain(record.domain.as_ref())
            );
            let _ = writeln!(output, "  Pushes:    {}", record.push_count);
            let _ = writeln!(output, "  Updated:   {}", record.updated_at);
            output
        }
        OutputFormat::Json => format_json(record),
    }
}

/// Formats a quantized domain.
#[must_use]
pub fn format_quantization(name: &str, quantization: &Quantization, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match quantization {
            Quantization::Unconstrained => {
                format!("{name}: no declared range, bounds left unconstrained\n")
            }
            Quantization::Degenerate { value } => {
                format!("{name}: degenerate range at {value}\n")
            }
            Quantization::Quantized {
                low,
                high,
                resolution,
            } => format!("{name}: bounds [{low}, {high}] resolution {resolution}\n"),
        },
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report<'a> {
                property: &'a str,
                quantization: &'a Quantization,
            }
            format_json(&Report {
                property: name,
                quantization,
            })
        }
    }
}

/// Formats the result of the `accept` command.
#[must_use]
pub fn format_accept(
    name: &str,
    scaled: &ResetOutcome,
    accepted: &AcceptOutcome,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Accepted {name}: [{}, {}]",
                accepted.min, accepted.max
            );
            if let ResetOutcome::Refreshed {
                property_found: true,
                autoscale,
            } = scaled
                && autoscale.changed()
            {
                let _ = writeln!(output, "  Scaled to domain: {autoscale:?}");
            }
            if accepted.traced {
                output.push_str("  Trace recorded.\n");
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report<'a> {
                property: &'a str,
                scaled: &'a ResetOutcome,
                accepted: &'a AcceptOutcome,
            }
            format_json(&Report {
                property: name,
                scaled,
                accepted,
            })
        }
    }
}

/// Formats a batch-script export.
#[must_use]
pub fn format_export(name: &str, source: u32, script: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => script.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report<'a> {
                property: &'a str,
                source: u32,
                script: &'a str,
            }
            format_json(&Report {
                property: name,
                source,
                script,
            })
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorReport {
                success: bool,
                error: String,
            }
            format_json(&ErrorReport {
                success: false,
                error: error.to_string(),
            })
        }
    }
}

/// Formats a generic message.
#[must_use]
pub fn format_message(message: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{message}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Message<'a> {
                success: bool,
                message: &'a str,
            }
            format_json(&Message {
                success: true,
                message,
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn format_elements(elements: &[f64]) -> String {
    let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn format_domain(domain: Option<&DomainRange>) -> String {
    let side = |bound: Option<f64>| bound.map_or_else(|| "-".to_string(), |b| b.to_string());
    match domain {
        Some(domain) if domain.is_declared() => {
            format!("[{}, {}]", side(domain.low), side(domain.high))
        }
        _ => "unconstrained".to_string(),
    }
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
