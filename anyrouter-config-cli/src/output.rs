//! Output formatting for the CLI.

use anyrouter_config_core::services::MigrationResult;
use anyrouter_config_core::types::{CacheStatus, ModelDelta};
use anyrouter_config_core::ConfigSession;
use clap::ValueEnum;
use serde_json::json;

use crate::commands::Projection;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print one or both export projections.
pub fn print_projection(
    session: &ConfigSession,
    what: Projection,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = match what {
                Projection::Accounts => serde_json::to_value(session.accounts_projection())?,
                Projection::Providers => serde_json::to_value(session.providers_projection())?,
                Projection::All => json!({
                    "accounts": session.accounts_projection(),
                    "providers": session.providers_projection(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if what != Projection::Providers {
                print_heading("Accounts");
                println!("{}", session.accounts_json()?);
            }
            if what == Projection::All {
                println!();
            }
            if what != Projection::Accounts {
                print_heading("Providers");
                match session.providers_json()? {
                    text if text.is_empty() => println!("(none)"),
                    text => println!("{text}"),
                }
            }
        }
    }
    Ok(())
}

/// Print the refreshed projections after a mutation.
pub fn print_update(
    session: &ConfigSession,
    delta: &ModelDelta,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "delta": delta,
                "accounts": session.accounts_projection(),
                "providers": session.providers_projection(),
                "cache": session.cache_status(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        OutputFormat::Text => {
            if let Some(focus) = delta.focus {
                print_row("Focus", &format!("{focus:?}").to_lowercase());
            }
            if session.has_unsaved_changes() {
                eprintln!("Warning: changes were not saved and only apply to this run");
            }
            print_projection(session, Projection::All, format)
        }
    }
}

pub fn print_status(status: &CacheStatus, load: &MigrationResult, format: OutputFormat) {
    let saved_at = status
        .saved_at
        .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());

    match format {
        OutputFormat::Json => {
            let value = json!({
                "cached": status.cached,
                "savedAt": status.saved_at.map(|at| at.timestamp_millis()),
                "loaded": describe_load(load),
            });
            println!("{value}");
        }
        OutputFormat::Text => {
            print_heading("Status");
            print_row("Saved document", if status.cached { "yes" } else { "no" });
            print_row("Last saved", &saved_at);
            print_row("Loaded", &describe_load(load));
        }
    }
}

pub fn print_options(options: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", json!(options)),
        OutputFormat::Text => {
            for option in options {
                println!("{option}");
            }
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {message}"),
        OutputFormat::Json => {
            eprintln!("{}", json!({ "status": "error", "message": message }));
        }
    }
}

fn describe_load(load: &MigrationResult) -> String {
    match load {
        MigrationResult::Absent => "nothing stored".to_string(),
        MigrationResult::NotNeeded => "current version".to_string(),
        MigrationResult::Migrated { from } => format!("migrated from v{from}"),
        MigrationResult::Unusable { version: Some(v) } => format!("unusable (version {v})"),
        MigrationResult::Unusable { version: None } => "unusable (no version)".to_string(),
    }
}

/// Print a table row.
fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{label}:"), value);
}

/// Print a heading.
fn print_heading(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(50));
}
