//! Subcommand definitions and their mapping onto session operations.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use anyrouter_config_core::types::{AccountField, ConfigCommand, CookieField, ProviderField};
use anyrouter_config_core::ConfigSession;
use clap::{Subcommand, ValueEnum};

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum Commands {
    /// Print the exported accounts and/or providers
    Show {
        #[arg(value_enum, default_value_t = Projection::All)]
        what: Projection,
    },

    /// Show whether a saved document exists and when it was written
    Status,

    /// List provider keys selectable for accounts
    Options {
        /// Include this account's current (possibly dangling) provider
        #[arg(short, long)]
        account: Option<usize>,
    },

    /// Edit accounts
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Edit an account's cookies
    Cookie {
        #[command(subcommand)]
        command: CookieCommands,
    },

    /// Edit providers
    Provider {
        #[command(subcommand)]
        command: ProviderCommands,
    },

    /// Replace accounts or providers with exported JSON
    Import {
        #[arg(value_enum)]
        what: ImportTarget,
        /// File to read, or `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Discard everything and delete the saved document
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Projection {
    Accounts,
    Providers,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportTarget {
    Accounts,
    Providers,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Append a blank account
    Add,
    /// Remove an account
    Remove { index: usize },
    /// Copy an account and insert it right after the original
    Duplicate { index: usize },
    /// Set `name` or `api_user`
    Set {
        index: usize,
        field: AccountField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Set the referenced provider key (blank clears it)
    Use {
        index: usize,
        #[arg(default_value = "")]
        provider_key: String,
    },
    /// Point an account at the provider at `provider_index`
    Select {
        index: usize,
        provider_index: usize,
    },
}

#[derive(Subcommand)]
pub enum CookieCommands {
    /// Append a blank cookie entry
    Add { index: usize },
    /// Remove a cookie entry
    Remove { index: usize, cookie_index: usize },
    /// Set a cookie's `key` or `value`
    Set {
        index: usize,
        cookie_index: usize,
        field: CookieField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Append a blank provider
    Add,
    /// Remove a provider and clear references to it
    Remove { index: usize },
    /// Copy a provider under a fresh unique key
    Duplicate { index: usize },
    /// Set a provider field; changing `key` renames account references
    Set {
        index: usize,
        field: ProviderField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

impl AccountCommands {
    fn into_command(self) -> ConfigCommand {
        match self {
            Self::Add => ConfigCommand::AddAccount,
            Self::Remove { index } => ConfigCommand::RemoveAccount { index },
            Self::Duplicate { index } => ConfigCommand::DuplicateAccount { index },
            Self::Set {
                index,
                field,
                value,
            } => ConfigCommand::SetAccountField {
                index,
                field,
                value,
            },
            Self::Use {
                index,
                provider_key,
            } => ConfigCommand::SetAccountProvider {
                index,
                provider_key,
            },
            Self::Select {
                index,
                provider_index,
            } => ConfigCommand::SelectProvider {
                account_index: index,
                provider_index,
            },
        }
    }
}

impl CookieCommands {
    fn into_command(self) -> ConfigCommand {
        match self {
            Self::Add { index } => ConfigCommand::AddCookie { index },
            Self::Remove {
                index,
                cookie_index,
            } => ConfigCommand::RemoveCookie {
                index,
                cookie_index,
            },
            Self::Set {
                index,
                cookie_index,
                field,
                value,
            } => ConfigCommand::SetCookieField {
                index,
                cookie_index,
                field,
                value,
            },
        }
    }
}

impl ProviderCommands {
    fn into_command(self) -> ConfigCommand {
        match self {
            Self::Add => ConfigCommand::AddProvider,
            Self::Remove { index } => ConfigCommand::RemoveProvider { index },
            Self::Duplicate { index } => ConfigCommand::DuplicateProvider { index },
            Self::Set {
                index,
                field,
                value,
            } => ConfigCommand::SetProviderField {
                index,
                field,
                value,
            },
        }
    }
}

/// Runs one subcommand against the open session.
pub fn execute(
    session: &mut ConfigSession,
    command: Commands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let delta = match command {
        Commands::Show { what } => return output::print_projection(session, what, format),
        Commands::Status => {
            output::print_status(&session.cache_status(), session.load_result(), format);
            return Ok(());
        }
        Commands::Options { account } => {
            let options = match account {
                Some(index) => session.provider_options_for(index),
                None => session.provider_key_options(),
            };
            output::print_options(&options, format);
            return Ok(());
        }
        Commands::Account { command } => session.apply(command.into_command()),
        Commands::Cookie { command } => session.apply(command.into_command()),
        Commands::Provider { command } => session.apply(command.into_command()),
        Commands::Import { what, file } => {
            let raw = read_input(&file)?;
            match what {
                ImportTarget::Accounts => session.import_accounts(&raw)?,
                ImportTarget::Providers => session.import_providers(&raw)?,
            }
        }
        Commands::Reset => session.reset(),
    };

    if delta.is_empty() {
        tracing::warn!("Nothing changed (index out of range or blank selection)");
    }
    output::print_update(session, &delta, format)
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read import text from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}
