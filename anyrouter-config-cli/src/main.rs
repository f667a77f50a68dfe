//! `AnyRouter` config editor (terminal front end)
//!
//! Every invocation opens the saved configuration, applies at most one edit or
//! import, saves, and prints the refreshed account and provider exports.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyrouter_config_app::{AppConfig, AppStateBuilder};
use clap::Parser;
use commands::{Commands, Projection};
use output::OutputFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Edit AnyRouter/AgentRouter sign-in account and provider configs.
#[derive(Parser)]
#[command(name = "anyrouter-config")]
#[command(about = "Build and export AnyRouter account and provider configs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory the configuration document is saved in
    #[arg(long, env = "ANYROUTER_CONFIG_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Storage key (file name) of the configuration document
    #[arg(long, env = "ANYROUTER_CONFIG_KEY", global = true)]
    storage_key: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(key) = &self.storage_key {
            config = config.with_storage_key(key);
        }
        config
    }
}

fn init_tracing(level: &str) {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.app_config();
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "Opening configuration"
    );

    let mut state = AppStateBuilder::from_config(&config)?.build()?;
    let command = cli.command.unwrap_or(Commands::Show {
        what: Projection::All,
    });
    commands::execute(&mut state.session, command, cli.format)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let format = cli.format;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            output::print_error(&format!("{e:#}"), format);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyrouter_config_core::services::ServiceContext;
    use anyrouter_config_core::traits::InMemoryDocumentStore;
    use anyrouter_config_core::types::{AccountField, ProviderField};
    use anyrouter_config_core::ConfigSession;

    use super::*;

    fn session() -> ConfigSession {
        let store = Arc::new(InMemoryDocumentStore::new());
        ConfigSession::open(Arc::new(ServiceContext::new(store)))
    }

    fn run_args(session: &mut ConfigSession, args: &[&str]) -> anyhow::Result<()> {
        let argv = std::iter::once("anyrouter-config").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        let command = cli.command.unwrap_or(Commands::Show {
            what: Projection::All,
        });
        commands::execute(session, command, OutputFormat::Json)
    }

    #[test]
    fn parses_typed_field_names() {
        let cli =
            Cli::try_parse_from(["anyrouter-config", "account", "set", "0", "api_user", "42"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Account {
                command: commands::AccountCommands::Set {
                    index: 0,
                    field: AccountField::ApiUser,
                    ..
                }
            })
        ));

        let cli = Cli::try_parse_from([
            "anyrouter-config",
            "provider",
            "set",
            "1",
            "waf_cookie_names",
            "a,b",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Provider {
                command: commands::ProviderCommands::Set {
                    field: ProviderField::WafCookieNames,
                    ..
                }
            })
        ));
    }

    #[test]
    fn rejects_unknown_field_names() {
        let bad_account = ["anyrouter-config", "account", "set", "0", "password", "x"];
        let bad_cookie = ["anyrouter-config", "cookie", "set", "0", "0", "domain", "x"];
        assert!(Cli::try_parse_from(bad_account).is_err());
        assert!(Cli::try_parse_from(bad_cookie).is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "anyrouter-config",
            "status",
            "--data-dir",
            "/tmp/cfg",
            "--storage-key",
            "alt",
        ])
        .unwrap();
        let config = cli.app_config();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(config.storage_key, "alt");
    }

    #[test]
    fn commands_drive_the_session() {
        let mut session = session();
        run_args(&mut session, &["provider", "add"]).unwrap();
        run_args(&mut session, &["provider", "set", "0", "key", "acme"]).unwrap();
        run_args(&mut session, &["account", "select", "0", "0"]).unwrap();
        run_args(&mut session, &["cookie", "set", "0", "0", "value", "-abc"]).unwrap();
        run_args(&mut session, &["provider", "duplicate", "0"]).unwrap();

        let model = session.model();
        assert_eq!(model.accounts[0].provider, "acme");
        assert_eq!(model.accounts[0].cookies[0].value, "-abc");
        assert_eq!(model.providers[1].key, "acme-copy");

        run_args(&mut session, &["provider", "remove", "0"]).unwrap();
        assert_eq!(session.model().accounts[0].provider, "");
    }

    #[test]
    fn missing_import_file_is_an_error() {
        let mut session = session();
        let result = run_args(&mut session, &["import", "accounts", "/nonexistent/accounts.json"]);
        assert!(result.is_err());
        assert_eq!(session.model().accounts.len(), 1);
    }
}
