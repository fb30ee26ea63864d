//! Operator CLI.
//!
//! Data and command failures from the backend are printed where they occur
//! and do not change the exit status. Only configuration, argument and local
//! I/O failures reach [`report`] and exit non-zero.

pub mod auth;
pub mod carrier;
pub mod command;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod diagnostic;
pub mod listings;
pub mod offers;
pub mod output;
pub mod paths;
pub mod render;
pub mod search;
pub mod transactions;
pub mod users;

use std::fs;
use std::path::Path;

use command::{Cli, Commands, ConfigCommand};
use context::Context;
use diagnostic::ConfigDiagnostic;

use crate::config::LoggingConfig;
use crate::error::{ConfigError, Error, Result};

/// Run the parsed command line.
pub async fn execute(cli: &Cli) -> Result<()> {
    if let Commands::Config(command) = &cli.command {
        LoggingConfig::default().init(cli.verbose);
        return match command {
            ConfigCommand::Show => config::execute_show(&cli.config),
            ConfigCommand::Validate => config::execute_validate(&cli.config),
        };
    }

    let ctx = Context::load(&cli.config, cli.verbose)?;
    match &cli.command {
        Commands::Login(args) => auth::execute_login(&ctx, args).await,
        Commands::Register(args) => auth::execute_register(&ctx, args).await,
        Commands::Logout => auth::execute_logout(&ctx).await,
        Commands::Whoami => auth::execute_whoami(&ctx).await,
        Commands::Transactions(command) => transactions::execute(&ctx, command).await,
        Commands::Offers(command) => offers::execute(&ctx, command).await,
        Commands::Listings(command) => listings::execute(&ctx, command).await,
        Commands::Users(command) => users::execute(&ctx, command).await,
        Commands::Dashboard(args) => dashboard::execute(&ctx, args).await,
        Commands::Search(args) => search::execute(&ctx, args).await,
        Commands::Carrier(args) => carrier::execute(&ctx, args).await,
        Commands::Companies(args) => carrier::execute_companies(&ctx, args).await,
        Commands::Config(_) => Ok(()),
    }
}

/// Print a fatal error. TOML errors are shown against the file contents.
pub fn report(config_path: &Path, err: &Error) {
    if let Error::Config(ConfigError::Parse(toml_err)) = err {
        if let Ok(src) = fs::read_to_string(config_path) {
            if let Some(diagnostic) = ConfigDiagnostic::from_toml(toml_err, &src) {
                if output::is_json() {
                    output::error(&diagnostic.message);
                } else {
                    eprintln!("{:?}", miette::Report::new(diagnostic));
                }
                return;
            }
        }
    }
    output::error(&err.display_message());
}
