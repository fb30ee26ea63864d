use std::process::ExitCode;

use clap::Parser;
use mcdesk::cli::command::{Cli, ColorChoice};
use mcdesk::cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match mcdesk::cli::execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            mcdesk::cli::report(&cli.config, &err);
            ExitCode::FAILURE
        }
    }
}
