use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Instrument};

use member_transfer::cli::commands::{
    show_getting_started, CheckLinkCommand, ConfigCommand, QuoteCommand, RunCommand,
};
use member_transfer::cli::{Cli, Commands};
use member_transfer::telemetry::create_command_span;
use member_transfer::{init_telemetry, ShutdownCoordinator, WizardConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = WizardConfig::load_env_file();
    let mut config = WizardConfig::load(cli.variant, cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }
    init_telemetry(&config.observability)?;

    match env_file {
        Ok(true) => info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let Some(command) = cli.command else {
        return show_getting_started(&config);
    };

    let span = create_command_span(command.name(), &config.variant.to_string());
    async move {
        match command {
            Commands::Run(args) => {
                let shutdown = ShutdownCoordinator::new();
                let cancel = shutdown.install_signal_handlers();
                let result = RunCommand::from(args).execute(config, cancel).await;
                shutdown.shutdown();
                result
            }
            Commands::Quote { members, json } => QuoteCommand::new(members, json).execute(&config),
            Commands::CheckLink { links } => CheckLinkCommand::new(links).execute(),
            Commands::Config { write } => ConfigCommand::new(write).execute(&config),
        }
    }
    .instrument(span)
    .await
}
