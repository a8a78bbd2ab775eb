//! gsrelay server binary.
//!
//! Loads configuration, installs tracing and hands control to the
//! supervisor.

use anyhow::Context;

mod cli;
mod supervisor;
mod tracing_setup;

use cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help_requested {
        CliArgs::print_help();
        return Ok(());
    }

    // Resolve config files: CLI > environment variable
    let mut config_files = args.config_files;
    if config_files.is_empty() {
        if let Ok(p) = std::env::var("GSRELAY_CONFIG_PATH") {
            config_files.push(p);
        }
    }

    let config =
        gsrelay_config::load_config(&config_files).context("failed to load configuration")?;
    gsrelay_config::validate_config(&config).context("invalid configuration")?;

    tracing_setup::install_tracing(&config.logging);
    tracing::info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        files_dir = %config.files.directory,
        readonly = config.sender.readonly,
        disposal = config.sender.disposal,
        "starting"
    );

    supervisor::run(config).await
}
