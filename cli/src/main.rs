use clap::Parser;
use std::sync::Arc;
use themeshop::cli::Cli;
use themeshop::commands::{dialog_for, execute, open_panel};
use themeshop::config::load_config;
use themeshop::logger::setup_logger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    setup_logger(config.logging())?;

    let mut panel = open_panel(&config, Arc::new(dialog_for(&cli.command))).await?;
    let mut stdout = std::io::stdout();

    if let Err(e) = execute(cli.command, &mut panel, &mut stdout).await {
        log::error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
