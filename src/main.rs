use clap::Parser;
use loan_checkout::cli::dispatcher::Dispatcher;
use loan_checkout::cli::main_types::Cli;
use loan_checkout::storage::config::Config;
use loan_checkout::utils::logging;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| Config::file_in(&PathBuf::from(dir)));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        println!("Verbose mode is enabled");
        if let Some(config_dir) = &cli.config_dir {
            println!("Using config directory: {}", config_dir);
        }
    }

    let dispatcher = Dispatcher::new(
        config,
        config_path,
        cli.profile,
        cli.server_url,
        cli.verbose,
    );

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("{} {}", e.severity().emoji(), e.display_friendly());
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("💡 {}", hint);
        }
        std::process::exit(1);
    }
}
