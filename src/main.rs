//! Cardweb main entry point

use cardweb_api::start_server;
use cardweb_config::Config;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cardweb")]
#[command(author = "Cardweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight HTMX web frontend for the bank cards API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}:\n{}", args.config.display(), e.to_details());
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    log::info!("Config loaded from {}", args.config.display());

    let rt = Runtime::new()?;
    rt.block_on(start_server(config))?;

    Ok(())
}
