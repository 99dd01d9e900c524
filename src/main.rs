use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use u9s::{app, config, logging};

#[derive(Parser, Debug)]
#[command(name = "u9s")]
#[command(about = "A terminal UI for user administration, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/u9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL (overrides the config file and U9S_API_URL)
  #[arg(short, long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Keep the guard alive for the lifetime of the app so buffered log
  // lines are flushed on exit
  let _log_guard = logging::init()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override base URL if specified on the command line
  let config = if let Some(url) = args.url {
    config::Config {
      api: config::ApiConfig { base_url: url },
      ..config
    }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
