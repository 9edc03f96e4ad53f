use clap::Parser;
use tracing_subscriber::EnvFilter;

use sesame::cli::{commands, output, Cli};
use sesame::errors::ErrorKind;

/// Environment variable holding the log filter (e.g. `SESAME_LOG=debug`).
const LOG_ENV: &str = "SESAME_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(&cli) {
        output::error(&e.to_string());
        let code = match e.kind() {
            ErrorKind::Config => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
