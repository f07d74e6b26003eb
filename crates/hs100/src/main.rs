mod cli;
mod handlers;
mod utils;

use clap::Parser;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Version => handlers::handle_version(),

        Command::Device {
            target,
            port,
            timeout,
            command,
        } => handlers::handle_device(target, port, timeout, command).await,
    }
}
