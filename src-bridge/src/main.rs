use std::io;
use std::process::ExitCode;

use stock_bridge::BridgeState;
use stock_core::Config;

const ENV_CONFIG: &str = "STOCK_CONFIG";

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var_os(ENV_CONFIG) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::from_env()?,
    };

    let state = BridgeState::new(config)?;
    tracing::info!(channel = stock_bridge::CHANNEL, "Downloads bridge started");

    stock_bridge::serve(&state, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    stock_core::init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Downloads bridge stopped");
            ExitCode::FAILURE
        }
    }
}
