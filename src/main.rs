//=========================================================================
// Flood - Binary Entry Point
//
// Starts logging, builds the engine with default settings and runs it.
// Log verbosity follows RUST_LOG (default: info).
//
//=========================================================================

use std::process::ExitCode;

use flood_engine::EngineBuilder;
use log::error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = match EngineBuilder::new().build() {
        Ok(engine) => engine,
        Err(e) => {
            error!("Configuration rejected: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match engine.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
