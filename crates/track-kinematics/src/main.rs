use clap::Parser;
use std::process::ExitCode;
use track_kinematics::{Cli, logging, run};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);
    tracing::debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
