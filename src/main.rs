pub mod controller;
pub mod daemon;
pub mod mapping;
pub mod output;

use crate::controller::GilrsSource;
use crate::daemon::{signals, Cadence, PointerDaemon};
use crate::output::uinput::{VirtualPointer, DEVICE_NAME};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = setup() {
        eprintln!("fatal: {:?}", e);
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            error!("fatal: {:#}", report);
            ExitCode::FAILURE
        }
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn run() -> Result<()> {
    let quit = signals::spawn_listener();

    // Joysticks first, then the pointer; each is released if a later step fails
    let input = GilrsSource::open(quit).wrap_err("could not initialize any joysticks")?;

    let pending = VirtualPointer::connect(DEVICE_NAME).wrap_err("could not connect to uinput")?;
    let mut output = pending
        .require_relative_motion()
        .wrap_err("relative pointer motion is not supported")?;
    if let Some(path) = output.device_path() {
        info!("Virtual pointer available at {}", path.display());
    }

    let daemon = PointerDaemon::create(Box::new(input), Box::new(output), Cadence::default())
        .start()
        .wrap_err("could not initialize any joysticks")?;

    let stopped = daemon.run().await.wrap_err("pointer output failed")?;
    stopped.shutdown();
    Ok(())
}
