use httpwait_core::logging;
use httpwait_core::shutdown::create_shutdown_channel;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Logging goes to a file or stderr; stdout belongs to command output.
    if let Err(err) = logging::init_logging() {
        eprintln!("httpwait: logging unavailable: {:#}", err);
    }

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling in-flight fetches");
            let _ = shutdown_tx.shutdown();
        }
    });

    if let Err(err) = CliCommand::run_from_args(shutdown_rx).await {
        eprintln!("httpwait error: {:#}", err);
        std::process::exit(1);
    }
}
