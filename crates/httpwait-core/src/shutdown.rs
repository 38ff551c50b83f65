//! Cancellation signal for in-flight fetches.
//!
//! A `watch` channel of `()`: sending marks every subscribed receiver as
//! changed. Dropping the sender without sending is not a shutdown.

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Ask every subscriber to stop.
    pub fn shutdown(&self) -> Result<(), watch::error::SendError<()>> {
        self.0.send(())
    }

    pub fn subscribe(&self) -> ShutdownRx {
        self.0.subscribe()
    }
}

pub type ShutdownRx = watch::Receiver<()>;

pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());
    (ShutdownTx(tx), rx)
}

/// Resolves when a shutdown is signalled on `rx`. Never resolves when `rx`
/// is `None` or the sender went away.
pub async fn wait_for_shutdown(rx: &mut Option<ShutdownRx>) {
    match rx {
        Some(rx) => {
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}
