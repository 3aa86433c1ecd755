//! Channel-fed facade in front of the scheduler.

use crate::domain::request::PendingRequest;
use crate::service::TxScheduler;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Receives admitted requests over a channel and feeds the scheduler.
///
/// Producers hold the `Sender` half; the front drains the channel and calls
/// `TxScheduler::enqueue`, which applies the priority ordering and capacity
/// bound. The front exits when every sender is dropped.
pub struct ServiceFront {
    scheduler: Arc<TxScheduler>,
    rx: mpsc::Receiver<PendingRequest>,
}

impl ServiceFront {
    /// Creates the front and the sender half producers submit through.
    pub fn channel(
        scheduler: Arc<TxScheduler>,
        buffer: usize,
    ) -> (mpsc::Sender<PendingRequest>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { scheduler, rx })
    }

    /// Drains the channel until all senders are gone.
    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            self.scheduler.enqueue(request);
        }
        info!("service front channel closed, shutting down");
    }

    /// Runs the front on the runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
