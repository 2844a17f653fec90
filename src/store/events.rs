//! Delivery of dataset-wide summary metadata.
//!
//! The dataset owner keeps a [`SummaryPublisher`] and hands the paired
//! [`SummaryReceiver`] to the store. Publishing swaps the whole summary in one
//! step, so readers see either the previous summary or the new one, never a
//! mix.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::metadata::SummaryMetadata;

/// Create a connected publisher/receiver pair holding `initial`.
pub fn summary_channel(initial: SummaryMetadata) -> (SummaryPublisher, SummaryReceiver) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (SummaryPublisher { tx }, SummaryReceiver { rx })
}

/// Sending half: replaces the current summary.
#[derive(Debug)]
pub struct SummaryPublisher {
    tx: watch::Sender<Arc<SummaryMetadata>>,
}

impl SummaryPublisher {
    /// Replace the summary seen by every receiver.
    ///
    /// Succeeds even when no receiver is alive.
    pub fn publish(&self, summary: SummaryMetadata) {
        debug!(name = ?summary.name, "Publishing new summary metadata");
        self.tx.send_replace(Arc::new(summary));
    }

    /// Another receiver observing this publisher.
    pub fn subscribe(&self) -> SummaryReceiver {
        SummaryReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving half: always yields the most recently published summary.
#[derive(Debug, Clone)]
pub struct SummaryReceiver {
    rx: watch::Receiver<Arc<SummaryMetadata>>,
}

impl SummaryReceiver {
    /// The current summary.
    pub fn current(&self) -> Arc<SummaryMetadata> {
        self.rx.borrow().clone()
    }

    /// Wait until a summary newer than the last one seen is published.
    ///
    /// Returns `false` once the publisher has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
