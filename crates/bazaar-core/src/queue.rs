//! Inbound buy-request queue.
//!
//! Any number of producers (UI handlers, scripted buyers, tests) hold a
//! cloneable [`RequestSender`]. The tick owns the single [`RequestQueue`]
//! and drains it without blocking once per tick.

use bazaar_types::BuyRequest;
use tokio::sync::mpsc;

/// Errors returned when submitting a request.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The receiving side has been dropped.
    #[error("buy request queue is closed")]
    Closed,
}

/// Create a connected sender/queue pair.
pub fn request_channel() -> (RequestSender, RequestQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RequestSender { tx }, RequestQueue { rx })
}

/// Producer handle for buy requests.
#[derive(Debug, Clone)]
pub struct RequestSender {
    tx: mpsc::UnboundedSender<BuyRequest>,
}

impl RequestSender {
    /// Submit a request for processing on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue has been dropped.
    pub fn send(&self, request: BuyRequest) -> Result<(), QueueError> {
        self.tx.send(request).map_err(|_closed| QueueError::Closed)
    }
}

/// Consumer side, owned by the tick.
#[derive(Debug)]
pub struct RequestQueue {
    rx: mpsc::UnboundedReceiver<BuyRequest>,
}

impl RequestQueue {
    /// Take every request currently queued, in arrival order.
    pub fn drain(&mut self) -> Vec<BuyRequest> {
        let mut drained = Vec::new();
        while let Ok(request) = self.rx.try_recv() {
            drained.push(request);
        }
        drained
    }

    /// Whether every sender has been dropped.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}
