//! Pull-based telemetry channel.
//!
//! Bounded batch channel between the telemetry producer and the evaluator.
//! The consumer explicitly acknowledges readiness before the producer hands
//! over the next batch, so a slow evaluator applies backpressure instead of
//! growing an unbounded queue.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::events::ReadingBatch;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("telemetry channel closed by peer")]
    Closed,
}

/// Producer half. `feed` blocks until the consumer has asked for more.
pub struct BatchSender {
    batches: mpsc::Sender<ReadingBatch>,
    ready: mpsc::Receiver<()>,
}

/// Consumer half. `recv` signals readiness, then waits for the batch.
pub struct BatchReceiver {
    batches: mpsc::Receiver<ReadingBatch>,
    ready: mpsc::Sender<()>,
}

/// Creates a connected sender/receiver pair. `capacity` bounds how many
/// batches may be in flight; readiness signaling keeps it at most one ahead
/// of the evaluator in practice.
pub fn telemetry_channel(capacity: usize) -> (BatchSender, BatchReceiver) {
    let (batch_tx, batch_rx) = mpsc::channel(capacity.max(1));
    let (ready_tx, ready_rx) = mpsc::channel(1);
    (
        BatchSender {
            batches: batch_tx,
            ready: ready_rx,
        },
        BatchReceiver {
            batches: batch_rx,
            ready: ready_tx,
        },
    )
}

impl BatchSender {
    /// Waits for the consumer's readiness signal, then delivers the batch.
    pub async fn feed(&mut self, batch: ReadingBatch) -> Result<(), ChannelError> {
        self.ready.recv().await.ok_or(ChannelError::Closed)?;
        self.batches
            .send(batch)
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

impl BatchReceiver {
    /// Requests the next batch and waits for it. `None` once the producer
    /// side is gone.
    pub async fn recv(&mut self) -> Option<ReadingBatch> {
        self.ready.send(()).await.ok()?;
        self.batches.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TelemetryEvent;
    use crate::readings::MetricKind;
    use chrono::Utc;

    fn batch(tag: f64) -> ReadingBatch {
        vec![TelemetryEvent::new(
            "a",
            MetricKind::Temperature,
            tag,
            Utc::now(),
        )]
    }

    #[tokio::test]
    async fn delivers_batches_in_order() {
        let (mut tx, mut rx) = telemetry_channel(4);

        let producer = tokio::spawn(async move {
            tx.feed(batch(1.0)).await.unwrap();
            tx.feed(batch(2.0)).await.unwrap();
        });

        assert_eq!(rx.recv().await.unwrap()[0].value, 1.0);
        assert_eq!(rx.recv().await.unwrap()[0].value, 2.0);
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn producer_waits_for_consumer_request() {
        let (mut tx, mut rx) = telemetry_channel(1);

        let producer = tokio::spawn(async move {
            tx.feed(batch(1.0)).await.unwrap();
            // Second feed only completes after the consumer asks again.
            tx.feed(batch(2.0)).await.unwrap();
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first[0].value, 1.0);
        assert!(!producer.is_finished());

        let second = rx.recv().await.unwrap();
        assert_eq!(second[0].value, 2.0);
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn recv_returns_none_when_producer_drops() {
        let (tx, mut rx) = telemetry_channel(1);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn feed_fails_when_consumer_drops() {
        let (mut tx, rx) = telemetry_channel(1);
        drop(rx);
        assert!(matches!(tx.feed(batch(1.0)).await, Err(ChannelError::Closed)));
    }
}
