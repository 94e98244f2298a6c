// ── Snapshot sinks ──
//
// Where published snapshots go. The poller asks each sink how many
// consumers are listening before fetching, so an unobserved resource
// costs no device traffic.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::model::{InterfaceRecord, Snapshot, StationRecord, StatusRecord};

/// Outbound channel for one resource kind.
pub trait SnapshotSink<T>: Send + Sync {
    /// Consumers currently attached. Zero means the poller skips this kind.
    fn subscriber_count(&self) -> usize;

    /// Deliver one snapshot. Delivery to nobody is not an error.
    fn publish(&self, snapshot: Snapshot<T>);
}

/// Fan-out sink over a `tokio::sync::broadcast` channel.
///
/// Receivers that fall behind by more than `capacity` snapshots see
/// `RecvError::Lagged` and resume from the oldest retained one.
pub struct BroadcastSink<T> {
    tx: broadcast::Sender<Arc<Snapshot<T>>>,
}

impl<T> BroadcastSink<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Attach a new consumer. It sees snapshots published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Snapshot<T>>> {
        self.tx.subscribe()
    }
}

impl<T: Send + Sync> SnapshotSink<T> for BroadcastSink<T> {
    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn publish(&self, snapshot: Snapshot<T>) {
        // Err only when every receiver has been dropped.
        let _ = self.tx.send(Arc::new(snapshot));
    }
}

/// The three sinks a poller publishes to.
#[derive(Clone)]
pub struct Sinks {
    pub status: Arc<dyn SnapshotSink<StatusRecord>>,
    pub interfaces: Arc<dyn SnapshotSink<InterfaceRecord>>,
    pub stations: Arc<dyn SnapshotSink<StationRecord>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::Header;

    fn snapshot(records: Vec<u32>) -> Snapshot<u32> {
        Snapshot::new(
            Header {
                stamp: Utc::now(),
                source: "ap".into(),
            },
            records,
        )
    }

    #[test]
    fn subscriber_count_tracks_receivers() {
        let sink = BroadcastSink::<u32>::new(4);
        assert_eq!(sink.subscriber_count(), 0);

        let rx = sink.subscribe();
        assert_eq!(sink.subscriber_count(), 1);

        drop(rx);
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[test]
    fn publish_without_receivers_is_silent() {
        let sink = BroadcastSink::<u32>::new(4);
        sink.publish(snapshot(vec![1]));
    }

    #[tokio::test]
    async fn every_receiver_gets_the_snapshot() {
        let sink = BroadcastSink::<u32>::new(4);
        let mut a = sink.subscribe();
        let mut b = sink.subscribe();

        sink.publish(snapshot(vec![1, 2]));

        assert_eq!(a.recv().await.unwrap().records, [1, 2]);
        assert_eq!(b.recv().await.unwrap().records, [1, 2]);
    }
}
