use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

pub const UPDATE: &str = "update";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Client, service and review writes: dashboards and tables recompute.
    Dashboard,
    /// Reservation writes: timelines and notifications recompute.
    Reservations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSignal {
    pub topic: Topic,
    pub kind: String,
}

/// Fan-out of "something changed" signals to every open view. Delivery is
/// best effort: a view that misses a signal stays stale until the next one.
#[derive(Clone)]
pub struct SyncChannel {
    sender: broadcast::Sender<SyncSignal>,
}

impl Default for SyncChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Returns how many views were listening.
    pub fn publish(&self, topic: Topic) -> usize {
        let signal = SyncSignal {
            topic,
            kind: UPDATE.to_string(),
        };
        match self.sender.send(signal) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!(?topic, "no open views to notify");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
        self.sender.subscribe()
    }

    /// Signals as a stream; lagged receivers skip what they missed.
    pub fn stream(&self) -> impl Stream<Item = SyncSignal> + Send + 'static + use<> {
        BroadcastStream::new(self.subscribe()).filter_map(|result| result.ok())
    }
}
