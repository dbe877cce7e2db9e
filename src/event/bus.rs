use tokio::sync::broadcast;
use tracing::debug;

use super::events::GameEvent;

/// Broadcast channel distributing game events to presentation
/// subscribers.
///
/// The session has a single stream; subscribers that fall behind the
/// channel capacity miss the oldest events, which is acceptable because
/// the authoritative state is always available from a snapshot.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emits an event to every subscriber. Having no subscribers is fine;
    /// the core never depends on anyone listening.
    pub fn emit(&self, event: GameEvent) {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = event_type, receivers, "game event emitted");
            }
            Err(_) => {
                debug!(event = event_type, "game event emitted with no receivers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
