//! Local event bus connecting the chatbot to the TUI.

use kozi_core::{ChatEvent, EventSink};
use log::debug;
use tokio::sync::broadcast;

/// Broadcast-backed event bus for an embedded chatbot.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("tui event bus initialized (buffer={})", buffer);
        Self { sender }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for EventBus {
    /// Emit an event into the broadcast channel.
    fn emit(&self, event: ChatEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use kozi_core::{ChatEvent, EventSink, PipelineState};
    use pretty_assertions::assert_eq;

    #[test]
    fn subscribers_receive_emitted_events() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe();
        bus.emit(ChatEvent::StateChanged(PipelineState::Sending));
        bus.emit(ChatEvent::Cleared);
        assert_eq!(
            receiver.try_recv().expect("first"),
            ChatEvent::StateChanged(PipelineState::Sending)
        );
        assert_eq!(receiver.try_recv().expect("second"), ChatEvent::Cleared);
    }

    #[test]
    fn emitting_without_subscribers_is_silent() {
        let bus = EventBus::new(1);
        bus.emit(ChatEvent::Cleared);
    }
}
