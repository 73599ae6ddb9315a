use kozi_core::{ChatEvent, EventSink, PipelineState};
use parking_lot::Mutex;

/// Captures every emitted event in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ChatEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChatEvent> {
        self.events.lock().clone()
    }

    /// Only the pipeline state transitions, in order.
    pub fn states(&self) -> Vec<PipelineState> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ChatEvent::StateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<ChatEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: ChatEvent) {
        self.events.lock().push(event);
    }
}
