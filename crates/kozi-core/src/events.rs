//! Chat events emitted to the presentation layer.

use kozi_transcript::Message;

/// Submission pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Ready for a new submission.
    Idle,
    /// A reply is being produced; new submissions are ignored.
    Sending,
}

/// Event emitted by the chatbot as the transcript and pipeline change.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A record was appended to the transcript.
    MessageAppended(Message),
    /// The transcript was emptied; appended events follow for its new contents.
    Cleared,
    /// The pipeline moved between idle and sending.
    StateChanged(PipelineState),
}

/// Sink for chat events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ChatEvent);
}
