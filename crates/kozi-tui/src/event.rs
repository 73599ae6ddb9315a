//! TUI event types for input and chat messages.

use crossterm::event::KeyEvent;
use kozi_core::ChatEvent;

/// Application event emitted by input handlers or the chat event stream.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// Event emitted by the chatbot.
    Chat(ChatEvent),
    /// The chat event stream dropped events.
    StreamLagged(u64),
    /// Scroll event in the chat view.
    Scroll(i16),
}
