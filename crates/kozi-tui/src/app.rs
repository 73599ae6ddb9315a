//! Application state for the Kozi TUI.

use kozi_core::{ChatEvent, PipelineState};
use kozi_transcript::{Message, Sender};
use log::debug;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;

const TYPING_FRAMES: [&str; 3] = ["●○○", "○●○", "○○●"];

/// Single chat entry rendered in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    /// Who produced the message.
    pub sender: Sender,
    /// Message content.
    pub content: String,
    /// Local display time (`HH:MM`).
    pub time: String,
}

impl From<&Message> for ChatEntry {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender(),
            content: message.content().to_string(),
            time: message.local_time(),
        }
    }
}

/// Top-level application state for the TUI.
pub struct App {
    /// Chat transcript entries.
    pub messages: Vec<ChatEntry>,
    /// Current input buffer.
    pub input: String,
    /// Status line text.
    pub status: String,
    /// Display name for the current user.
    pub user_name: String,
    /// Whether the bot is composing a reply.
    pub typing: bool,
    typing_frame: usize,
    /// Current scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    /// Maximum scroll offset for the chat view.
    pub chat_max_scroll: u16,
}

impl App {
    /// Create a new application state with defaults.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            status: "idle".to_string(),
            user_name: "user".to_string(),
            typing: false,
            typing_frame: 0,
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
        }
    }

    /// Replace the transcript with a snapshot.
    pub fn load_messages(&mut self, messages: &[Message]) {
        debug!("loading transcript snapshot (messages={})", messages.len());
        self.messages = messages.iter().map(ChatEntry::from).collect();
        self.enable_auto_scroll();
    }

    /// Update the displayed user name.
    pub fn set_user_name(&mut self, user_name: String) {
        self.user_name = user_name;
    }

    /// Update the status line.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Apply a chat event to the transcript view.
    pub fn apply_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::MessageAppended(message) => {
                self.messages.push(ChatEntry::from(&message));
                self.maybe_enable_auto_scroll();
            }
            ChatEvent::Cleared => {
                self.messages.clear();
                self.scroll = 0;
                self.auto_scroll = true;
                self.chat_max_scroll = 0;
            }
            ChatEvent::StateChanged(state) => {
                self.typing = state == PipelineState::Sending;
                self.typing_frame = 0;
                self.push_status(match state {
                    PipelineState::Sending => "typing",
                    PipelineState::Idle => "idle",
                });
                self.maybe_enable_auto_scroll();
            }
        }
    }

    /// Advance the typing animation.
    pub fn tick(&mut self) {
        if self.typing {
            self.typing_frame = (self.typing_frame + 1) % TYPING_FRAMES.len();
        }
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    /// Scroll to the top of the chat view.
    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    /// Enable auto-scrolling to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes.
    ///
    /// Snaps to the new bottom only when auto-scroll is on or the view was
    /// already pinned to the bottom.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    fn maybe_enable_auto_scroll(&mut self) {
        if self.auto_scroll {
            self.scroll = self.chat_max_scroll;
        }
    }

    /// Render chat messages into styled lines for the UI.
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.messages.is_empty() && !self.typing {
            lines.push(Line::from(Span::styled(
                " No messages yet. Type a message below to start.",
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
            return lines;
        }

        let time_style = Style::default().fg(Color::Rgb(128, 128, 128));
        for (idx, entry) in self.messages.iter().enumerate() {
            let (label, badge_style) = match entry.sender {
                Sender::User => (
                    format!(" {} {} ", entry.sender.avatar(), self.user_name),
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(107, 161, 230))
                        .add_modifier(Modifier::BOLD),
                ),
                Sender::Bot => (
                    format!(" {} assistant ", entry.sender.avatar()),
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(238, 121, 72))
                        .add_modifier(Modifier::BOLD),
                ),
            };

            lines.push(Line::from(vec![
                Span::styled(label, badge_style),
                Span::styled(format!(" {}", entry.time), time_style),
            ]));

            let content_style = Style::default().fg(Color::Rgb(238, 238, 238));
            for line in entry.content.lines() {
                lines.push(Line::from(Span::styled(format!(" {line}"), content_style)));
            }

            if idx + 1 < self.messages.len() || self.typing {
                lines.push(Line::from(Span::raw("")));
            }
        }

        if self.typing {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} assistant ", Sender::Bot.avatar()),
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(238, 121, 72))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", TYPING_FRAMES[self.typing_frame]),
                    Style::default().fg(Color::Rgb(238, 121, 72)),
                ),
            ]));
        }

        // Trailing padding keeps the last message fully scrollable.
        lines.push(Line::from(Span::raw("")));

        lines
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{App, ChatEntry};
    use kozi_core::{ChatEvent, PipelineState};
    use kozi_transcript::{Message, Sender};
    use pretty_assertions::assert_eq;

    fn line_text(line: &ratatui::text::Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn snapshot_events_replace_transcript() {
        let mut app = App::new();
        app.load_messages(&[Message::new("stale", Sender::User)]);

        let welcome = Message::new("Hello!", Sender::Bot);
        app.apply_event(ChatEvent::Cleared);
        app.apply_event(ChatEvent::MessageAppended(welcome.clone()));

        assert_eq!(app.messages, vec![ChatEntry::from(&welcome)]);
    }

    #[test]
    fn typing_indicator_follows_pipeline_state() {
        let mut app = App::new();
        app.apply_event(ChatEvent::StateChanged(PipelineState::Sending));
        assert!(app.typing);
        assert_eq!(app.status, "typing");
        let rendered: Vec<String> = app.render_lines().iter().map(line_text).collect();
        assert!(rendered.iter().any(|line| line.contains("●○○")));

        app.tick();
        let rendered: Vec<String> = app.render_lines().iter().map(line_text).collect();
        assert!(rendered.iter().any(|line| line.contains("○●○")));

        app.apply_event(ChatEvent::StateChanged(PipelineState::Idle));
        assert!(!app.typing);
        assert_eq!(app.status, "idle");
    }

    #[test]
    fn rendered_entry_shows_avatar_time_and_text() {
        let mut app = App::new();
        app.set_user_name("sam".to_string());
        let message = Message::new("first line\nsecond line", Sender::User);
        app.apply_event(ChatEvent::MessageAppended(message.clone()));

        let rendered: Vec<String> = app.render_lines().iter().map(line_text).collect();
        assert_eq!(
            rendered[0],
            format!(" {} sam  {}", Sender::User.avatar(), message.local_time())
        );
        assert_eq!(rendered[1], " first line");
        assert_eq!(rendered[2], " second line");
    }

    #[test]
    fn scrolling_up_disables_auto_scroll() {
        let mut app = App::new();
        app.update_scroll_bounds(10);
        assert_eq!(app.scroll, 10);

        app.scroll_up(3);
        app.update_scroll_bounds(12);
        assert!(!app.auto_scroll);
        assert_eq!(app.scroll, 7);

        app.scroll_down(100);
        assert!(app.auto_scroll);
        assert_eq!(app.scroll, 12);
    }
}
