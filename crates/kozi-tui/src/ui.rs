//! Rendering routines for the Kozi TUI.

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

const PRIMARY: Color = Color::Rgb(236, 91, 43);
const SECONDARY: Color = Color::Rgb(238, 121, 72);
const TEXT: Color = Color::Rgb(238, 238, 238);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(238, 121, 72);
const ONLINE: Color = Color::Rgb(120, 220, 140);

const HEADER_HEIGHT: u16 = 3;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // header bar
            Constraint::Min(0),                // chat
            Constraint::Length(3),             // input
            Constraint::Length(1),             // status bar
        ])
        .split(frame.area());

    draw_header(frame, app, root[0]);
    draw_chat(frame, app, root[1]);
    draw_input(frame, app, root[2]);
    draw_status_bar(frame, app, root[3]);
}

/// Draw the title bar with assistant name and presence.
fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let presence = if app.typing { "typing..." } else { "online" };
    let line = Line::from(vec![
        Span::styled(
            " kozi ",
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{VERSION}"), Style::default().fg(TEXT_MUTED)),
        Span::styled("  AI Assistant ", Style::default().fg(TEXT)),
        Span::styled("● ", Style::default().fg(ONLINE)),
        Span::styled(presence, Style::default().fg(TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Draw the chat transcript with border and scrollbar.
fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_lines();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Chat ", Style::default().fg(TEXT_MUTED)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let chat_inner = Rect {
        width: content_width,
        ..inner
    };

    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(chat, chat_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(TEXT_MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Draw the input box with border and cursor.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let is_active = !app.typing;
    let border_color = if is_active { BORDER_ACTIVE } else { BORDER };
    let title = if is_active {
        " Input "
    } else {
        " Waiting for reply "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default().fg(if is_active { SECONDARY } else { TEXT_MUTED }),
        ));

    let inner = block.inner(area);

    let prompt_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let input_text = if app.input.is_empty() {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled("Type your message...", Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(app.input.as_str(), Style::default().fg(TEXT)),
        ])
    };

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(input_text), inner);

    let cursor_offset = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    frame.set_cursor_position((
        inner.x.saturating_add(1).saturating_add(cursor_offset),
        inner.y,
    ));
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_color = match app.status.as_str() {
        "typing" => PRIMARY,
        "idle" => TEXT_MUTED,
        _ => SECONDARY,
    };

    let shortcuts = vec![
        Span::styled(" Enter", Style::default().fg(TEXT_MUTED)),
        Span::styled(" send", Style::default().fg(BORDER)),
        Span::styled("  Esc", Style::default().fg(TEXT_MUTED)),
        Span::styled(" clear input", Style::default().fg(BORDER)),
        Span::styled("  Ctrl+L", Style::default().fg(TEXT_MUTED)),
        Span::styled(" clear chat", Style::default().fg(BORDER)),
        Span::styled("  PgUp/PgDn", Style::default().fg(TEXT_MUTED)),
        Span::styled(" scroll", Style::default().fg(BORDER)),
        Span::styled("  Ctrl+C", Style::default().fg(TEXT_MUTED)),
        Span::styled(" quit", Style::default().fg(BORDER)),
    ];

    let right_text = format!(" {} ", app.status);
    let right_len = right_text.len() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len.min(area.width),
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(status_color),
        ))),
        right_area,
    );
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::app::App;
    use kozi_core::{ChatEvent, PipelineState};
    use kozi_transcript::{Message, Sender};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn frame_shows_transcript_and_shortcuts() {
        let mut app = App::new();
        app.apply_event(ChatEvent::MessageAppended(Message::new(
            "How can I help you today?",
            Sender::Bot,
        )));
        let screen = rendered(&mut app);
        assert!(screen.contains("How can I help you today?"));
        assert!(screen.contains("Ctrl+L"));
        assert!(screen.contains("Type your message..."));
    }

    #[test]
    fn frame_marks_pending_reply() {
        let mut app = App::new();
        app.apply_event(ChatEvent::StateChanged(PipelineState::Sending));
        let screen = rendered(&mut app);
        assert!(screen.contains("Waiting for reply"));
        assert!(screen.contains("typing..."));
    }
}
