//! Library entry point for the Kozi TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui terminal UI
//! against an initialized [`Chatbot`].

mod app;
mod event;
mod event_bus;
mod ui;

pub use event_bus::EventBus;

use anyhow::anyhow;
use app::App;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use kozi_core::{ChatEvent, Chatbot, SubmitOutcome};
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

const ENV_USER: &str = "USER";
const ENV_USERNAME: &str = "USERNAME";

/// Configuration for the Kozi TUI session.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Display name for the current user.
    pub user_name: Option<String>,
}

/// Launch the Kozi TUI against an initialized chatbot.
///
/// The caller is responsible for:
/// - Building the [`Chatbot`] with `Arc::new(events.clone())` as its event sink
/// - Calling [`Chatbot::initialize`] before `run`
/// - Initializing logging (e.g. `env_logger`) before calling `run`
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(
    chatbot: Arc<Chatbot>,
    events: EventBus,
    config: TuiConfig,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let user_name = config.user_name.unwrap_or_else(resolve_user_name);
    app.set_user_name(user_name);

    let (tx, mut rx) = mpsc::channel(256);
    spawn_event_stream(events.subscribe(), tx.clone());
    app.load_messages(&chatbot.messages());

    let mut terminal = setup_terminal()?;
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());
    info!("tui started (messages={})", app.messages.len());

    let result = event_loop(&mut terminal, &chatbot, &mut app, &mut rx).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    chatbot: &Arc<Chatbot>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        let event = rx
            .recv()
            .await
            .ok_or_else(|| anyhow!("event channel closed unexpectedly"))?;
        if handle_app_event(event, chatbot, app) {
            return Ok(());
        }
    }
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(event: AppEvent, chatbot: &Arc<Chatbot>, app: &mut App) -> bool {
    match event {
        AppEvent::Input(key) => handle_input(key, chatbot, app),
        AppEvent::Chat(event) => {
            app.apply_event(event);
            false
        }
        AppEvent::StreamLagged(skipped) => {
            warn!("chat event stream lagged (skipped={skipped})");
            app.load_messages(&chatbot.messages());
            false
        }
        AppEvent::Scroll(delta) => {
            if delta < 0 {
                app.scroll_up(delta.unsigned_abs());
            } else if delta > 0 {
                app.scroll_down(delta.unsigned_abs());
            }
            false
        }
        AppEvent::Tick => {
            app.tick();
            false
        }
    }
}

/// Handle keyboard input and dispatch actions.
fn handle_input(key: KeyEvent, chatbot: &Arc<Chatbot>, app: &mut App) -> bool {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if control => return true,
        KeyCode::Char('l') if control => {
            info!("clearing chat from tui");
            chatbot.clear();
            app.push_status("cleared");
        }
        KeyCode::Esc => app.input.clear(),
        KeyCode::Enter => send_message(chatbot, app),
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.enable_auto_scroll(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) if !control => app.input.push(ch),
        _ => {}
    }
    false
}

/// Hand the input line to the chatbot unless it is blank or a reply is pending.
fn send_message(chatbot: &Arc<Chatbot>, app: &mut App) {
    if app.input.trim().is_empty() {
        return;
    }
    if chatbot.is_busy() {
        debug!("submission deferred while sending");
        return;
    }
    let prompt = std::mem::take(&mut app.input);
    app.enable_auto_scroll();
    spawn_submit(chatbot.clone(), prompt);
}

/// Spawn a task to run a submission to completion.
fn spawn_submit(chatbot: Arc<Chatbot>, prompt: String) {
    tokio::spawn(async move {
        match chatbot.submit(&prompt).await {
            SubmitOutcome::Replied { recovered, .. } => {
                debug!("submission finished (recovered={recovered})");
            }
            SubmitOutcome::Ignored(reason) => {
                debug!("submission ignored (reason={reason:?})");
            }
        }
    });
}

/// Spawn a task forwarding chat events into the UI channel.
fn spawn_event_stream(
    mut receiver: broadcast::Receiver<ChatEvent>,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        loop {
            let event = match receiver.recv().await {
                Ok(event) => AppEvent::Chat(event),
                Err(RecvError::Lagged(skipped)) => AppEvent::StreamLagged(skipped),
                Err(RecvError::Closed) => break,
            };
            if sender.send(event).await.is_err() {
                break;
            }
        }
        debug!("chat event stream closed");
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    let app_event = match event {
                        CrosstermEvent::Key(key) => AppEvent::Input(key),
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => AppEvent::Scroll(-MOUSE_SCROLL_LINES),
                            MouseEventKind::ScrollDown => AppEvent::Scroll(MOUSE_SCROLL_LINES),
                            _ => continue,
                        },
                        _ => continue,
                    };
                    if sender.send(app_event).await.is_err() {
                        return;
                    }
                }
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if sender.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

fn resolve_user_name() -> String {
    std::env::var(ENV_USER)
        .or_else(|_| std::env::var(ENV_USERNAME))
        .unwrap_or_else(|_| "user".to_string())
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
