//! Terminal session for the result grid
//!
//! Owns the terminal while a [`GridViewer`] is open: raw mode, alternate
//! screen, and the event loop that feeds key presses, resizes and timer
//! ticks into the viewer and carries out the commands it returns.

use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::grid::{GridCommand, GridEvent, GridViewer};
use crate::keymap::KeyMap;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::io::{self, stdout, Stdout};
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen.
///
/// Installs a panic hook that restores the terminal first, so a panic
/// message is not swallowed by the alternate screen.
pub fn init() -> io::Result<Tui> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        hook(info);
    }));

    enable_raw_mode()?;
    if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    match Terminal::new(CrosstermBackend::new(stdout())) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore();
            Err(e)
        }
    }
}

/// Leave the alternate screen and raw mode
pub fn restore() -> io::Result<()> {
    let _ = execute!(stdout(), LeaveAlternateScreen);
    disable_raw_mode()
}

/// Paint the current grid frame over the whole area
pub fn draw(frame: &mut Frame, viewer: &GridViewer) {
    frame.render_widget(Paragraph::new(viewer.render()), frame.area());
}

/// Run an interactive session until the viewer quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run(viewer: GridViewer, keymap: &KeyMap, clipboard: &Clipboard) -> Result<()> {
    let mut terminal = init()?;
    let result = event_loop(&mut terminal, viewer, keymap, clipboard).await;
    restore()?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    mut viewer: GridViewer,
    keymap: &KeyMap,
    clipboard: &Clipboard,
) -> Result<()> {
    let (width, height) = crossterm::terminal::size()?;
    viewer.handle(GridEvent::Resize { width, height });

    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();

    while viewer.is_running() {
        terminal.draw(|frame| draw(frame, &viewer))?;

        let event = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => keymap.event_for(key),
                Some(Ok(Event::Resize(width, height))) => Some(GridEvent::Resize { width, height }),
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e.into()),
                // Input closed
                None => Some(GridEvent::Quit),
            },
            Some(event) = timer_rx.recv() => Some(event),
        };

        if let Some(event) = event {
            let commands = viewer.handle(event);
            run_commands(commands, clipboard, &timer_tx);
        }
    }

    log::debug!("grid session ended");
    Ok(())
}

/// Carry out the viewer's side effects without waiting on any of them
pub fn run_commands(
    commands: Vec<GridCommand>,
    clipboard: &Clipboard,
    timer_tx: &mpsc::UnboundedSender<GridEvent>,
) {
    for command in commands {
        match command {
            GridCommand::CopyToClipboard(text) => clipboard.dispatch(text),
            GridCommand::ScheduleFeedbackExpiry(delay) => {
                let tx = timer_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    // Receiver is gone once the session has ended
                    let _ = tx.send(GridEvent::FeedbackExpired);
                });
            }
            GridCommand::Quit => {}
        }
    }
}
