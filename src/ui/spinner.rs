//! Progress spinner on stderr
//!
//! Shown while a query runs, before the grid takes over the terminal.

use std::io::{stderr, IsTerminal, Write};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: &[&str] = &[
    "▉", "▊", "▋", "▌", "▍", "▎", "▏", "▎", "▍", "▌", "▋", "▊", "▉",
];
const TICK: Duration = Duration::from_millis(100);

/// A running spinner; stop it with [`Spinner::stop`]
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start drawing, unless stderr is not a terminal
    pub fn start() -> Self {
        if !stderr().is_terminal() {
            return Self {
                stop_tx: None,
                task: None,
            };
        }

        let (stop_tx, mut stop_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(TICK);
            for frame in FRAMES.iter().cycle() {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let mut err = stderr();
                        let _ = write!(err, "\r{}", frame_text(frame, started.elapsed()));
                        let _ = err.flush();
                    }
                }
            }
            let mut err = stderr();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        });

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Stop and wait until the spinner line is cleared
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

fn frame_text(frame: &str, elapsed: Duration) -> String {
    format!("{frame} {:.2}s", elapsed.as_secs_f64())
}
