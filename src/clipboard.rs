//! System clipboard access
//!
//! Copies are fire and forget: [`Clipboard::dispatch`] hands the write to a
//! blocking task and never joins it. A failed write is logged and otherwise
//! dropped, so the grid never waits on the clipboard.

use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Shared handle to the system clipboard.
///
/// The `arboard` handle is kept for the whole session: on Linux the copied
/// text disappears when the handle that set it is dropped.
#[derive(Clone)]
pub struct Clipboard {
    inner: Arc<Mutex<Option<arboard::Clipboard>>>,
    init_error: Option<String>,
}

impl Clipboard {
    /// Open the system clipboard. Never fails; without a clipboard every
    /// write reports [`ClipboardError::Unavailable`].
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(handle) => Self {
                inner: Arc::new(Mutex::new(Some(handle))),
                init_error: None,
            },
            Err(e) => {
                log::debug!("no system clipboard: {e}");
                Self {
                    inner: Arc::new(Mutex::new(None)),
                    init_error: Some(e.to_string()),
                }
            }
        }
    }

    /// A clipboard that rejects every write
    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            init_error: Some("disabled".to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.init_error.is_none()
    }

    /// Write `text` synchronously
    pub fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        let handle = guard.as_mut().ok_or_else(|| {
            ClipboardError::Unavailable(
                self.init_error
                    .clone()
                    .unwrap_or_else(|| "unknown reason".to_string()),
            )
        })?;
        handle
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }

    /// Write `text` on a blocking task without waiting for the outcome.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, text: String) {
        let clipboard = self.clone();
        // Detached: the handle is dropped and the result never observed
        drop(tokio::task::spawn_blocking(move || {
            match clipboard.write(&text) {
                Ok(()) => log::debug!("copied {} bytes to clipboard", text.len()),
                Err(e) => log::debug!("{e}"),
            }
        }));
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}
