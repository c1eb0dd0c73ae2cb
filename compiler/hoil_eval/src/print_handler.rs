//! Output sink for the `Print` capability.
//!
//! The CLI prints to stdout; tests capture lines in a buffer and inspect them
//! afterwards. Dispatch is a plain enum match.

use parking_lot::Mutex;
use std::sync::Arc;

/// Writes each line to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn line(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Captures printed lines in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    lines: Mutex<Vec<String>>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, msg: &str) {
        self.lines.lock().push(msg.to_owned());
    }

    /// Lines printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

/// The concrete handler behind a [`SharedPrintHandler`].
pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    /// Drops everything.
    Silent,
}

impl PrintHandlerImpl {
    pub fn line(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.line(msg),
            Self::Buffer(h) => h.line(msg),
            Self::Silent => {}
        }
    }

    /// Captured lines; empty for handlers that do not capture.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.lines(),
            Self::Stdout(_) | Self::Silent => Vec::new(),
        }
    }

    /// Captured lines, clearing the buffer.
    pub fn take(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.take(),
            Self::Stdout(_) | Self::Silent => Vec::new(),
        }
    }
}

/// Handle shared between the host backend and whoever reads the output.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}
