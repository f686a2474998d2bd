//! Stdio binding of the frontend protocol.
//!
//! The presentation layer drives the session with JSONL events on stdin and
//! receives JSONL frames on stdout. Malformed lines are logged and skipped;
//! stdin closing ends the session. stderr stays free for logging.

use std::io::{BufRead, BufReader, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::error::{HyperlaunchError, Result};
use crate::protocol::{self, RenderFrame};
use crate::session::SessionEvent;
use crate::traits::{PresentationSink, WindowControl};

/// Writes frames to stdout and stands in for the window system: termination
/// and focus requests become frames the frontend acts on.
pub struct StdioFrontend {
    out: Mutex<std::io::Stdout>,
}

impl StdioFrontend {
    pub fn new() -> Self {
        StdioFrontend {
            out: Mutex::new(std::io::stdout()),
        }
    }

    fn write_frame(&self, frame: &RenderFrame) -> Result<()> {
        let line = serde_json::to_string(frame)?;
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

impl Default for StdioFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSink for StdioFrontend {
    fn render(&self, frame: &RenderFrame) {
        if let Err(e) = self.write_frame(frame) {
            warn!(error = %e, "failed to write render frame");
        }
    }
}

#[async_trait]
impl WindowControl for StdioFrontend {
    async fn request_termination(&self) -> Result<()> {
        self.write_frame(&RenderFrame::Exit)
            .map_err(|e| HyperlaunchError::Termination(e.to_string()))
    }

    async fn close_window(&self) -> Result<()> {
        self.write_frame(&RenderFrame::CloseWindow)
            .map_err(|e| HyperlaunchError::Termination(e.to_string()))
    }

    fn request_focus(&self) {
        // Best-effort nudge; a failure here is not worth surfacing.
        if let Err(e) = self.write_frame(&RenderFrame::RequestFocus) {
            warn!(error = %e, "focus request failed");
        }
    }
}

/// Read JSONL UI events from stdin on a dedicated thread, feeding the
/// session channel until EOF.
pub fn spawn_stdin_reader(tx: UnboundedSender<SessionEvent>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in BufReader::new(stdin.lock()).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match protocol::parse_event(&line) {
                Ok(event) => {
                    if tx.send(SessionEvent::Ui(event)).is_err() {
                        break; // session loop is gone
                    }
                }
                Err(e) => warn!(error = %e, line = %line, "ignoring malformed ui event"),
            }
        }
        debug!("stdin closed");
        let _ = tx.send(SessionEvent::Closed);
    })
}
