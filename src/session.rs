//! The incremental query/selection/launch session controller.
//!
//! One session lives for one process run. All state mutation happens on a
//! single event loop fed by an unbounded channel: UI events from the
//! frontend, debounce-timer firings, search completions, and termination
//! outcomes are interleaved there, so no locking is needed anywhere.
//!
//! Ordering hazards handled here:
//! - stale search responses racing fresh ones (request-id comparison)
//! - double-launch races (the launch gate)
//! - premature dismissal while a launch is in flight
//! - keystrokes arriving before the input surface is interactive

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::HyperlaunchError;
use crate::keystroke_buffer::KeystrokeBuffer;
use crate::launch::LaunchGate;
use crate::lifecycle::{self, DismissTrigger};
use crate::protocol::{RenderFrame, UiEvent};
use crate::query::QuerySession;
use crate::results::{display_items, ResultStore, SearchResult};
use crate::selection::Selection;
use crate::traits::{LaunchExecutor, PresentationSink, SearchProvider, WindowControl};

/// Everything multiplexed onto the session's event loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// An event from the presentation layer.
    Ui(UiEvent),
    /// The readiness settle delay elapsed; the input surface is interactive.
    Ready,
    /// The debounce timer for request `id` elapsed.
    DebounceElapsed { id: u64 },
    /// The provider call for request `id` finished.
    SearchDone {
        id: u64,
        outcome: Result<Vec<SearchResult>, HyperlaunchError>,
    },
    /// A termination chain (after a launch or a dismissal) settled.
    TerminationSettled { success: bool, after_launch: bool },
    /// The event source closed; the frontend went away.
    Closed,
}

pub struct Session {
    config: Config,
    provider: Arc<dyn SearchProvider>,
    executor: Arc<dyn LaunchExecutor>,
    window: Arc<dyn WindowControl>,
    sink: Arc<dyn PresentationSink>,
    tx: UnboundedSender<SessionEvent>,
    rx: UnboundedReceiver<SessionEvent>,

    store: ResultStore,
    selection: Selection,
    query: QuerySession,
    gate: LaunchGate,
    buffer: KeystrokeBuffer,
    ready: bool,
    /// At most one pending debounce timer; a new one always aborts it.
    debounce: Option<JoinHandle<()>>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        provider: Arc<dyn SearchProvider>,
        executor: Arc<dyn LaunchExecutor>,
        window: Arc<dyn WindowControl>,
        sink: Arc<dyn PresentationSink>,
        tx: UnboundedSender<SessionEvent>,
        rx: UnboundedReceiver<SessionEvent>,
    ) -> Self {
        Session {
            config,
            provider,
            executor,
            window,
            sink,
            tx,
            rx,
            store: ResultStore::new(),
            selection: Selection::new(),
            query: QuerySession::new(),
            gate: LaunchGate::new(),
            buffer: KeystrokeBuffer::new(),
            ready: false,
            debounce: None,
        }
    }

    /// Drive the session until termination succeeds or the frontend closes.
    ///
    /// Keys observed before readiness land in the keystroke buffer and are
    /// replayed as one synthetic input change once the settle delay elapses.
    pub async fn run(mut self) {
        self.render();
        self.window.request_focus();
        self.spawn_ready_timer();

        while let Some(event) = self.rx.recv().await {
            match event {
                SessionEvent::Ui(ui_event) => self.on_ui_event(ui_event),
                SessionEvent::Ready => self.on_ready(),
                SessionEvent::DebounceElapsed { id } => self.on_debounce_elapsed(id),
                SessionEvent::SearchDone { id, outcome } => self.on_search_done(id, outcome),
                SessionEvent::TerminationSettled {
                    success,
                    after_launch,
                } => {
                    if success {
                        break;
                    }
                    // Both exit paths failed; the process stays open. Re-arm
                    // the gate so a later launch attempt can retry.
                    if after_launch {
                        self.gate.reset();
                    }
                }
                SessionEvent::Closed => {
                    debug!("event source closed");
                    break;
                }
            }
        }
        info!("session loop ended");
    }

    /// Readiness comes after initial render, focus request, one presentation
    /// frame, and a fixed settle delay - in that order.
    fn spawn_ready_timer(&self) {
        let tx = self.tx.clone();
        let settle = Duration::from_millis(self.config.ready_settle_ms);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            tokio::time::sleep(settle).await;
            let _ = tx.send(SessionEvent::Ready);
        });
    }

    fn on_ready(&mut self) {
        self.ready = true;
        debug!("input surface ready");
        if let Some(buffered) = self.buffer.flush() {
            if !buffered.is_empty() {
                debug!(buffered = %buffered, "replaying pre-ready keystrokes");
                let _ = self
                    .tx
                    .send(SessionEvent::Ui(UiEvent::InputChanged { value: buffered }));
            }
        }
    }

    fn on_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::InputChanged { value } => self.on_input_changed(&value),
            UiEvent::KeyDown { key, modifiers, .. } => self.on_key_down(&key, &modifiers),
            UiEvent::Activate { index } => self.launch_index(index),
            UiEvent::Blur => self.dismiss(DismissTrigger::Blur),
        }
    }

    fn on_key_down(&mut self, key: &str, modifiers: &[String]) {
        // Escape dismisses whether or not the input has focus yet.
        if key.eq_ignore_ascii_case("escape") || key.eq_ignore_ascii_case("esc") {
            self.dismiss(DismissTrigger::Escape);
            return;
        }
        if !self.ready {
            self.buffer.capture(key, modifiers);
            return;
        }
        match key.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => self.move_selection(-1),
            "down" | "arrowdown" => self.move_selection(1),
            "enter" | "return" => self.launch_index(self.selection.index()),
            _ => {}
        }
    }

    fn on_input_changed(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if let Some(timer) = self.debounce.take() {
            timer.abort();
        }
        // Allocate a fresh id even for the empty query, so responses still
        // in flight for earlier input go stale.
        let id = self.query.update(trimmed.to_string());
        if trimmed.is_empty() {
            self.store.clear();
            self.selection.reset();
            self.render();
            return;
        }
        let tx = self.tx.clone();
        let delay = Duration::from_millis(self.config.debounce_ms);
        self.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionEvent::DebounceElapsed { id });
        }));
    }

    fn on_debounce_elapsed(&mut self, id: u64) {
        if !self.query.is_current(id) {
            // Superseded while the firing was queued behind newer input.
            return;
        }
        self.debounce = None;
        let provider = Arc::clone(&self.provider);
        let query = self.query.current().to_string();
        let tx = self.tx.clone();
        debug!(id, query = %query, "issuing search");
        tokio::spawn(async move {
            let outcome = provider.search(&query).await;
            let _ = tx.send(SessionEvent::SearchDone { id, outcome });
        });
    }

    fn on_search_done(&mut self, id: u64, outcome: Result<Vec<SearchResult>, HyperlaunchError>) {
        if !self.query.is_current(id) {
            // Expected outcome, not an error: a newer request owns the store
            // now. Failures of stale requests stay silent too.
            debug!(id, "discarding stale search response");
            return;
        }
        match outcome {
            Ok(results) => {
                debug!(id, count = results.len(), "applying search results");
                self.store.replace(results, self.query.current().to_string());
            }
            Err(e) => {
                error!(id, error = %e, "search provider failed");
                self.store
                    .replace(Vec::new(), self.query.current().to_string());
            }
        }
        self.selection.reset();
        self.render();
    }

    fn move_selection(&mut self, delta: i32) {
        if self.selection.move_by(delta, self.store.len()) {
            self.render();
        }
    }

    /// Launch the result at `index` (full-list addressing), then terminate.
    /// A second call while one launch is in flight is a no-op.
    fn launch_index(&mut self, index: usize) {
        let Some(result) = self.store.get(index) else {
            return;
        };
        if !self.gate.try_begin() {
            debug!("launch already in flight, ignoring");
            return;
        }
        let path = result.path.clone();
        let result_type = result.result_type;
        info!(path = %path, ?result_type, "launching");

        let executor = Arc::clone(&self.executor);
        let window = Arc::clone(&self.window);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Launch failures are logged, not retried, and never block the
            // termination attempt.
            if let Err(e) = executor.launch(&path, result_type).await {
                error!(path = %path, error = %e, "launch failed");
            }
            let success = terminate(window.as_ref()).await;
            let _ = tx.send(SessionEvent::TerminationSettled {
                success,
                after_launch: true,
            });
        });
    }

    fn dismiss(&mut self, trigger: DismissTrigger) {
        if !lifecycle::should_dismiss(trigger, &self.gate) {
            return;
        }
        debug!(?trigger, "dismissing");
        let window = Arc::clone(&self.window);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let success = terminate(window.as_ref()).await;
            let _ = tx.send(SessionEvent::TerminationSettled {
                success,
                after_launch: false,
            });
        });
    }

    fn render(&self) {
        let frame = RenderFrame::Render {
            results: display_items(&self.store, self.config.max_rendered),
            selected: self.selection.active(self.store.len()),
            query: self.store.query().to_string(),
            expanded: self.store.is_expanded(),
        };
        self.sink.render(&frame);
    }
}

/// Primary termination, then the window-close fallback. Returns whether
/// either path succeeded; total failure is terminal and only logged.
async fn terminate(window: &dyn WindowControl) -> bool {
    match window.request_termination().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "primary termination failed, closing window instead");
            match window.close_window().await {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "window close failed too; staying open");
                    false
                }
            }
        }
    }
}
