//! Collaborator seams consumed by the session core.
//!
//! The core never talks to a concrete search backend, process spawner, or UI
//! toolkit; it sees these traits only. Implementations must be `Send + Sync`
//! because the calls run on spawned tasks.

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::RenderFrame;
use crate::results::{ResultType, SearchResult};

/// Resolves a query string into ranked results. May fail; may complete out
/// of order with respect to later requests.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Executes the selected result.
#[async_trait]
pub trait LaunchExecutor: Send + Sync {
    async fn launch(&self, path: &str, result_type: ResultType) -> Result<()>;
}

/// Window-system control surface.
#[async_trait]
pub trait WindowControl: Send + Sync {
    /// Primary graceful-exit interface.
    async fn request_termination(&self) -> Result<()>;
    /// Fallback termination interface.
    async fn close_window(&self) -> Result<()>;
    /// Best-effort platform focus nudge; failures are non-fatal.
    fn request_focus(&self);
}

/// The core's only outlet to the UI.
pub trait PresentationSink: Send + Sync {
    fn render(&self, frame: &RenderFrame);
}
