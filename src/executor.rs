//! Launch execution for selected results.
//!
//! Applications run their Exec line through `sh -c`, the way a desktop shell
//! would; files, directories, and content matches open with the system
//! default handler. The spawned process is detached - the launcher exits
//! right after, so nothing waits on the child.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HyperlaunchError, Result};
use crate::results::ResultType;
use crate::traits::LaunchExecutor;

#[derive(Debug, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LaunchExecutor for SystemLauncher {
    async fn launch(&self, path: &str, result_type: ResultType) -> Result<()> {
        debug!(path = %path, ?result_type, "executing launch");
        match result_type {
            ResultType::App => {
                Command::new("sh")
                    .arg("-c")
                    .arg(path)
                    .spawn()
                    .map_err(|e| HyperlaunchError::Launch {
                        path: path.to_string(),
                        message: e.to_string(),
                    })?;
            }
            ResultType::File | ResultType::Directory | ResultType::Content => {
                open::that_detached(path).map_err(|e| HyperlaunchError::Launch {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}
