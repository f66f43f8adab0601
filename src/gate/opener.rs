//! Where a revealed link ends up.

use crate::gateway::SignedDownloadLink;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::{io::Write, process::Stdio, sync::Mutex};
use tokio::process::Command;
use tracing::{debug, warn};
use url::Url;

/// Opens a signed link in a new browsing context. Takes the link by value so
/// it can only be used once. Implementations hand the link off and return;
/// they must not wait for the user to finish with it.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// # Errors
    /// Returns an error if the link could not be handed off.
    async fn open(&self, link: SignedDownloadLink) -> Result<()>;
}

/// Prints the link so the user can follow it.
#[derive(Debug, Default)]
pub struct ConsoleOpener;

#[async_trait]
impl LinkOpener for ConsoleOpener {
    async fn open(&self, link: SignedDownloadLink) -> Result<()> {
        let expires_at = link.expires_at();
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Resume: {}", link.into_url())?;
        writeln!(stdout, "Link expires at {}", expires_at.to_rfc3339())?;
        Ok(())
    }
}

/// Hands the link to an external program such as `xdg-open`.
///
/// The program is spawned and left running; its exit status is only logged.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the URL.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl LinkOpener for CommandOpener {
    async fn open(&self, link: SignedDownloadLink) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(link.into_url().as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {}", self.program))?;

        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("{program} exited"),
                Ok(status) => warn!("{program} exited with {status}"),
                Err(err) => warn!("failed to wait for {program}: {err}"),
            }
        });

        Ok(())
    }
}

/// Keeps opened URLs in memory; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl RecordingOpener {
    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        self.opened
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, link: SignedDownloadLink) -> Result<()> {
        self.opened
            .lock()
            .map_err(|_| anyhow!("opener lock poisoned"))?
            .push(link.into_url());
        Ok(())
    }
}
