use crate::shell::playground::{stream, PlaygroundRequest};
use anyhow::Result;
use tokio::io::{self, AsyncWriteExt};

/// Execute the playground action, streaming the reply to stdout.
/// # Errors
/// Returns an error if stdout fails.
pub async fn execute(request: &PlaygroundRequest) -> Result<()> {
    let mut stdout = io::stdout();
    let mut chunks = stream(request);

    while let Some(chunk) = chunks.recv().await {
        stdout.write_all(chunk.as_bytes()).await?;
        stdout.flush().await?;
    }
    stdout.write_all(b"\n").await?;

    Ok(())
}
