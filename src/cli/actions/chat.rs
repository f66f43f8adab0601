use crate::shell::chat::Responder;
use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Execute the chat action until end of input.
/// # Errors
/// Returns an error if stdin or stdout fail.
pub async fn execute() -> Result<()> {
    let responder = Responder::default();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        stdout
            .write_all(format!("{}\n", responder.reply(&line)).as_bytes())
            .await?;
    }

    Ok(())
}
