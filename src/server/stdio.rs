//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! Each input line is one message; each reply is written as one line.
//! Logging must go to stderr while this transport is active.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use super::protocol::ToolServer;
use crate::Result;

/// Serve on the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: &ToolServer) -> Result<()> {
    info!("serving on stdio");
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(server, stdin, stdout).await
}

/// Serve messages read line by line from `reader`, writing replies to `writer`.
pub async fn serve_lines<R, W>(server: &ToolServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = server.handle_message(&line).await {
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }
    Ok(())
}
