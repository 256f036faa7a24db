use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::server::McpServer;

/// Newline-delimited JSON-RPC over stdin/stdout.
pub async fn run(server: McpServer) -> Result<()> {
    tracing::info!("stdio transport ready");
    serve_lines(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    tracing::info!("stdin closed, exiting");
    Ok(())
}

/// Each message is handled on its own task; responses are written by a single
/// writer so lines never interleave. Returns the writer once input is exhausted.
async fn serve_lines<R, W>(server: McpServer, reader: R, mut output: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(64);

    let writer = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            output.write_all(response.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<_, std::io::Error>(output)
    });

    let mut lines = reader.lines();
    let mut handlers = Vec::new();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        handlers.push(tokio::spawn(async move {
            if let Some(response) = server.handle_request(&line).await {
                if tx.send(response).await.is_err() {
                    tracing::debug!("output closed before response was written");
                }
            }
        }));
    }

    drop(tx);
    for handler in handlers {
        if let Err(e) = handler.await {
            tracing::error!(error = %e, "request task failed");
        }
    }

    writer
        .await
        .context("output writer task panicked")?
        .context("failed to write output")
}
