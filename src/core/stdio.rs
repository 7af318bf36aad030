/// STDIO Transport
///
/// Line-delimited JSON-RPC over standard input/output, for MCP clients that
/// spawn the gateway as a subprocess. Responses go to stdout one per line;
/// all logging goes to stderr so it never interleaves with protocol output.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

use crate::core::dispatcher::Dispatcher;
use crate::core::protocol::{PARSE_ERROR, RpcResponse};

/// Handle one input line. Returns the serialized response, or `None` when
/// nothing should be written (blank lines and notifications).
pub async fn process_line(dispatcher: &Dispatcher, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Value>(line) {
        Ok(value) => {
            let is_notification = value
                .get("method")
                .and_then(Value::as_str)
                .is_some_and(|m| m.starts_with("notifications/"));
            if is_notification {
                tracing::debug!(?value, "ignoring notification");
                return None;
            }
            match dispatcher.handle_value(value).await {
                Ok(response) => response,
                Err(e) => RpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}")),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "unparseable stdio line");
            RpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}"))
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            None
        }
    }
}

/// Serve JSON-RPC over stdin/stdout until stdin closes.
pub async fn run_server_stdio(dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    tracing::info!("MCP Gateway serving JSON-RPC on stdio");

    let mut lines = BufReader::with_capacity(8192, tokio::io::stdin()).lines();
    let mut stdout = BufWriter::with_capacity(8192, tokio::io::stdout());

    while let Some(line) = lines.next_line().await? {
        let Some(response) = process_line(&dispatcher, &line).await else {
            continue;
        };
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        // Flush per response so the client is never left waiting on the buffer.
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, stdio transport stopping");
    Ok(())
}
