//! Request loop: one JSON request per input line, one JSON response per output line.
//!
//! Requests are handled strictly in input order. Each one runs on Tokio's
//! blocking pool because PBKDF2 is CPU bound. A bad request never stops the
//! loop; only I/O errors on the streams (including input that is not UTF-8)
//! do.

use anyhow::{Context, Result};
use common::protocol::{Request, Response};
use common::ToolError;
use strcrypt::Envelope;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Counts reported once the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Non-blank lines read.
    pub processed: usize,
    /// Lines answered with an error response.
    pub failed: usize,
}

/// Read requests from `reader` until EOF, writing a response for each to `writer`.
///
/// # Errors
///
/// Returns an error if reading the input or writing a response fails.
pub async fn run<R, W>(reader: R, mut writer: W, cfg: &Config) -> Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = Summary::default();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read request")?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(line, cfg.default_iterations).await;

        summary.processed += 1;
        if let Response::Error(ref err) = response {
            summary.failed += 1;
            warn!(line = line_no, code = %err.code, message = %err.message, "request failed");
        } else {
            debug!(line = line_no, "request succeeded");
        }

        let mut out = serde_json::to_vec(&response).context("failed to serialise response")?;
        out.push(b'\n');
        writer
            .write_all(&out)
            .await
            .context("failed to write response")?;
    }

    writer.flush().await.context("failed to flush responses")?;
    info!(
        processed = summary.processed,
        failed = summary.failed,
        "input exhausted"
    );
    Ok(summary)
}

async fn handle_line(line: String, default_iterations: u32) -> Response {
    let request: Request = match serde_json::from_str(&line) {
        Ok(request) => request,
        Err(e) => return ToolError::from(e).into(),
    };
    let op = request.op();

    match tokio::task::spawn_blocking(move || handle(request, default_iterations)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => e.into(),
        Err(e) => {
            warn!(op, error = %e, "request worker failed");
            ToolError::Internal(format!("{op} worker failed")).into()
        }
    }
}

/// Execute one request against the codec.
fn handle(request: Request, default_iterations: u32) -> Result<Response, ToolError> {
    match request {
        Request::Encrypt {
            plaintext,
            password,
            iterations,
        } => {
            let envelope = strcrypt::encrypt(
                &plaintext,
                &password,
                iterations.unwrap_or(default_iterations),
            )?;
            Ok(Response::Encrypted { envelope })
        }
        Request::Decrypt { envelope, password } => {
            let plaintext = strcrypt::decrypt(&envelope, &password)?;
            Ok(Response::Decrypted { plaintext })
        }
        Request::Inspect { envelope } => {
            let envelope = Envelope::parse(&envelope)?;
            Ok(Response::inspected(&envelope))
        }
    }
}
