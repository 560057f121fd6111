//! The command bridge: reads one JSON request per line, answers with one JSON
//! response per line, strictly in order.

use crate::protocol::{
    EXIT_TOKEN, Payload, Request, RequestError, Response, parse_request, read_raw_line,
};
use anyhow::Result;
use std::sync::Arc;
use study_core::{ModelClient, ModelError, prompts};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument, warn};

pub struct Bridge {
    model: Arc<dyn ModelClient>,
}

impl Bridge {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Runs the read/dispatch/write loop until `EXIT` or end of input.
    ///
    /// Announces readiness before reading anything. Empty lines are skipped
    /// and only a line exactly equal to `EXIT` stops the loop. Request
    /// failures, including lines that are not UTF-8, become error responses;
    /// only I/O failures on the channel itself end the loop with an error.
    pub async fn run<R, W>(&self, mut reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        send_msg(writer, &Response::Ready).await?;
        info!("Bridge ready, awaiting commands");

        while let Some(raw) = read_raw_line(&mut reader).await? {
            if raw.is_empty() {
                continue;
            }
            let response = match String::from_utf8(raw) {
                Ok(line) if line == EXIT_TOKEN => {
                    info!("Received EXIT, shutting down bridge");
                    return Ok(());
                }
                Ok(line) => self.handle_line(&line).await,
                Err(_) => {
                    warn!("Rejected request line that is not valid UTF-8");
                    Response::error(RequestError::NotUtf8.to_string())
                }
            };
            send_msg(writer, &response).await?;
        }

        info!("Input closed, shutting down bridge");
        Ok(())
    }

    /// Turns a single request line into its response.
    pub async fn handle_line(&self, line: &str) -> Response {
        let request = match parse_request(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected request line");
                return Response::error(e.to_string());
            }
        };

        match self.dispatch(request).await {
            Ok(payload) => Response::Success(payload),
            Err(e) => {
                error!(error = %e, "Model call failed");
                Response::error(e.to_string())
            }
        }
    }

    #[instrument(name = "bridge_request", skip_all, fields(action = request.action()))]
    async fn dispatch(&self, request: Request) -> Result<Payload, ModelError> {
        match request {
            Request::GenerateSubtopics { topic } => {
                let raw = self.model.ask(&prompts::generate_subtopics(&topic)).await?;
                debug!(raw = %raw, "Raw subtopics from model");
                Ok(Payload::Subtopics(raw))
            }
            Request::AskQuestion { question, subtopic } => {
                let raw = self
                    .model
                    .ask(&prompts::ask_question(&subtopic, &question))
                    .await?;
                Ok(Payload::Answer(raw))
            }
            Request::GenerateMcq { subtopic } => {
                let raw = self.model.ask(&prompts::generate_mcq(&subtopic)).await?;
                debug!(raw = %raw, "Raw MCQ from model");
                Ok(Payload::Mcq(raw))
            }
        }
    }
}

/// Serializes a `Response` and writes it as one flushed line.
pub(crate) async fn send_msg<W>(writer: &mut W, msg: &Response) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut serialized = serde_json::to_string(msg)?;
    serialized.push('\n');
    writer.write_all(serialized.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
