//! Defines the line protocol between the host process and the bridge.
//!
//! Every request and every response is a single JSON object on its own line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Terminates the bridge when received as a whole line.
pub const EXIT_TOKEN: &str = "EXIT";

/// Requests sent from the host to the bridge.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    /// Asks for five bullet-formatted subtopics of `topic`.
    GenerateSubtopics { topic: String },
    /// A free-text question about a subtopic.
    AskQuestion { question: String, subtopic: String },
    /// Asks for one multiple-choice question on a subtopic.
    GenerateMcq { subtopic: String },
}

impl Request {
    pub const ACTIONS: [&'static str; 3] = ["generate_subtopics", "ask_question", "generate_mcq"];

    pub fn action(&self) -> &'static str {
        match self {
            Request::GenerateSubtopics { .. } => Self::ACTIONS[0],
            Request::AskQuestion { .. } => Self::ACTIONS[1],
            Request::GenerateMcq { .. } => Self::ACTIONS[2],
        }
    }
}

/// Reasons a request line could not be turned into a [`Request`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Request line is not valid UTF-8")]
    NotUtf8,
    #[error("Invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("Missing or non-string field `action`")]
    MissingAction,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Invalid `{action}` request: {source}")]
    Invalid {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads one line as raw bytes with its `\n` or `\r\n` terminator removed.
///
/// Returns `None` at end of input. The bytes are left undecoded so a line
/// that is not UTF-8 can be answered without ending the stream.
pub async fn read_raw_line<R>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(buf))
}

/// Parses one request line.
///
/// The action is checked before the fields so that an unknown action is
/// reported as such rather than as a shape error.
pub fn parse_request(line: &str) -> Result<Request, RequestError> {
    let value: Value = serde_json::from_str(line).map_err(RequestError::Json)?;
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or(RequestError::MissingAction)?
        .to_string();
    if !Request::ACTIONS.contains(&action.as_str()) {
        return Err(RequestError::UnknownAction(action));
    }
    serde_json::from_value(value).map_err(|source| RequestError::Invalid { action, source })
}

/// Messages sent from the bridge to the host.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Emitted once at startup before any request is read.
    Ready,
    /// A successful request, carrying the raw model text.
    Success(Payload),
    /// A request that failed; the bridge keeps running.
    Error { message: String },
}

/// The field a successful response puts the model text under.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Subtopics(String),
    Answer(String),
    Mcq(String),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_each_action() {
        assert_eq!(
            parse_request(r#"{"action":"generate_subtopics","topic":"Physics"}"#).unwrap(),
            Request::GenerateSubtopics {
                topic: "Physics".to_string()
            }
        );
        assert_eq!(
            parse_request(r#"{"action":"ask_question","question":"Why?","subtopic":"Optics"}"#)
                .unwrap(),
            Request::AskQuestion {
                question: "Why?".to_string(),
                subtopic: "Optics".to_string()
            }
        );
        let mcq = parse_request(r#"{"action":"generate_mcq","subtopic":"Optics","extra":1}"#).unwrap();
        assert_eq!(mcq.action(), "generate_mcq");
    }

    #[test]
    fn test_parse_missing_field() {
        match parse_request(r#"{"action":"generate_mcq"}"#) {
            Err(RequestError::Invalid { action, source }) => {
                assert_eq!(action, "generate_mcq");
                assert!(source.to_string().contains("subtopic"));
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_action() {
        let err = parse_request(r#"{"action":"dance"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: dance");
    }

    #[test]
    fn test_parse_missing_action() {
        assert!(matches!(
            parse_request(r#"{"topic":"Physics"}"#),
            Err(RequestError::MissingAction)
        ));
        assert!(matches!(
            parse_request(r#"{"action":7}"#),
            Err(RequestError::MissingAction)
        ));
        assert!(matches!(
            parse_request("[1,2]"),
            Err(RequestError::MissingAction)
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_request("{not json"),
            Err(RequestError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_read_raw_line_strips_terminators() {
        let mut input: &[u8] = b"first\r\n\nsecond \xE9\nlast";
        assert_eq!(read_raw_line(&mut input).await.unwrap(), Some(b"first".to_vec()));
        assert_eq!(read_raw_line(&mut input).await.unwrap(), Some(Vec::new()));
        assert_eq!(
            read_raw_line(&mut input).await.unwrap(),
            Some(b"second \xE9".to_vec())
        );
        assert_eq!(read_raw_line(&mut input).await.unwrap(), Some(b"last".to_vec()));
        assert_eq!(read_raw_line(&mut input).await.unwrap(), None);
    }

    #[test]
    fn test_response_wire_format() {
        assert_eq!(
            serde_json::to_value(Response::Ready).unwrap(),
            json!({"status": "ready"})
        );
        assert_eq!(
            serde_json::to_value(Response::Success(Payload::Subtopics("• A".into()))).unwrap(),
            json!({"status": "success", "subtopics": "• A"})
        );
        assert_eq!(
            serde_json::to_value(Response::Success(Payload::Answer("42".into()))).unwrap(),
            json!({"status": "success", "answer": "42"})
        );
        assert_eq!(
            serde_json::to_value(Response::Success(Payload::Mcq("Q: x".into()))).unwrap(),
            json!({"status": "success", "mcq": "Q: x"})
        );
        assert_eq!(
            serde_json::to_value(Response::error("Unknown action: dance")).unwrap(),
            json!({"status": "error", "message": "Unknown action: dance"})
        );
    }

    #[test]
    fn test_ready_serializes_to_exact_line() {
        assert_eq!(
            serde_json::to_string(&Response::Ready).unwrap(),
            r#"{"status":"ready"}"#
        );
    }
}
