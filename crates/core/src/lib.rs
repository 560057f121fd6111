//! Study Assistant Core
//!
//! The session and exercise engine behind the study assistant: topics and
//! their subtopics, the multiple-choice question pipeline that turns free-form
//! model output into a quiz, and the session state that tracks questions,
//! notes and exercise progress.

pub mod curriculum;
pub mod llm_client;
pub mod mcq;
pub mod prompts;
pub mod session;
pub mod topic;

pub use llm_client::{GeminiClient, ModelClient, ModelError};
pub use mcq::Mcq;
pub use session::Session;
pub use topic::Topic;
