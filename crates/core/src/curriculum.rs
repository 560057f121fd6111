//! Curriculum Generation
//!
//! Turns a topic into a list of subtopics. The model is asked for five bullet
//! points; what comes back is split here into clean subtopic names so the
//! caller can populate a [`Topic`].

use crate::{
    llm_client::{ModelClient, ModelError},
    prompts,
    topic::Topic,
};
use tracing::{info, warn};

/// Below this many usable entries the model output is replaced by a fallback list.
const MIN_SUBTOPICS: usize = 3;

/// Splits a raw bullet list into subtopic names.
///
/// Accepts `•`, `-`, `*` and `1.` style markers, or none at all. Empty lines
/// and repeated names are dropped. When fewer than three names survive, a
/// generic outline for `topic` is returned instead.
pub fn split_subtopic_list(raw: &str, topic: &str) -> Vec<String> {
    let mut subtopics: Vec<String> = Vec::new();
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let name = strip_marker(line);
        if !name.is_empty() && !subtopics.iter().any(|s| s == name) {
            subtopics.push(name.to_string());
        }
    }

    if subtopics.len() < MIN_SUBTOPICS {
        warn!(
            count = subtopics.len(),
            topic, "Too few subtopics in model output, using fallback outline"
        );
        return fallback_subtopics(topic);
    }
    subtopics
}

fn strip_marker(line: &str) -> &str {
    for bullet in ['•', '-', '*'] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim();
        }
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix('.') {
            return rest.trim();
        }
    }
    line
}

fn fallback_subtopics(topic: &str) -> Vec<String> {
    vec![
        format!("Introduction to {topic}"),
        format!("Core Concepts in {topic}"),
        format!("Advanced {topic} Topics"),
        "Practical Applications".to_string(),
        format!("{topic} Summary and Review"),
    ]
}

/// Asks the model for subtopics of `topic` and records them on it.
///
/// The raw reply replaces the stored list text via [`Topic::set_subtopic_list`],
/// but every split name is appended with [`Topic::add_subtopic`]. Existing
/// subtopics are kept, so calling this twice on one topic lists names twice;
/// pass a fresh [`Topic`] to get a clean list.
pub async fn populate_subtopics(model: &dyn ModelClient, topic: &mut Topic) -> Result<(), ModelError> {
    let raw = model.ask(&prompts::generate_subtopics(topic.name())).await?;
    let names = split_subtopic_list(&raw, topic.name());
    info!(topic = %topic.name(), count = names.len(), "Subtopics generated");

    topic.set_subtopic_list(raw);
    for name in names {
        topic.add_subtopic(name);
    }
    Ok(())
}
