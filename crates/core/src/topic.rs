use serde::{Deserialize, Serialize};

/// A subject of study together with its subtopics.
///
/// The subtopic list is filled in by the caller once it has split the raw
/// model output; the raw text itself is kept verbatim alongside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    name: String,
    subtopics: Vec<String>,
    subtopic_list_raw: String,
    current_subtopic: String,
}

impl Topic {
    /// Creates a topic with no subtopics and nothing selected.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Stores the raw model text that listed the subtopics.
    pub fn set_subtopic_list(&mut self, text: impl Into<String>) {
        self.subtopic_list_raw = text.into();
    }

    pub fn subtopic_list(&self) -> &str {
        &self.subtopic_list_raw
    }

    /// Appends a subtopic. Duplicates are kept.
    pub fn add_subtopic(&mut self, subtopic: impl Into<String>) {
        self.subtopics.push(subtopic.into());
    }

    pub fn subtopics(&self) -> &[String] {
        &self.subtopics
    }

    /// Selects `subtopic` for study if it is one of the listed subtopics.
    ///
    /// The match is exact and case-sensitive. On a miss the previous
    /// selection is left untouched and `false` is returned.
    pub fn select_subtopic(&mut self, subtopic: &str) -> bool {
        if self.subtopics.iter().any(|s| s == subtopic) {
            self.current_subtopic = subtopic.to_string();
            true
        } else {
            false
        }
    }

    /// The selected subtopic, empty until one has been selected.
    pub fn current_subtopic(&self) -> &str {
        &self.current_subtopic
    }
}
