//! Study Session State
//!
//! A [`Session`] is one bounded stretch of study against the subtopic that
//! was selected on its [`Topic`] when the session started. It records the
//! questions put to the model, the user's notes and every exercise answer,
//! and keeps a running progress score.

use crate::{
    llm_client::{ModelClient, ModelError},
    mcq::Mcq,
    prompts,
    topic::Topic,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tracing::{info, instrument};

/// Points added for a correct exercise answer.
pub const CORRECT_POINTS: u32 = 10;
/// Points removed for a wrong exercise answer. The score never drops below zero.
pub const WRONG_PENALTY: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    Started,
    Ended,
}

/// The record of one submitted exercise answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseEntry {
    pub question: String,
    pub correct_answer: char,
    pub user_answer: char,
    /// 1 for a correct answer, 0 otherwise.
    pub score: u8,
}

/// A study session bound to a topic it does not own.
pub struct Session<'a> {
    topic: &'a Topic,
    model: Arc<dyn ModelClient>,
    state: SessionState,
    current_subtopic: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    questions_asked: Vec<String>,
    ai_answers: Vec<String>,
    user_notes: Vec<String>,
    exercises: Vec<ExerciseEntry>,
    progress_score: u32,
}

impl<'a> Session<'a> {
    pub fn new(topic: &'a Topic, model: Arc<dyn ModelClient>) -> Self {
        Self {
            topic,
            model,
            state: SessionState::Created,
            current_subtopic: String::new(),
            start_time: None,
            end_time: None,
            questions_asked: Vec::new(),
            ai_answers: Vec::new(),
            user_notes: Vec::new(),
            exercises: Vec::new(),
            progress_score: 0,
        }
    }

    /// Starts the clock and snapshots the topic's current subtopic.
    ///
    /// Calling it again restarts the clock but keeps everything recorded so far.
    pub fn start(&mut self) {
        self.current_subtopic = self.topic.current_subtopic().to_string();
        self.start_time = Some(Utc::now());
        self.state = SessionState::Started;
        info!(topic = %self.topic.name(), subtopic = %self.current_subtopic, "Session started");
    }

    pub fn end(&mut self) {
        self.end_time = Some(Utc::now());
        self.state = SessionState::Ended;
        info!(
            duration_secs = self.duration_seconds(),
            score = self.progress_score,
            "Session ended"
        );
    }

    /// Whole seconds between start and end, once both have happened.
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }

    pub fn add_question(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.questions_asked.push(question.into());
        self.ai_answers.push(answer.into());
    }

    /// Asks the model a question about the session's subtopic and records the exchange.
    #[instrument(skip(self), fields(subtopic = %self.current_subtopic))]
    pub async fn ask_question(&mut self, question: &str) -> Result<String, ModelError> {
        let prompt = prompts::ask_question(&self.current_subtopic, question);
        let answer = self.model.ask(&prompt).await?;
        self.add_question(question, answer.clone());
        Ok(answer)
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.user_notes.push(note.into());
    }

    /// Asks the model for a question on the session's subtopic and parses it.
    ///
    /// Model failures are returned as-is. A reply in the wrong format is not
    /// an error; it yields a best-effort [`Mcq`].
    #[instrument(skip(self), fields(subtopic = %self.current_subtopic))]
    pub async fn generate_mcq_exercise(&self) -> Result<Mcq, ModelError> {
        let raw = self
            .model
            .ask(&prompts::generate_mcq(&self.current_subtopic))
            .await?;
        Ok(Mcq::parse(&raw))
    }

    pub fn check_user_answer(&self, mcq: &Mcq, answer: char) -> bool {
        mcq.is_correct(answer)
    }

    /// Records an answer to `mcq` and adjusts the progress score.
    ///
    /// Every call counts as a fresh attempt, including repeats for the same question.
    pub fn submit_exercise_answer(&mut self, mcq: &Mcq, answer: char) -> &ExerciseEntry {
        let correct = self.check_user_answer(mcq, answer);
        self.progress_score = if correct {
            self.progress_score.saturating_add(CORRECT_POINTS)
        } else {
            self.progress_score.saturating_sub(WRONG_PENALTY)
        };
        info!(correct, score = self.progress_score, "Exercise answer submitted");

        self.exercises.push(ExerciseEntry {
            question: mcq.question.clone(),
            correct_answer: mcq.correct_option,
            user_answer: answer.to_ascii_uppercase(),
            score: u8::from(correct),
        });
        &self.exercises[self.exercises.len() - 1]
    }

    pub fn topic(&self) -> &Topic {
        self.topic
    }

    pub fn current_subtopic(&self) -> &str {
        &self.current_subtopic
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress_score(&self) -> u32 {
        self.progress_score
    }

    pub fn questions(&self) -> &[String] {
        &self.questions_asked
    }

    pub fn answers(&self) -> &[String] {
        &self.ai_answers
    }

    pub fn notes(&self) -> NotesView<'_> {
        NotesView {
            notes: &self.user_notes,
        }
    }

    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    /// Summarises the session so far. Elapsed time runs to the end of the
    /// session, or to now while it is still open.
    pub fn progress(&self) -> ProgressReport {
        let elapsed_seconds = self
            .start_time
            .map(|start| (self.end_time.unwrap_or_else(Utc::now) - start).num_seconds())
            .unwrap_or(0);
        let correct_answers = self.exercises.iter().filter(|e| e.score == 1).count();

        ProgressReport {
            topic: self.topic.name().to_string(),
            subtopic: self.current_subtopic.clone(),
            elapsed_seconds,
            questions_asked: self.questions_asked.len(),
            notes_written: self.user_notes.len(),
            exercises_taken: self.exercises.len(),
            correct_answers,
            wrong_answers: self.exercises.len() - correct_answers,
            progress_score: self.progress_score,
        }
    }
}

/// A read-only snapshot of session progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub topic: String,
    pub subtopic: String,
    pub elapsed_seconds: i64,
    pub questions_asked: usize,
    pub notes_written: usize,
    pub exercises_taken: usize,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    pub progress_score: u32,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- SESSION PROGRESS -----")?;
        writeln!(f, "Topic       : {}", self.topic)?;
        writeln!(f, "Subtopic    : {}", self.subtopic)?;
        writeln!(f, "Time spent  : {} seconds", self.elapsed_seconds)?;
        writeln!(f)?;
        writeln!(f, "Questions asked : {}", self.questions_asked)?;
        writeln!(f, "Notes written   : {}", self.notes_written)?;
        writeln!(f, "Exercises taken : {}", self.exercises_taken)?;
        writeln!(f, "Correct answers : {}", self.correct_answers)?;
        writeln!(f, "Wrong answers   : {}", self.wrong_answers)?;
        writeln!(f)?;
        writeln!(f, "Progress Score  : {}", self.progress_score)?;
        write!(f, "------------------------------")
    }
}

/// The user's notes, numbered from 1 when displayed.
#[derive(Debug, Clone, Copy)]
pub struct NotesView<'s> {
    notes: &'s [String],
}

impl NotesView<'_> {
    pub fn as_slice(&self) -> &[String] {
        self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl fmt::Display for NotesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.notes.is_empty() {
            return write!(f, "No notes added yet.");
        }
        write!(f, "------ YOUR NOTES ------")?;
        for (i, note) in self.notes.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, note)?;
        }
        Ok(())
    }
}
