//! Interactive study console.
//!
//! Drives the whole learning flow for a person at a terminal: pick a topic,
//! pick one of the generated subtopics, then ask questions, take notes and
//! answer multiple-choice exercises until the session is ended.

use crate::protocol::read_raw_line;
use anyhow::Result;
use std::sync::Arc;
use study_core::{ModelClient, Session, Topic, curriculum};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

const MENU: &str = "\n1) Ask a question\n2) Add a note\n3) Take an MCQ exercise\n4) Show progress\n5) Show notes\n6) End session\n";

pub struct StudyConsole<R, W> {
    model: Arc<dyn ModelClient>,
    input: R,
    output: W,
}

impl<R, W> StudyConsole<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(model: Arc<dyn ModelClient>, reader: R, writer: W) -> Self {
        Self {
            model,
            input: reader,
            output: writer,
        }
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter a topic to study: ").await? else {
            return Ok(());
        };
        if name.is_empty() {
            return Ok(());
        }

        let mut topic = Topic::new(name);
        self.say("Generating subtopics...").await?;
        if let Err(e) = curriculum::populate_subtopics(self.model.as_ref(), &mut topic).await {
            error!(error = %e, "Could not generate subtopics");
            self.say(&format!("Could not generate subtopics: {e}")).await?;
            return Ok(());
        }

        loop {
            let mut listing = format!("\nSubtopics of {}:", topic.name());
            for (i, subtopic) in topic.subtopics().iter().enumerate() {
                listing.push_str(&format!("\n  {}. {}", i + 1, subtopic));
            }
            self.say(&listing).await?;

            let Some(choice) = self
                .prompt("Choose a subtopic by number or name (empty to quit): ")
                .await?
            else {
                break;
            };
            if choice.is_empty() {
                break;
            }

            let name = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| topic.subtopics().get(i))
                .cloned()
                .unwrap_or(choice);
            if !topic.select_subtopic(&name) {
                self.say(&format!("'{name}' is not one of the subtopics.")).await?;
                continue;
            }

            if !self.study(&topic).await? {
                return Ok(());
            }
        }

        self.say("Goodbye!").await?;
        Ok(())
    }

    /// Runs one session on the topic's selected subtopic.
    ///
    /// Returns `false` when input ended during the session.
    async fn study(&mut self, topic: &Topic) -> Result<bool> {
        let mut session = Session::new(topic, Arc::clone(&self.model));
        session.start();
        self.say(&format!("\nStudying: {}", session.current_subtopic()))
            .await?;

        let input_open = loop {
            self.say(MENU).await?;
            let Some(choice) = self.prompt("Choose an option: ").await? else {
                break false;
            };

            match choice.as_str() {
                "1" => {
                    let Some(question) = self.prompt("Your question: ").await? else {
                        break false;
                    };
                    match session.ask_question(&question).await {
                        Ok(answer) => self.say(&format!("\n{answer}")).await?,
                        Err(e) => self.say(&format!("Could not get an answer: {e}")).await?,
                    }
                }
                "2" => {
                    let Some(note) = self.prompt("Your note: ").await? else {
                        break false;
                    };
                    session.add_note(note);
                    self.say("Note saved.").await?;
                }
                "3" => {
                    let mcq = match session.generate_mcq_exercise().await {
                        Ok(mcq) => mcq,
                        Err(e) => {
                            self.say(&format!("Could not generate a question: {e}"))
                                .await?;
                            continue;
                        }
                    };
                    let mut text = format!("\nQ: {}", mcq.question);
                    for option in &mcq.options {
                        text.push_str(&format!("\n{option}"));
                    }
                    self.say(&text).await?;

                    let Some(answer) = self.prompt("Your answer (A-D): ").await? else {
                        break false;
                    };
                    let Some(letter) = answer.chars().next() else {
                        self.say("No answer given, skipping.").await?;
                        continue;
                    };
                    let entry = session.submit_exercise_answer(&mcq, letter);
                    let verdict = if entry.score == 1 {
                        "Correct! +10 points".to_string()
                    } else {
                        format!("Wrong. The correct answer was {}.", entry.correct_answer)
                    };
                    self.say(&verdict).await?;
                }
                "4" => {
                    let report = session.progress().to_string();
                    self.say(&report).await?;
                }
                "5" => {
                    let notes = session.notes().to_string();
                    self.say(&notes).await?;
                }
                "6" => break true,
                other => self.say(&format!("Unknown option '{other}'.")).await?,
            }
        };

        session.end();
        let summary = format!(
            "\nSession lasted {} seconds.\n{}",
            session.duration_seconds().unwrap_or(0),
            session.progress()
        );
        self.say(&summary).await?;
        info!(subtopic = %session.current_subtopic(), "Study session closed");
        Ok(input_open)
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Shows `label` and reads one trimmed line, `None` once input is exhausted.
    ///
    /// Bytes that are not UTF-8 are replaced rather than ending the console.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;
        Ok(read_raw_line(&mut self.input)
            .await?
            .map(|raw| String::from_utf8_lossy(&raw).trim().to_string()))
    }
}
