//! Multiple-Choice Question Parsing
//!
//! The model is asked to answer in a small line-based format:
//!
//! ```text
//! Q: <question>
//! A) <option>
//! B) <option>
//! C) <option>
//! D) <option>
//! Correct: <letter>
//! ```
//!
//! Nothing guarantees the model respects it, so parsing never fails. Whatever
//! comes back is turned into a structurally valid [`Mcq`] with exactly four
//! options, even when the content is wrong.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fills option slots the model did not produce.
pub const PLACEHOLDER_OPTION: &str = "X) (invalid AI option)";

/// Used when the model gives no usable answer letter.
pub const DEFAULT_CORRECT_OPTION: char = 'A';

const OPTION_LABELS: [&str; 4] = ["A)", "B)", "C)", "D)"];

/// A single multiple-choice question with four labelled options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    /// Option lines as received, label included (`"B) 4"`).
    pub options: [String; 4],
    pub correct_option: char,
}

impl Mcq {
    /// Parses raw model output. See the module docs for the expected format.
    pub fn parse(raw: &str) -> Self {
        let mut parser = Parser::default();
        for line in raw.lines() {
            if !parser.feed(line.trim()) {
                break;
            }
        }
        let mcq = parser.finish();
        debug!(
            question = %mcq.question,
            correct = %mcq.correct_option,
            "Parsed MCQ from model output"
        );
        mcq
    }

    /// Compares a user's letter against the correct one, ignoring case.
    pub fn is_correct(&self, answer: char) -> bool {
        answer.to_ascii_uppercase() == self.correct_option
    }

    /// Whether the option at `index` was padded in rather than produced by the model.
    pub fn is_placeholder(&self, index: usize) -> bool {
        self.options
            .get(index)
            .is_some_and(|option| option == PLACEHOLDER_OPTION)
    }
}

/// Phases of the single forward pass over the model's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParseState {
    #[default]
    SeekingQuestion,
    CollectingOptions,
    SeekingCorrect,
    Done,
}

#[derive(Debug, Default)]
struct Parser {
    state: ParseState,
    question: String,
    options: Vec<String>,
    correct: Option<char>,
}

impl Parser {
    /// Consumes one trimmed line. Returns `false` once nothing more is needed.
    fn feed(&mut self, line: &str) -> bool {
        self.state = match self.state {
            ParseState::SeekingQuestion => match line.strip_prefix("Q:") {
                Some(rest) => {
                    self.question = rest.trim().to_string();
                    ParseState::CollectingOptions
                }
                None => ParseState::SeekingQuestion,
            },
            ParseState::CollectingOptions => {
                if OPTION_LABELS.iter().any(|label| line.starts_with(label)) {
                    self.options.push(line.to_string());
                }
                if self.options.len() == OPTION_LABELS.len() {
                    ParseState::SeekingCorrect
                } else {
                    ParseState::CollectingOptions
                }
            }
            ParseState::SeekingCorrect => {
                if line.starts_with("Correct") {
                    self.correct = line
                        .chars()
                        .last()
                        .filter(char::is_ascii_alphabetic)
                        .map(|c| c.to_ascii_uppercase());
                    ParseState::Done
                } else {
                    ParseState::SeekingCorrect
                }
            }
            ParseState::Done => ParseState::Done,
        };
        self.state != ParseState::Done
    }

    fn finish(self) -> Mcq {
        let mut options = self.options.into_iter();
        let options = std::array::from_fn(|_| {
            options
                .next()
                .unwrap_or_else(|| PLACEHOLDER_OPTION.to_string())
        });
        Mcq {
            question: self.question,
            options,
            correct_option: self.correct.unwrap_or(DEFAULT_CORRECT_OPTION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_mcq() {
        let mcq = Mcq::parse("Q: What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect: B");

        assert_eq!(mcq.question, "What is 2+2?");
        assert_eq!(mcq.options, ["A) 3", "B) 4", "C) 5", "D) 6"]);
        assert_eq!(mcq.correct_option, 'B');
        assert!(mcq.is_correct('b'));
        assert!(!mcq.is_correct('A'));
    }

    #[test]
    fn test_parse_truncated_output_pads_options() {
        let mcq = Mcq::parse("Q: x\nA) y");

        assert_eq!(mcq.question, "x");
        assert_eq!(mcq.options[0], "A) y");
        for i in 1..4 {
            assert_eq!(mcq.options[i], PLACEHOLDER_OPTION);
            assert!(mcq.is_placeholder(i));
        }
        assert!(!mcq.is_placeholder(0));
        assert!(!mcq.is_placeholder(4));
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_missing_correct_line_defaults_to_a() {
        let mcq = Mcq::parse("Q: Capital of France?\nA) Lyon\nB) Paris\nC) Nice\nD) Lille\n");
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_non_alphabetic_correct_marker_defaults_to_a() {
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect: 2");
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_lowercase_correct_letter_is_uppercased() {
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect: d");
        assert_eq!(mcq.correct_option, 'D');
    }

    #[test]
    fn test_takes_last_character_of_correct_line() {
        // "Correct: B)" ends in ')' which is not a letter.
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect: B)");
        assert_eq!(mcq.correct_option, 'A');

        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect answer is C");
        assert_eq!(mcq.correct_option, 'C');
    }

    #[test]
    fn test_whitespace_and_crlf_are_trimmed() {
        let raw = "  Here you go:\r\n   Q:   Speed of light?  \r\n\tA) c\r\n B) 2c\r\nC) c/2\r\nD) 0\r\nCorrect: A\r\n";
        let mcq = Mcq::parse(raw);

        assert_eq!(mcq.question, "Speed of light?");
        assert_eq!(mcq.options, ["A) c", "B) 2c", "C) c/2", "D) 0"]);
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_options_kept_in_encounter_order() {
        let mcq = Mcq::parse("Q: q\nC) third\nA) first\nD) fourth\nB) second\nCorrect: C");
        assert_eq!(mcq.options, ["C) third", "A) first", "D) fourth", "B) second"]);
        assert_eq!(mcq.correct_option, 'C');
    }

    #[test]
    fn test_no_question_line_yields_empty_structure() {
        let mcq = Mcq::parse("A) a\nB) b\nC) c\nD) d\nCorrect: C");

        assert_eq!(mcq.question, "");
        assert!(mcq.options.iter().all(|o| o == PLACEHOLDER_OPTION));
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_options_before_question_are_ignored() {
        let mcq = Mcq::parse("A) early\nQ: q\nB) b\nCorrect: B");

        assert_eq!(mcq.options[0], "B) b");
        assert!(mcq.is_placeholder(1));
        // The Correct line is consumed while still collecting options.
        assert_eq!(mcq.correct_option, 'A');
    }

    #[test]
    fn test_extra_options_after_four_are_not_collected() {
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nA) again\nCorrect: D");
        assert_eq!(mcq.options, ["A) a", "B) b", "C) c", "D) d"]);
        assert_eq!(mcq.correct_option, 'D');
    }

    #[test]
    fn test_only_first_correct_line_counts() {
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect: B\nCorrect: C");
        assert_eq!(mcq.correct_option, 'B');
    }

    #[test]
    fn test_empty_input() {
        let mcq = Mcq::parse("");
        assert_eq!(mcq.question, "");
        assert_eq!(mcq.options.len(), 4);
        assert_eq!(mcq.correct_option, DEFAULT_CORRECT_OPTION);
    }

    #[test]
    fn test_short_option_list_always_answers_a() {
        // With fewer than four options the Correct line is swallowed while
        // collecting, so 'A' wins regardless of what the model meant.
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nCorrect: D");
        assert!(mcq.is_placeholder(3));
        assert_eq!(mcq.correct_option, 'A');
        assert!(mcq.is_correct('a'));
    }

    #[test]
    fn test_mcq_serializes_for_hosts() {
        let mcq = Mcq::parse("Q: q\nA) a\nB) b\nC) c\nD) d\nCorrect: C");
        let json = serde_json::to_value(&mcq).unwrap();

        assert_eq!(json["question"], "q");
        assert_eq!(json["options"][2], "C) c");
        assert_eq!(json["correct_option"], "C");
    }
}
