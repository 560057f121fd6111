//! Fixed prompt templates sent to the model.

/// Asks for exactly five bullet-formatted subtopics of `topic`.
pub fn generate_subtopics(topic: &str) -> String {
    format!(
        "List exactly 5 subtopics in {topic}. Format each line as: • Subtopic Name\n\
         Example format:\n\
         • First Subtopic\n\
         • Second Subtopic\n\
         Do not add any extra text, explanations, or numbering. Only bullet points."
    )
}

/// Asks a free-text question scoped to `subtopic`.
pub fn ask_question(subtopic: &str, question: &str) -> String {
    format!("Answer this question about {subtopic}: {question}")
}

/// Asks for one multiple-choice question in the format the MCQ parser reads.
pub fn generate_mcq(subtopic: &str) -> String {
    format!(
        "Generate ONE multiple-choice question (MCQ) for the topic '{subtopic}' with exactly:\n\
         - 1 correct answer\n\
         - 3 incorrect answers\n\
         Format strictly as:\n\
         Q: <question text>\n\
         A) <option>\n\
         B) <option>\n\
         C) <option>\n\
         D) <option>\n\
         Correct: <A/B/C/D>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcq_prompt_names_subtopic_and_format() {
        let prompt = generate_mcq("Optics");
        assert!(prompt.starts_with("Generate ONE multiple-choice question (MCQ) for the topic 'Optics'"));
        assert!(prompt.contains("\nQ: <question text>\nA) <option>\n"));
        assert!(prompt.ends_with("Correct: <A/B/C/D>\n"));
    }

    #[test]
    fn test_subtopics_prompt_requests_five_bullets() {
        let prompt = generate_subtopics("Physics");
        assert!(prompt.starts_with("List exactly 5 subtopics in Physics."));
        assert!(prompt.contains("\n• First Subtopic\n• Second Subtopic\n"));
    }

    #[test]
    fn test_ask_question_prompt() {
        assert_eq!(
            ask_question("Optics", "What is refraction?"),
            "Answer this question about Optics: What is refraction?"
        );
    }
}
