use serde::Serialize;

use super::Question;

/// One answered (or timed out) question, as shown in the result summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerAnswer {
    pub question_text: String,
    /// `None` when the timer ran out before an answer was picked.
    pub chosen_answer_text: Option<String>,
    pub correct_answer_text: String,
}

impl PlayerAnswer {
    pub fn chosen(question: &Question, index: usize) -> Self {
        Self {
            question_text: question.text.clone(),
            chosen_answer_text: Some(question.answers[index].clone()),
            correct_answer_text: question.correct_answer().to_string(),
        }
    }

    pub fn timed_out(question: &Question) -> Self {
        Self {
            question_text: question.text.clone(),
            chosen_answer_text: None,
            correct_answer_text: question.correct_answer().to_string(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.chosen_answer_text.as_deref() == Some(self.correct_answer_text.as_str())
    }
}
