use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub answers: Vec<String>,
    #[serde(rename = "correct", alias = "correctIndex", alias = "correct_index")]
    pub correct_index: usize,
    /// Seconds allowed to answer.
    #[serde(alias = "time_limit")]
    pub time_limit: u32,
}

impl Question {
    pub fn new<T, A>(text: T, answers: A, correct_index: usize, time_limit: u32) -> Self
    where
        T: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            text: text.into(),
            answers: answers.into_iter().map(Into::into).collect(),
            correct_index,
            time_limit,
        }
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// Checks the invariants a loaded question must hold.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.answers.is_empty() {
            return Err("question has no answers");
        }
        if self.correct_index >= self.answers.len() {
            return Err("correct index is out of range");
        }
        if self.time_limit == 0 {
            return Err("time limit must be at least one second");
        }
        Ok(())
    }
}
