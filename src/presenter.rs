//! The seam between the quiz state machine and whatever draws it.

use crate::models::PlayerAnswer;

/// Top-level screens. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Intro,
    Question,
    Infinite,
    Result,
}

/// Named text fields the quiz writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    BestScore,
    QuestionText,
    /// 1-based position of the question (or round, in infinite mode).
    QuestionNumber,
    TotalQuestions,
    TimeLeft,
    /// Final "score / total" line of a linear run.
    Score,
    /// Running score in infinite mode.
    InfiniteScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMark {
    Correct,
    Wrong,
}

/// Calls the quiz makes to reflect its state.
///
/// Implementations only render; they never call back into the quiz from
/// inside these methods.
pub trait Presenter {
    fn show_screen(&mut self, screen: Screen);

    fn set_text(&mut self, field: Field, text: String);

    /// Replaces the answer controls. Control `i` stands for `answers[i]`.
    fn set_answers(&mut self, answers: &[String]);

    /// Disables every answer control until the next `set_answers`.
    fn lock_answers(&mut self);

    fn mark_answer(&mut self, index: usize, mark: AnswerMark);

    fn set_next_visible(&mut self, visible: bool);

    fn show_summary(&mut self, history: &[PlayerAnswer]);
}
