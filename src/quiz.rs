//! Quiz flow state machine.
//!
//! A [`QuizSession`] owns the question set, the score, the answer history
//! and the live countdown. Every user action is a method returning
//! `Result<(), QuizError>`; a rejected action leaves the session untouched.
//!
//! ```text
//! Intro --start_quiz--> Question --next_question (last)--> Result --restart_quiz--> Intro
//!   |                     ^   |
//!   |                     +---+ next_question
//!   +--infinite_mode--> Infinite --next_question--> Infinite ...
//!                          +--leave_infinite--> Intro
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::models::{PlayerAnswer, Question};
use crate::presenter::{AnswerMark, Field, Presenter, Screen};
use crate::store::{BEST_SCORE_KEY, ScoreStore};
use crate::timer::{self, TimerEvent, TimerEventKind, TimerHandle, TimerId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("the question set is empty")]
    EmptyQuestionSet,

    #[error("answer {index} is out of range for a question with {len} answers")]
    AnswerOutOfRange { index: usize, len: usize },

    #[error("question {index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: &'static str },
}

/// What happens to a linear-mode question whose timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Nothing is recorded; the question is missing from the summary.
    #[default]
    Skip,
    /// A history entry with no chosen answer is recorded.
    RecordNoAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Linear,
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Timer running, waiting for an answer.
    Open,
    Answered,
    Expired,
}

/// One displayed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    /// Index into the question set.
    pub question: usize,
    pub status: RoundStatus,
}

impl Round {
    fn open(question: usize) -> Self {
        Self {
            question,
            status: RoundStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Question(Round),
    Result,
    Infinite(Round),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Intro => "on the intro screen",
            Phase::Question(round) | Phase::Infinite(round) => match round.status {
                RoundStatus::Open => "a question is open",
                RoundStatus::Answered => "the question is already answered",
                RoundStatus::Expired => "the question has timed out",
            },
            Phase::Result => "showing results",
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            Phase::Question(_) | Phase::Result => Some(Mode::Linear),
            Phase::Infinite(_) => Some(Mode::Infinite),
            Phase::Intro => None,
        }
    }
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

pub struct QuizSession<P, S> {
    questions: Vec<Question>,
    phase: Phase,
    current_index: usize,
    score: u32,
    history: Vec<PlayerAnswer>,
    best_score: u32,
    timeout_policy: TimeoutPolicy,
    timer: Option<TimerHandle>,
    timer_events: UnboundedSender<TimerEvent>,
    rng: ChaCha8Rng,
    presenter: P,
    store: S,
}

impl<P: Presenter, S: ScoreStore> QuizSession<P, S> {
    /// Creates a session on the intro screen.
    ///
    /// The best score is read from `store` once, here. Countdown events are
    /// posted to `timer_events` and must be fed back through
    /// [`handle_timer`](Self::handle_timer).
    pub fn new(
        questions: Vec<Question>,
        mut presenter: P,
        store: S,
        timer_events: UnboundedSender<TimerEvent>,
    ) -> Self {
        let best_score = store.get(BEST_SCORE_KEY, 0);

        presenter.show_screen(Screen::Intro);
        presenter.set_text(Field::BestScore, best_score.to_string());

        Self {
            questions,
            phase: Phase::Intro,
            current_index: 0,
            score: 0,
            history: Vec::new(),
            best_score,
            timeout_policy: TimeoutPolicy::default(),
            timer: None,
            timer_events,
            rng: ChaCha8Rng::from_os_rng(),
            presenter,
            store,
        }
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// Makes shuffling and infinite-mode draws reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Option<Mode> {
        self.phase.mode()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Question(round) | Phase::Infinite(round) => self.questions.get(round.question),
            Phase::Intro | Phase::Result => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn history(&self) -> &[PlayerAnswer] {
        &self.history
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer.as_ref().map(TimerHandle::id)
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shuffles the questions and shows the first one.
    pub fn start_quiz(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Intro {
            return Err(self.invalid("start a quiz"));
        }
        self.check_questions()?;

        shuffle(&mut self.questions, &mut self.rng);
        self.current_index = 0;
        self.score = 0;
        self.history.clear();

        info!(questions = self.questions.len(), "linear quiz started");

        self.presenter.show_screen(Screen::Question);
        self.presenter
            .set_text(Field::TotalQuestions, self.questions.len().to_string());
        self.show_question(0);
        Ok(())
    }

    fn show_question(&mut self, index: usize) {
        self.cancel_timer();

        let question = &self.questions[index];
        let time_limit = question.time_limit;
        self.presenter
            .set_text(Field::QuestionText, question.text.clone());
        self.presenter
            .set_text(Field::QuestionNumber, (index + 1).to_string());
        self.presenter.set_answers(&question.answers);
        self.presenter.set_next_visible(false);
        self.presenter
            .set_text(Field::TimeLeft, time_limit.to_string());

        self.phase = Phase::Question(Round::open(index));
        debug!(index, time_limit, "showing question");
        self.start_timer(time_limit);
    }

    /// Answers the open linear-mode question. Only the first answer counts.
    pub fn select_answer(&mut self, chosen: usize) -> Result<(), QuizError> {
        let round = match self.phase {
            Phase::Question(round) if round.is_open() => round,
            _ => return Err(self.invalid("select an answer")),
        };
        self.check_answer_index(round.question, chosen)?;

        self.cancel_timer();
        self.history
            .push(PlayerAnswer::chosen(&self.questions[round.question], chosen));
        let correct = self.reveal_answer(round.question, chosen);

        self.phase = Phase::Question(Round {
            status: RoundStatus::Answered,
            ..round
        });
        debug!(index = round.question, chosen, correct, score = self.score, "answer recorded");
        Ok(())
    }

    /// Advances past an answered or timed-out question.
    ///
    /// In linear mode this shows the next question or ends the quiz. In
    /// infinite mode it draws another random question.
    pub fn next_question(&mut self) -> Result<(), QuizError> {
        match self.phase {
            Phase::Question(round) if !round.is_open() => {
                self.current_index += 1;
                if self.current_index < self.questions.len() {
                    self.show_question(self.current_index);
                } else {
                    self.end_quiz();
                }
                Ok(())
            }
            Phase::Infinite(round) if !round.is_open() => {
                self.current_index += 1;
                self.show_infinite_question();
                Ok(())
            }
            _ => Err(self.invalid("move to the next question")),
        }
    }

    fn end_quiz(&mut self) {
        self.cancel_timer();
        self.phase = Phase::Result;

        let total = self.questions.len();
        let previous_best = self.best_score;
        if self.score > previous_best {
            self.best_score = self.score;
            if let Err(err) = self.store.set(BEST_SCORE_KEY, self.score) {
                warn!(error = %err, "failed to persist best score");
            }
        }

        info!(
            score = self.score,
            total,
            best = self.best_score,
            new_best = self.best_score > previous_best,
            "linear quiz finished"
        );

        self.presenter.show_screen(Screen::Result);
        self.presenter
            .set_text(Field::Score, format!("{} / {}", self.score, total));
        self.presenter
            .set_text(Field::BestScore, self.best_score.to_string());
        self.presenter.show_summary(&self.history);
    }

    /// Goes back to the intro screen. The best score is kept.
    pub fn restart_quiz(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Result {
            return Err(self.invalid("restart"));
        }

        self.history.clear();
        self.phase = Phase::Intro;
        self.presenter.show_screen(Screen::Intro);
        self.presenter
            .set_text(Field::BestScore, self.best_score.to_string());
        debug!("back to intro");
        Ok(())
    }

    /// Starts the endless practice loop.
    pub fn infinite_mode(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Intro {
            return Err(self.invalid("enter infinite mode"));
        }
        self.check_questions()?;

        self.current_index = 0;
        self.score = 0;

        info!(questions = self.questions.len(), "infinite mode started");

        self.presenter.show_screen(Screen::Infinite);
        self.presenter.set_text(Field::InfiniteScore, "0".to_string());
        self.show_infinite_question();
        Ok(())
    }

    fn show_infinite_question(&mut self) {
        self.cancel_timer();

        let index = self.rng.random_range(0..self.questions.len());
        let question = &self.questions[index];
        let time_limit = question.time_limit;
        self.presenter
            .set_text(Field::QuestionText, question.text.clone());
        self.presenter
            .set_text(Field::QuestionNumber, (self.current_index + 1).to_string());
        self.presenter.set_answers(&question.answers);
        self.presenter.set_next_visible(false);
        self.presenter
            .set_text(Field::TimeLeft, time_limit.to_string());

        self.phase = Phase::Infinite(Round::open(index));
        debug!(round = self.current_index, index, "showing infinite question");
        self.start_timer(time_limit);
    }

    /// Answers the open infinite-mode question against its own correct
    /// index. Nothing is added to the history.
    pub fn select_infinite_answer(&mut self, chosen: usize) -> Result<(), QuizError> {
        let round = match self.phase {
            Phase::Infinite(round) if round.is_open() => round,
            _ => return Err(self.invalid("select an answer")),
        };
        self.check_answer_index(round.question, chosen)?;

        self.cancel_timer();
        let correct = self.reveal_answer(round.question, chosen);
        self.presenter
            .set_text(Field::InfiniteScore, self.score.to_string());

        self.phase = Phase::Infinite(Round {
            status: RoundStatus::Answered,
            ..round
        });
        debug!(index = round.question, chosen, correct, "infinite answer");
        Ok(())
    }

    /// Leaves infinite mode for the intro screen.
    pub fn leave_infinite(&mut self) -> Result<(), QuizError> {
        if !matches!(self.phase, Phase::Infinite(_)) {
            return Err(self.invalid("leave infinite mode"));
        }

        self.cancel_timer();
        self.phase = Phase::Intro;
        info!(score = self.score, rounds = self.current_index + 1, "infinite mode left");

        self.presenter.show_screen(Screen::Intro);
        self.presenter
            .set_text(Field::BestScore, self.best_score.to_string());
        Ok(())
    }

    /// Applies a countdown event. Returns false when the event belongs to a
    /// timer that is no longer live and was ignored.
    pub fn handle_timer(&mut self, event: TimerEvent) -> bool {
        if self.active_timer() != Some(event.timer) {
            debug!(?event, "ignoring stale timer event");
            return false;
        }

        match event.kind {
            TimerEventKind::Tick(remaining) => {
                self.presenter
                    .set_text(Field::TimeLeft, remaining.to_string());
            }
            TimerEventKind::Expired => self.expire_round(),
        }
        true
    }

    fn expire_round(&mut self) {
        self.timer = None;

        match &mut self.phase {
            Phase::Question(round) if round.is_open() => {
                round.status = RoundStatus::Expired;
                if self.timeout_policy == TimeoutPolicy::RecordNoAnswer {
                    self.history
                        .push(PlayerAnswer::timed_out(&self.questions[round.question]));
                }
                debug!(index = round.question, "question timed out");
            }
            Phase::Infinite(round) if round.is_open() => {
                round.status = RoundStatus::Expired;
                debug!(index = round.question, "infinite question timed out");
            }
            _ => return,
        }

        self.presenter.set_text(Field::TimeLeft, "0".to_string());
        self.presenter.lock_answers();
        self.presenter.set_next_visible(true);
    }

    /// Scores `chosen` and marks the controls. Returns whether it was correct.
    fn reveal_answer(&mut self, question: usize, chosen: usize) -> bool {
        let correct_index = self.questions[question].correct_index;
        let correct = chosen == correct_index;
        if correct {
            self.score += 1;
        }

        let mark = if correct {
            AnswerMark::Correct
        } else {
            AnswerMark::Wrong
        };
        self.presenter.mark_answer(chosen, mark);
        self.presenter.mark_answer(correct_index, AnswerMark::Correct);
        self.presenter.lock_answers();
        self.presenter.set_next_visible(true);
        correct
    }

    fn check_questions(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        for (index, question) in self.questions.iter().enumerate() {
            question
                .validate()
                .map_err(|reason| QuizError::InvalidQuestion { index, reason })?;
        }
        Ok(())
    }

    fn check_answer_index(&self, question: usize, chosen: usize) -> Result<(), QuizError> {
        let len = self.questions[question].answers.len();
        if chosen < len {
            Ok(())
        } else {
            Err(QuizError::AnswerOutOfRange { index: chosen, len })
        }
    }

    fn start_timer(&mut self, seconds: u32) {
        debug_assert!(self.timer.is_none(), "previous countdown still live");
        self.timer = Some(timer::start_with_channel(
            seconds,
            self.timer_events.clone(),
        ));
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        let err = QuizError::InvalidTransition {
            action,
            phase: self.phase.name(),
        };
        debug!(error = %err, "transition rejected");
        err
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    /// Keeps the last value of every presenter call.
    #[derive(Default)]
    struct Recorder {
        screen: Option<Screen>,
        texts: BTreeMap<Field, String>,
        answers: Vec<String>,
        locked: bool,
        marks: Vec<(usize, AnswerMark)>,
        next_visible: bool,
        summary: Vec<PlayerAnswer>,
    }

    impl Presenter for Recorder {
        fn show_screen(&mut self, screen: Screen) {
            self.screen = Some(screen);
        }

        fn set_text(&mut self, field: Field, text: String) {
            self.texts.insert(field, text);
        }

        fn set_answers(&mut self, answers: &[String]) {
            self.answers = answers.to_vec();
            self.locked = false;
            self.marks.clear();
        }

        fn lock_answers(&mut self) {
            self.locked = true;
        }

        fn mark_answer(&mut self, index: usize, mark: AnswerMark) {
            self.marks.push((index, mark));
        }

        fn set_next_visible(&mut self, visible: bool) {
            self.next_visible = visible;
        }

        fn show_summary(&mut self, history: &[PlayerAnswer]) {
            self.summary = history.to_vec();
        }
    }

    type Session = QuizSession<Recorder, MemoryStore>;

    fn session(questions: Vec<Question>) -> (Session, UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = QuizSession::new(questions, Recorder::default(), MemoryStore::new(), tx)
            .with_seed(7);
        (session, rx)
    }

    fn sample() -> Vec<Question> {
        vec![
            Question::new("2+2?", ["3", "4", "5", "6"], 1, 5),
            Question::new("Capital of France?", ["Lyon", "Paris"], 1, 10),
            Question::new("1+1?", ["2", "3"], 0, 3),
        ]
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let original: Vec<u32> = (0..50).collect();

        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut rng);
        assert_ne!(shuffled, original);

        shuffled.sort();
        assert_eq!(shuffled, original);

        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut rng);
        let mut one = vec![1];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_shows_intro_with_best_score() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let store = MemoryStore::with_value(BEST_SCORE_KEY, 4);
        let session = QuizSession::new(sample(), Recorder::default(), store, tx);

        assert_eq!(session.phase(), Phase::Intro);
        assert_eq!(session.best_score(), 4);
        assert_eq!(session.presenter().screen, Some(Screen::Intro));
        assert_eq!(session.presenter().texts[&Field::BestScore], "4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_quiz_shows_first_question() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        let first = session.questions()[0].clone();
        let view = session.presenter();
        assert_eq!(view.screen, Some(Screen::Question));
        assert_eq!(view.texts[&Field::TotalQuestions], "3");
        assert_eq!(view.texts[&Field::QuestionNumber], "1");
        assert_eq!(view.texts[&Field::QuestionText], first.text);
        assert_eq!(view.texts[&Field::TimeLeft], first.time_limit.to_string());
        assert_eq!(view.answers, first.answers);
        assert!(!view.next_visible);
        assert!(session.active_timer().is_some());
        assert_eq!(session.phase(), Phase::Question(Round::open(0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_quiz_rejects_empty_set() {
        let (mut session, _rx) = session(Vec::new());
        assert_eq!(session.start_quiz(), Err(QuizError::EmptyQuestionSet));
        assert_eq!(session.infinite_mode(), Err(QuizError::EmptyQuestionSet));
        assert_eq!(session.phase(), Phase::Intro);
        assert!(session.active_timer().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_quiz_rejects_invalid_question() {
        let mut questions = sample();
        questions.push(Question::new("bad", ["a", "b"], 5, 3));
        let (mut session, _rx) = session(questions);

        let expected = Err(QuizError::InvalidQuestion {
            index: 3,
            reason: "correct index is out of range",
        });
        assert_eq!(session.start_quiz(), expected);
        assert_eq!(session.infinite_mode(), expected);
        assert_eq!(session.phase(), Phase::Intro);
        assert!(session.active_timer().is_none());
        assert_eq!(session.presenter().screen, Some(Screen::Intro));
        assert!(session.select_answer(0).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transitions_rejected_in_wrong_phase() {
        let (mut session, _rx) = session(sample());

        assert!(matches!(
            session.select_answer(0),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert!(session.next_question().is_err());
        assert!(session.restart_quiz().is_err());
        assert!(session.leave_infinite().is_err());

        session.start_quiz().unwrap();
        assert!(session.start_quiz().is_err());
        assert!(session.infinite_mode().is_err());
        // Cannot skip an open question.
        assert!(session.next_question().is_err());
        assert!(session.select_infinite_answer(0).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_answer_scores_and_locks() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        let question = session.questions()[0].clone();
        session.select_answer(question.correct_index).unwrap();

        assert_eq!(session.score(), 1);
        assert!(session.active_timer().is_none());
        assert_eq!(
            session.history(),
            &[PlayerAnswer::chosen(&question, question.correct_index)]
        );

        let view = session.presenter();
        assert!(view.locked);
        assert!(view.next_visible);
        assert!(view.marks.contains(&(question.correct_index, AnswerMark::Correct)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_answer_marks_both_controls() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        let question = session.questions()[0].clone();
        let wrong = (question.correct_index + 1) % question.answers.len();
        session.select_answer(wrong).unwrap();

        assert_eq!(session.score(), 0);
        assert_eq!(
            session.presenter().marks,
            vec![
                (wrong, AnswerMark::Wrong),
                (question.correct_index, AnswerMark::Correct)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_out_of_range() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        let len = session.questions()[0].answers.len();
        assert_eq!(
            session.select_answer(len),
            Err(QuizError::AnswerOutOfRange { index: len, len })
        );
        assert!(session.history().is_empty());
        assert!(session.active_timer().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_answer_is_rejected() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        let correct = session.questions()[0].correct_index;
        session.select_answer(correct).unwrap();
        assert!(session.select_answer(correct).is_err());

        assert_eq!(session.score(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_locks_and_reveals_next() {
        let (mut session, mut rx) = session(sample());
        session.start_quiz().unwrap();

        let limit = session.questions()[0].time_limit;
        let mut ticks = Vec::new();
        loop {
            let event = rx.recv().await.unwrap();
            assert!(session.handle_timer(event));
            match event.kind {
                TimerEventKind::Tick(remaining) => ticks.push(remaining),
                TimerEventKind::Expired => break,
            }
        }

        assert_eq!(ticks, (1..=limit).rev().collect::<Vec<_>>());
        assert!(matches!(
            session.phase(),
            Phase::Question(Round {
                status: RoundStatus::Expired,
                ..
            })
        ));
        assert!(session.history().is_empty());
        assert!(session.select_answer(0).is_err());

        let view = session.presenter();
        assert!(view.locked);
        assert!(view.next_visible);
        assert_eq!(view.texts[&Field::TimeLeft], "0");

        session.next_question().unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_can_record_no_answer() {
        let (mut session, mut rx) = session(sample());
        session = session.with_timeout_policy(TimeoutPolicy::RecordNoAnswer);
        session.start_quiz().unwrap();

        let question = session.questions()[0].clone();
        while let Some(event) = rx.recv().await {
            session.handle_timer(event);
            if event.kind == TimerEventKind::Expired {
                break;
            }
        }

        assert_eq!(session.history(), &[PlayerAnswer::timed_out(&question)]);
        assert!(!session.history()[0].is_correct());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_events_are_ignored() {
        let (mut session, mut rx) = session(sample());
        session.start_quiz().unwrap();

        let first_timer = session.active_timer().unwrap();
        let correct = session.questions()[0].correct_index;
        session.select_answer(correct).unwrap();
        session.next_question().unwrap();

        let second_timer = session.active_timer().unwrap();
        assert_ne!(first_timer, second_timer);

        // A late expiry from the first countdown must not touch the second question.
        let stale = TimerEvent {
            timer: first_timer,
            kind: TimerEventKind::Expired,
        };
        assert!(!session.handle_timer(stale));
        assert!(matches!(session.phase(), Phase::Question(round) if round.is_open()));
        assert!(!session.presenter().next_visible);

        tokio::time::sleep(Duration::from_secs(30)).await;
        while let Ok(event) = rx.try_recv() {
            if event.timer == first_timer {
                assert!(!session.handle_timer(event));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_ends_in_result() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();

        for _ in 0..3 {
            let correct = session.current_question().unwrap().correct_index;
            session.select_answer(correct).unwrap();
            session.next_question().unwrap();
        }

        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.score(), 3);
        assert_eq!(session.best_score(), 3);
        assert_eq!(session.store().get(BEST_SCORE_KEY, 0), 3);
        assert!(session.active_timer().is_none());

        let view = session.presenter();
        assert_eq!(view.screen, Some(Screen::Result));
        assert_eq!(view.texts[&Field::Score], "3 / 3");
        assert_eq!(view.texts[&Field::BestScore], "3");
        assert_eq!(view.summary.len(), 3);
    }

    /// Reads like an empty store; every write fails.
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn get(&self, _key: &str, default: u32) -> u32 {
            default
        }

        fn set(&mut self, _key: &str, _value: u32) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("scores.json"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_still_shows_result() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session =
            QuizSession::new(sample(), Recorder::default(), BrokenStore, tx).with_seed(7);
        session.start_quiz().unwrap();

        for _ in 0..3 {
            let correct = session.current_question().unwrap().correct_index;
            session.select_answer(correct).unwrap();
            session.next_question().unwrap();
        }

        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.best_score(), 3);
        assert!(session.active_timer().is_none());

        let view = session.presenter();
        assert_eq!(view.screen, Some(Screen::Result));
        assert_eq!(view.texts[&Field::Score], "3 / 3");
        assert_eq!(view.texts[&Field::BestScore], "3");
        assert_eq!(view.summary.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_best_score() {
        let (mut session, _rx) = session(sample());
        session.start_quiz().unwrap();
        for _ in 0..3 {
            let correct = session.current_question().unwrap().correct_index;
            session.select_answer(correct).unwrap();
            session.next_question().unwrap();
        }

        session.restart_quiz().unwrap();
        assert_eq!(session.phase(), Phase::Intro);
        assert!(session.history().is_empty());
        assert_eq!(session.best_score(), 3);
        assert_eq!(session.presenter().screen, Some(Screen::Intro));

        // A worse second run does not lower it or write the store again.
        session.start_quiz().unwrap();
        for _ in 0..3 {
            let question = session.current_question().unwrap();
            let wrong = (question.correct_index + 1) % question.answers.len();
            session.select_answer(wrong).unwrap();
            session.next_question().unwrap();
        }
        assert_eq!(session.score(), 0);
        assert_eq!(session.best_score(), 3);
        assert_eq!(session.store().writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_infinite_mode_loops() {
        let (mut session, _rx) = session(sample());
        session.infinite_mode().unwrap();
        assert_eq!(session.presenter().screen, Some(Screen::Infinite));

        for round in 0..20 {
            assert_eq!(session.mode(), Some(Mode::Infinite));
            let correct = session.current_question().unwrap().correct_index;
            session.select_infinite_answer(correct).unwrap();
            assert!(session.select_infinite_answer(correct).is_err());
            assert_eq!(session.score(), round + 1);
            session.next_question().unwrap();
        }

        assert!(matches!(session.phase(), Phase::Infinite(round) if round.is_open()));
        assert!(session.history().is_empty());
        assert_eq!(session.presenter().texts[&Field::InfiniteScore], "20");
        assert_eq!(session.presenter().texts[&Field::QuestionNumber], "21");
        assert_eq!(session.store().writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_infinite_cancels_timer() {
        let (mut session, _rx) = session(sample());
        session.infinite_mode().unwrap();
        assert!(session.active_timer().is_some());

        session.leave_infinite().unwrap();
        assert_eq!(session.phase(), Phase::Intro);
        assert!(session.active_timer().is_none());
        assert_eq!(session.presenter().screen, Some(Screen::Intro));

        // The intro allows a fresh linear run afterwards.
        session.start_quiz().unwrap();
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_phase_mode() {
        assert_eq!(Phase::Intro.mode(), None);
        assert_eq!(Phase::Result.mode(), Some(Mode::Linear));
        assert_eq!(Phase::Infinite(Round::open(0)).mode(), Some(Mode::Infinite));
    }
}
