#![allow(dead_code)]

use timed_quiz::timer::TimerEventKind;
use timed_quiz::{MemoryStore, Question, QuizSession, TimerEvent, View};
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub type TestSession = QuizSession<View, MemoryStore>;

pub fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("Question {}", i + 1),
                ["a", "b", "c", "d"],
                i % 4,
                (i % 3) as u32 + 1,
            )
        })
        .collect()
}

pub fn session(questions: Vec<Question>) -> (TestSession, UnboundedReceiver<TimerEvent>) {
    session_with_best(questions, 0)
}

pub fn session_with_best(
    questions: Vec<Question>,
    best: u32,
) -> (TestSession, UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let store = if best > 0 {
        MemoryStore::with_value("bestScore", best)
    } else {
        MemoryStore::new()
    };
    let session = QuizSession::new(questions, View::default(), store, tx).with_seed(11);
    (session, rx)
}

/// Feeds countdown events into the session until the live question expires.
pub async fn drain_until_expired(
    session: &mut TestSession,
    rx: &mut UnboundedReceiver<TimerEvent>,
) {
    while let Some(event) = rx.recv().await {
        if session.handle_timer(event) && event.kind == TimerEventKind::Expired {
            return;
        }
    }
}
