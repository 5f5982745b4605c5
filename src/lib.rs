//! # timed-quiz
//!
//! A terminal multiple-choice quiz with a per-question countdown, a
//! persisted best score and an endless practice mode.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timed_quiz::{Error, Quiz, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let settings = Settings::load(None)?;
//!     Quiz::from_settings(&settings, true)?.run().await
//! }
//! ```
//!
//! The state machine is usable without the terminal: build a
//! [`QuizSession`] with any [`Presenter`] and [`ScoreStore`] and feed the
//! [`TimerEvent`]s it emits back into [`QuizSession::handle_timer`].

mod app;
pub mod config;
mod data;
mod error;
pub mod logging;
mod models;
pub mod presenter;
pub mod quiz;
pub mod store;
pub mod terminal;
pub mod timer;
mod ui;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

pub use app::{AnswerControl, App, Session, View};
pub use crate::config::Settings;
pub use data::{LoadError, builtin_questions, load_questions_from_json};
pub use error::Error;
pub use models::{PlayerAnswer, Question};
pub use presenter::{AnswerMark, Field, Presenter, Screen};
pub use quiz::{Mode, Phase, QuizError, QuizSession, TimeoutPolicy};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
pub use timer::{TimerEvent, TimerHandle};
pub use ui::Theme;

/// A quiz wired to the terminal.
pub struct Quiz {
    app: App,
    timer_events: UnboundedReceiver<TimerEvent>,
}

impl Quiz {
    pub fn new(
        questions: Vec<Question>,
        store: Box<dyn ScoreStore>,
        timeout_policy: TimeoutPolicy,
        theme: Theme,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = QuizSession::new(questions, View::default(), store, tx)
            .with_timeout_policy(timeout_policy);

        Self {
            app: App::new(session, theme),
            timer_events: rx,
        }
    }

    /// Builds a quiz from settings. With `save` off the best score lives in
    /// memory only.
    pub fn from_settings(settings: &Settings, save: bool) -> Result<Self, Error> {
        let questions = match &settings.questions {
            Some(path) => load_questions_from_json(path)?,
            None => builtin_questions(),
        };

        let store: Box<dyn ScoreStore> = if save {
            Box::new(JsonFileStore::open(&settings.score_file))
        } else {
            Box::new(MemoryStore::new())
        };

        Ok(Self::new(
            questions,
            store,
            settings.timeout_policy,
            settings.theme,
        ))
    }

    /// Takes over the terminal until the user quits.
    pub async fn run(mut self) -> Result<(), Error> {
        info!(
            questions = self.app.session().questions().len(),
            "starting quiz"
        );

        let mut guard = terminal::TerminalGuard::enter()?;
        let result = run_event_loop(guard.terminal(), &mut self.app, &mut self.timer_events).await;
        drop(guard);

        info!(best = self.app.session().best_score(), "quiz closed");
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

/// One event at a time: a key press or a countdown event is fully applied
/// and redrawn before the next one is taken.
async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    timer_events: &mut UnboundedReceiver<TimerEvent>,
) -> Result<(), Error> {
    let mut keys = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.should_quit() {
            break;
        }

        tokio::select! {
            event = keys.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(event) = timer_events.recv() => {
                app.handle_timer(event);
            }
        }
    }

    Ok(())
}
