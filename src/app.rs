use std::collections::BTreeMap;

use crossterm::event::KeyCode;
use tracing::debug;

use crate::models::PlayerAnswer;
use crate::presenter::{AnswerMark, Field, Presenter, Screen};
use crate::quiz::{Mode, QuizError, QuizSession};
use crate::store::ScoreStore;
use crate::timer::TimerEvent;
use crate::ui::Theme;

pub type Session = QuizSession<View, Box<dyn ScoreStore>>;

/// One answer button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerControl {
    pub text: String,
    pub mark: Option<AnswerMark>,
}

/// What the terminal currently shows. Written by the quiz through
/// [`Presenter`], read by the `ui` renderers.
#[derive(Debug, Default)]
pub struct View {
    pub screen: Screen,
    texts: BTreeMap<Field, String>,
    pub answers: Vec<AnswerControl>,
    pub locked: bool,
    pub next_visible: bool,
    pub summary: Vec<PlayerAnswer>,
}

impl View {
    pub fn text(&self, field: Field) -> &str {
        self.texts.get(&field).map(String::as_str).unwrap_or("")
    }
}

impl Presenter for View {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    fn set_text(&mut self, field: Field, text: String) {
        self.texts.insert(field, text);
    }

    fn set_answers(&mut self, answers: &[String]) {
        self.answers = answers
            .iter()
            .map(|text| AnswerControl {
                text: text.clone(),
                mark: None,
            })
            .collect();
        self.locked = false;
    }

    fn lock_answers(&mut self) {
        self.locked = true;
    }

    fn mark_answer(&mut self, index: usize, mark: AnswerMark) {
        if let Some(control) = self.answers.get_mut(index) {
            control.mark = Some(mark);
        }
    }

    fn set_next_visible(&mut self, visible: bool) {
        self.next_visible = visible;
    }

    fn show_summary(&mut self, history: &[PlayerAnswer]) {
        self.summary = history.to_vec();
    }
}

/// Terminal front end: turns key presses into quiz transitions and keeps the
/// bits of UI state the quiz does not care about.
pub struct App {
    session: Session,
    cursor: usize,
    summary_scroll: usize,
    theme: Theme,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, theme: Theme) -> Self {
        Self {
            session,
            cursor: 0,
            summary_scroll: 0,
            theme,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &View {
        self.session.presenter()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn summary_scroll(&self) -> usize {
        self.summary_scroll
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_timer(&mut self, event: TimerEvent) {
        self.session.handle_timer(event);
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.theme = self.theme.toggled();
                return;
            }
            _ => {}
        }

        let result = match self.view().screen {
            Screen::Intro => self.handle_intro_key(key),
            Screen::Question | Screen::Infinite => self.handle_question_key(key),
            Screen::Result => self.handle_result_key(key),
        };

        if let Err(err) = result {
            debug!(?key, error = %err, "key ignored");
        }
    }

    fn handle_intro_key(&mut self, key: KeyCode) -> Result<(), QuizError> {
        match key {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.session.start_quiz()?;
                self.cursor = 0;
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.session.infinite_mode()?;
                self.cursor = 0;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_question_key(&mut self, key: KeyCode) -> Result<(), QuizError> {
        let answer_count = self.view().answers.len();

        match key {
            KeyCode::Up | KeyCode::Char('k') if !self.view().locked && answer_count > 0 => {
                self.cursor = (self.cursor + answer_count - 1) % answer_count;
            }
            KeyCode::Down | KeyCode::Char('j') if !self.view().locked && answer_count > 0 => {
                self.cursor = (self.cursor + 1) % answer_count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.view().next_visible {
                    self.next()?;
                } else {
                    self.select(self.cursor)?;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.next()?,
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                self.select(index)?;
                self.cursor = index;
            }
            KeyCode::Esc if self.view().screen == Screen::Infinite => {
                self.session.leave_infinite()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_result_key(&mut self, key: KeyCode) -> Result<(), QuizError> {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = self.view().summary.len().saturating_sub(1);
                self.summary_scroll = (self.summary_scroll + 1).min(max_scroll);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.summary_scroll = self.summary_scroll.saturating_sub(1);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.session.restart_quiz()?;
                self.summary_scroll = 0;
            }
            _ => {}
        }
        Ok(())
    }

    fn select(&mut self, index: usize) -> Result<(), QuizError> {
        match self.session.mode() {
            Some(Mode::Infinite) => self.session.select_infinite_answer(index),
            _ => self.session.select_answer(index),
        }
    }

    fn next(&mut self) -> Result<(), QuizError> {
        self.session.next_question()?;
        self.cursor = 0;
        Ok(())
    }
}
