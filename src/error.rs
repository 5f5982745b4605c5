use std::io;

use config::ConfigError;
use thiserror::Error;

use crate::data::LoadError;
use crate::quiz::QuizError;

/// Top-level error for setting up and running the quiz.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to set up logging: {0}")]
    Logging(String),
}
