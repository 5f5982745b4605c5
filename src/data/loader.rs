use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::Question;

/// Error loading a question bank from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain at least one question")]
    Empty(PathBuf),

    #[error("question {index} in {path} is invalid: {reason}")]
    Invalid {
        path: PathBuf,
        index: usize,
        reason: &'static str,
    },
}

/// The question bank shipped with the binary.
pub fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new(
            "What is the capital of France?",
            ["Marseille", "Paris", "Lyon", "Bordeaux"],
            1,
            10,
        ),
        Question::new("What is 2 + 3?", ["3", "4", "5", "1"], 2, 5),
    ]
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_questions(&json_content).map_err(|err| match err {
        ParseFailure::Json(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Empty => LoadError::Empty(path.to_path_buf()),
        ParseFailure::Invalid { index, reason } => LoadError::Invalid {
            path: path.to_path_buf(),
            index,
            reason,
        },
    })?;

    debug!(count = questions.len(), path = %path.display(), "loaded question bank");
    Ok(questions)
}

enum ParseFailure {
    Json(serde_json::Error),
    Empty,
    Invalid { index: usize, reason: &'static str },
}

fn parse_questions(json: &str) -> Result<Vec<Question>, ParseFailure> {
    let questions: Vec<Question> = serde_json::from_str(json).map_err(ParseFailure::Json)?;

    if questions.is_empty() {
        return Err(ParseFailure::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| ParseFailure::Invalid { index, reason })?;
    }

    Ok(questions)
}
