//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, an optional `quiz.toml`
//! (or the file given with `--config`), then `QUIZ__*` environment
//! variables. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::quiz::TimeoutPolicy;
use crate::ui::Theme;

const DEFAULT_CONFIG_NAME: &str = "quiz";

fn default_score_file() -> PathBuf {
    PathBuf::from("quiz-scores.json")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("quiz.log")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Where the best score is kept between runs.
    #[serde(default = "default_score_file")]
    pub score_file: PathBuf,
    /// Question bank to load instead of the built-in one.
    #[serde(default)]
    pub questions: Option<PathBuf>,
    #[serde(default)]
    pub timeout_policy: TimeoutPolicy,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            score_file: default_score_file(),
            questions: None,
            timeout_policy: TimeoutPolicy::default(),
            log_file: default_log_file(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Loads settings. An explicit `path` must exist; the default
    /// `quiz.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("QUIZ").separator("__"))
            .build()?
            .try_deserialize()?;

        debug!(?settings, "loaded settings");
        Ok(settings)
    }
}
