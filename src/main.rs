use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use timed_quiz::{Quiz, Settings, TimeoutPolicy, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from (defaults to the built-in set)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Settings file (defaults to ./quiz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File the best score is kept in
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// Record timed-out questions in the summary as "no answer"
    #[arg(long)]
    record_timeouts: bool,

    /// Keep the best score in memory only
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(questions) = &self.questions {
            settings.questions = Some(questions.clone());
        }
        if let Some(score_file) = &self.score_file {
            settings.score_file = score_file.clone();
        }
        if self.record_timeouts {
            settings.timeout_policy = TimeoutPolicy::RecordNoAnswer;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut settings);

    if let Err(e) = logging::init(&settings.log_file) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let quiz = match Quiz::from_settings(&settings, !args.no_save) {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
