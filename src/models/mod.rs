mod answer;
mod question;

pub use answer::PlayerAnswer;
pub use question::Question;
