pub mod navigator;
pub mod study;
pub mod timer;

pub use study::{CardView, Direction, FeedbackOutcome, FlipOutcome, SessionOptions, StudySession};
