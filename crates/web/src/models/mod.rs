//! Domain models for the polls site.

pub mod poll;
pub mod session;

pub use poll::{Choice, NewPoll, NewQuestion, Question, VoteOutcome};
pub use session::keys as session_keys;
