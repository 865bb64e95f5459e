//! Runs a chain of external commands connected like a shell pipeline.
//!
//! Each command string becomes one process; the standard output of every
//! stage feeds the standard input of the next. The first stage reads from a
//! file or from a here-document collected off standard input, and the last
//! stage writes to a file. [`eval::eval`] opens the endpoints, spawns the
//! stages and waits for every one of them.

pub mod error;
pub mod eval;
pub mod global;
pub mod heredoc;
pub mod job;
pub mod logging;
pub mod parser;
pub mod report;
pub mod search;
pub mod types;

pub use error::{PipexError, StageError};
pub use types::{OutputMode, Pipeline, Sink, Source};
