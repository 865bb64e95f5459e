use std::ffi::NulError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures in the orchestrating process. All of them abort the run.
#[derive(Debug, Error)]
pub enum PipexError {
	#[error("No env")]
	NoEnv,

	#[error("No PATH in env")]
	NoSearchPath,

	#[error("empty pipeline")]
	EmptyPipeline,

	#[error("{}: {source}", .path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{op}: {source}")]
	Sys {
		op: &'static str,
		#[source]
		source: nix::Error,
	},
}

impl PipexError {
	pub fn sys(op: &'static str) -> impl FnOnce(nix::Error) -> PipexError {
		move |source| PipexError::Sys { op: op, source: source }
	}
}

/// Failures inside a stage process between fork and exec. They never reach
/// the orchestrator; the stage prints them and exits with [`StageError::exit_code`].
#[derive(Debug, Error)]
pub enum StageError {
	#[error("empty command")]
	EmptyCommand,

	#[error("{0}: command not found")]
	NotFound(String),

	#[error("{op}: {source}")]
	Sys {
		op: &'static str,
		#[source]
		source: nix::Error,
	},

	#[error("{program}: {source}")]
	Exec {
		program: String,
		#[source]
		source: nix::Error,
	},

	#[error("nul byte in argument: {0}")]
	Nul(#[from] NulError),
}

impl StageError {
	pub fn exit_code(&self) -> i32 {
		match *self {
			StageError::EmptyCommand | StageError::NotFound(_) => 127,
			_ => 126,
		}
	}
}

pub type Result<T, E = PipexError> = std::result::Result<T, E>;
