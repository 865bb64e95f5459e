use std::env;
use std::ffi::OsStr;

use crate::error::{PipexError, Result};
use crate::search::SearchPath;

const PATH_KEY: &str = "PATH";

/// Configuration read once from the environment of the orchestrating process.
#[derive(Debug, Clone)]
pub struct State {
	pub search_path: SearchPath,
}

impl State {
	pub fn new(search_path: SearchPath) -> State {
		State { search_path: search_path }
	}

	pub fn from_env() -> Result<State> {
		if env::vars_os().next().is_none() {
			return Err(PipexError::NoEnv);
		}
		State::from_path_value(env::var_os(PATH_KEY).as_deref())
	}

	/// A missing or empty `PATH` is fatal.
	pub fn from_path_value(value: Option<&OsStr>) -> Result<State> {
		let search_path = SearchPath::new(value.unwrap_or_default());
		if search_path.is_empty() {
			return Err(PipexError::NoSearchPath);
		}
		Ok(State::new(search_path))
	}
}
