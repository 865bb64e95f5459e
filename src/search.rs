use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Directories listed in a colon-separated search-path value, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
	dirs: Vec<PathBuf>,
}

impl SearchPath {
	pub fn new<S: AsRef<OsStr> + ?Sized>(value: &S) -> SearchPath {
		let dirs = env::split_paths(value)
			.filter(|dir| !dir.as_os_str().is_empty())
			.collect();
		SearchPath { dirs: dirs }
	}

	pub fn is_empty(&self) -> bool {
		self.dirs.is_empty()
	}

	#[cfg(test)]
	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}

	/// Returns the first `dir/name` that exists.
	///
	/// A name containing `/` is not searched and is returned as-is when it exists.
	pub fn lookup(&self, name: &str) -> Option<PathBuf> {
		if name.is_empty() {
			return None;
		}
		if name.contains('/') {
			let path = Path::new(name);
			return if path.exists() { Some(path.to_owned()) } else { None };
		}
		self.dirs.iter()
			.map(|dir| dir.join(name))
			.find(|candidate| candidate.exists())
	}
}

/// Resolves `name` against a raw search-path value such as `$PATH`.
pub fn resolve(name: &str, search_path: &str) -> Option<PathBuf> {
	SearchPath::new(search_path).lookup(name)
}
