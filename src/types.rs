use std::fs::{self, File};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::{PipexError, Result};

/// First operand selecting here-document input.
pub const HERE_DOC: &str = "here_doc";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OutputMode { Truncate, Append }

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Source {
	File(PathBuf),
	HereDoc { limiter: String },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Sink {
	pub path: PathBuf,
	pub mode: OutputMode,
}

/// Raw command strings plus both endpoints. Commands are split only inside
/// the process that runs them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pipeline {
	pub commands: Vec<String>,
	pub source: Source,
	pub sink: Sink,
}

pub fn open_input(path: &Path) -> Result<File> {
	File::open(path).map_err(|e| PipexError::Open { path: path.to_owned(), source: e })
}

impl Sink {
	pub fn truncate<P: Into<PathBuf>>(path: P) -> Sink {
		Sink { path: path.into(), mode: OutputMode::Truncate }
	}

	pub fn append<P: Into<PathBuf>>(path: P) -> Sink {
		Sink { path: path.into(), mode: OutputMode::Append }
	}

	pub fn open(&self) -> Result<File> {
		let mut oopt = fs::OpenOptions::new();
		oopt.write(true).create(true).mode(0o644);
		let _ = match self.mode {
			OutputMode::Truncate => oopt.truncate(true),
			OutputMode::Append => oopt.append(true),
		};
		oopt.open(&self.path).map_err(|e| PipexError::Open { path: self.path.clone(), source: e })
	}
}

impl Pipeline {
	pub fn new(commands: Vec<String>, source: Source, sink: Sink) -> Result<Pipeline> {
		if commands.is_empty() {
			return Err(PipexError::EmptyPipeline);
		}
		Ok(Pipeline { commands: commands, source: source, sink: sink })
	}

	/// Interprets command-line operands:
	///
	/// * `<infile> <cmd>... <outfile>` truncates the output file;
	/// * `here_doc <LIMITER> <cmd>... <outfile>` appends to it.
	///
	/// Returns `None` when there is not at least one command.
	pub fn from_operands(operands: &[String]) -> Option<Pipeline> {
		let (outfile, rest) = operands.split_last()?;
		let (first, rest) = rest.split_first()?;
		let (source, commands, sink) = if first == HERE_DOC {
			let (limiter, commands) = rest.split_first()?;
			(Source::HereDoc { limiter: limiter.clone() }, commands, Sink::append(outfile))
		} else {
			(Source::File(PathBuf::from(first)), rest, Sink::truncate(outfile))
		};
		Pipeline::new(commands.to_vec(), source, sink).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn operands(args: &[&str]) -> Vec<String> {
		args.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn file_shape() {
		let p = Pipeline::from_operands(&operands(&["in", "cat", "wc -l", "out"])).unwrap();
		assert_eq!(p.source, Source::File(PathBuf::from("in")));
		assert_eq!(p.commands, vec!["cat", "wc -l"]);
		assert_eq!(p.sink, Sink::truncate("out"));
	}

	#[test]
	fn here_doc_shape() {
		let p = Pipeline::from_operands(&operands(&["here_doc", "EOF", "cat", "out"])).unwrap();
		assert_eq!(p.source, Source::HereDoc { limiter: "EOF".into() });
		assert_eq!(p.commands, vec!["cat"]);
		assert_eq!(p.sink, Sink::append("out"));
	}

	#[test]
	fn too_few_operands() {
		assert_eq!(Pipeline::from_operands(&operands(&[])), None);
		assert_eq!(Pipeline::from_operands(&operands(&["in", "out"])), None);
		assert_eq!(Pipeline::from_operands(&operands(&["here_doc", "EOF", "out"])), None);
	}

	#[test]
	fn empty_pipeline_is_rejected() {
		let r = Pipeline::new(vec![], Source::File("in".into()), Sink::truncate("out"));
		assert!(matches!(r, Err(PipexError::EmptyPipeline)));
	}

	#[test]
	fn sink_modes() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out");
		fs::write(&path, "old\n").unwrap();

		Sink::append(&path).open().unwrap().write_all(b"new\n").unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");

		Sink::truncate(&path).open().unwrap().write_all(b"x\n").unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
	}

	#[test]
	fn missing_input_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing");
		match open_input(&path).unwrap_err() {
			PipexError::Open { path: p, .. } => assert_eq!(p, path),
			other => panic!("expected open error, got {:?}", other),
		}
	}
}
