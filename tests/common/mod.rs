#![allow(dead_code)]

use std::fs::{self, File};
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};

use pipex::global::State;
use pipex::job::Job;
use pipex::search::SearchPath;
use pipex::{eval, Sink};

pub fn state() -> State {
	State::from_env().expect("PATH must be set for tests")
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, contents).expect("write fixture");
	path
}

pub fn commands(cmds: &[&str]) -> Vec<String> {
	cmds.iter().map(|s| s.to_string()).collect()
}

/// Runs `cmds` from `input` into a fresh `out` file and returns the job and the output.
pub fn run_between(dir: &Path, input: &Path, cmds: &[&str]) -> (Job, String) {
	run_searching(&state().search_path, dir, input, cmds)
}

/// Like [`run_between`], resolving commands against `search_path`.
pub fn run_searching(search_path: &SearchPath, dir: &Path, input: &Path, cmds: &[&str]) -> (Job, String) {
	let out = dir.join("out");
	let input = OwnedFd::from(File::open(input).expect("open input"));
	let output = OwnedFd::from(Sink::truncate(&out).open().expect("open output"));
	let job = eval::run(search_path, &commands(cmds), input, output).expect("run pipeline");
	let contents = fs::read_to_string(&out).expect("read output");
	(job, contents)
}
