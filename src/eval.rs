use std::convert::Infallible;
use std::env;
use std::ffi::{CString, OsString};
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStringExt;

use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;
use tracing::debug;

use crate::error::{PipexError, Result, StageError};
use crate::global;
use crate::heredoc;
use crate::job::{self, Job, JobBuilder};
use crate::parser;
use crate::report;
use crate::search::SearchPath;
use crate::types::{self, Pipeline, Source};

/// Moves `fd` onto `target` and closes the original.
fn redirect(fd: OwnedFd, target: RawFd) -> std::result::Result<(), StageError> {
	if fd.as_raw_fd() == target {
		fcntl::fcntl(target, FcntlArg::F_SETFD(FdFlag::empty()))
			.map_err(|e| StageError::Sys { op: "fcntl", source: e })?;
		let _ = fd.into_raw_fd();
		return Ok(());
	}
	job::retry_eintr(|| unistd::dup2(fd.as_raw_fd(), target))
		.map_err(|e| StageError::Sys { op: "dup2", source: e })?;
	Ok(())
}

fn do_exec_command(search_path: &SearchPath, command: &str, stdin: OwnedFd, stdout: OwnedFd) -> std::result::Result<Infallible, StageError> {
	redirect(stdin, libc::STDIN_FILENO)?;
	redirect(stdout, libc::STDOUT_FILENO)?;
	// The Rust runtime ignores SIGPIPE, and exec would pass that on.
	unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }
		.map_err(|e| StageError::Sys { op: "signal", source: e })?;

	let words = parser::split_command(command);
	let name = words.first().ok_or(StageError::EmptyCommand)?;
	let external = search_path.lookup(name).ok_or_else(|| StageError::NotFound(name.clone()))?;
	let external = CString::new(external.into_os_string().into_vec())?;

	let argv: Vec<CString> = words.into_iter().map(CString::new).collect::<std::result::Result<Vec<_>, _>>()?;
	let envp: Vec<CString> = env::vars_os()
		.map(|(mut k, v)| CString::new({ k.push(OsString::from("=")); k.push(v); k.into_vec() }))
		.collect::<std::result::Result<Vec<_>, _>>()?;
	unistd::execve(&external, &argv, &envp)
		.map_err(|e| StageError::Exec { program: external.to_string_lossy().into_owned(), source: e })
}

/// Runs in the forked child: rewires stdio and replaces the process image.
/// Never returns; on failure it prints a diagnostic and exits.
fn exec_command(search_path: &SearchPath, command: &str, stdin: OwnedFd, stdout: OwnedFd) -> ! {
	let code = match do_exec_command(search_path, command, stdin, stdout) {
		Ok(never) => match never {},
		Err(e) => {
			report::error(&e);
			e.exit_code()
		},
	};
	unsafe { libc::_exit(code) }
}

/// Forks one stage. The parent's copies of `stdin` and `stdout` are closed on
/// return; `downstream` is the read end of the stage's own output pipe, which
/// the child must not keep.
fn spawn_stage(search_path: &SearchPath, index: usize, command: &str, stdin: OwnedFd, stdout: OwnedFd,
               downstream: Option<&OwnedFd>, job_builder: &mut JobBuilder) -> Result<()> {
	match job_builder.push_fork(command)? {
		unistd::ForkResult::Parent { child } => {
			debug!(stage = index, pid = %child, command, "spawned stage");
			Ok(())
		},
		unistd::ForkResult::Child => {
			if let Some(fd) = downstream {
				let _ = unistd::close(fd.as_raw_fd());
			}
			exec_command(search_path, command, stdin, stdout)
		},
	}
}

/// Spawns one process per command, wiring each stage's stdout to the next
/// stage's stdin. `input` feeds the first stage and `output` receives the last.
pub fn spawn_commands(search_path: &SearchPath, commands: &[String], input: OwnedFd, output: OwnedFd,
                      job_builder: &mut JobBuilder) -> Result<()> {
	let (last, init) = commands.split_last().ok_or(PipexError::EmptyPipeline)?;
	let mut upstream = input;
	for (i, command) in init.iter().enumerate() {
		let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(PipexError::sys("pipe"))?;
		debug!(stage = i, read = pipe_read.as_raw_fd(), write = pipe_write.as_raw_fd(), "created pipe");
		spawn_stage(search_path, i, command, upstream, pipe_write, Some(&pipe_read), job_builder)?;
		upstream = pipe_read;
	}
	spawn_stage(search_path, init.len(), last, upstream, output, None, job_builder)
}

/// Spawns the stages over already opened endpoints and waits for all of them.
pub fn run(search_path: &SearchPath, commands: &[String], input: OwnedFd, output: OwnedFd) -> Result<Job> {
	let mut job_builder = JobBuilder::new(commands.len());
	let spawned = spawn_commands(search_path, commands, input, output, &mut job_builder);
	finish(job_builder, spawned)
}

/// Reaps everything `job_builder` started, even when spawning failed part way.
fn finish(job_builder: JobBuilder, spawned: Result<()>) -> Result<Job> {
	let mut job = job_builder.build();
	let waited = job.wait();
	spawned?;
	waited?;
	Ok(job)
}

/// Opens the endpoints of `pipeline`, runs it to completion and returns the
/// collected statuses. A here-document producer is the job's first process.
pub fn eval(state: &global::State, pipeline: &Pipeline) -> Result<Job> {
	let mut job_builder = JobBuilder::new(pipeline.commands.len() + 1);
	let (input, output) = match pipeline.source {
		Source::File(ref path) => {
			let input = types::open_input(path)?;
			let output = pipeline.sink.open()?;
			(OwnedFd::from(input), output)
		},
		Source::HereDoc { ref limiter } => {
			let output = pipeline.sink.open()?;
			(heredoc::collect(limiter, &mut job_builder)?, output)
		},
	};
	let spawned = spawn_commands(&state.search_path, &pipeline.commands, input, OwnedFd::from(output), &mut job_builder);
	finish(job_builder, spawned)
}
