use std::fs::File;
use std::io::{self, BufRead, Write};
use std::os::fd::OwnedFd;

use nix::fcntl::OFlag;
use nix::unistd::{self, ForkResult};
use tracing::debug;

use crate::error::{PipexError, Result};
use crate::job::JobBuilder;
use crate::report;

/// Label under which the producer process is recorded in the job.
pub const PRODUCER_LABEL: &str = "here_doc";

/// Copies lines from `reader` to `writer` until a line starting with
/// `limiter` or end of input. The limiter line is consumed, not copied, and
/// nothing after it is read. Returns the number of bytes copied.
pub fn copy_until<R: BufRead, W: Write>(mut reader: R, mut writer: W, limiter: &str) -> io::Result<u64> {
	let mut line: Vec<u8> = vec![];
	let mut copied = 0;
	loop {
		line.clear();
		if reader.read_until(b'\n', &mut line)? == 0 {
			break;
		}
		if line.starts_with(limiter.as_bytes()) {
			break;
		}
		writer.write_all(&line)?;
		copied += line.len() as u64;
	}
	writer.flush()?;
	Ok(copied)
}

/// Forks a producer that feeds standard input, up to the `limiter` line,
/// into a pipe, and returns the pipe's read end.
///
/// The producer is adopted by `job_builder` and reaped with the stages.
pub fn collect(limiter: &str, job_builder: &mut JobBuilder) -> Result<OwnedFd> {
	let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(PipexError::sys("pipe"))?;
	match job_builder.push_fork(PRODUCER_LABEL)? {
		ForkResult::Parent { child } => {
			debug!(pid = %child, limiter, "spawned here_doc producer");
			drop(pipe_write);
			Ok(pipe_read)
		},
		ForkResult::Child => {
			drop(pipe_read);
			let stdin = io::stdin();
			let code = match copy_until(stdin.lock(), File::from(pipe_write), limiter) {
				Ok(_) => 0,
				// The first stage stopped reading; nothing left to deliver.
				Err(ref e) if e.kind() == io::ErrorKind::BrokenPipe => 0,
				Err(e) => {
					report::error(&format_args!("{}: {}", PRODUCER_LABEL, e));
					1
				},
			};
			unsafe { libc::_exit(code) }
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{Cursor, Read};

	#[test]
	fn stops_at_limiter() {
		let mut input = Cursor::new(b"foo\nbar\nEND\nbaz\n".to_vec());
		let mut out = vec![];
		let n = copy_until(&mut input, &mut out, "END").unwrap();
		assert_eq!(out, b"foo\nbar\n");
		assert_eq!(n, 8);

		let mut rest = String::new();
		input.read_to_string(&mut rest).unwrap();
		assert_eq!(rest, "baz\n");
	}

	#[test]
	fn limiter_matches_as_prefix() {
		let mut out = vec![];
		copy_until(Cursor::new(b"a\nENDING\nb\n".to_vec()), &mut out, "END").unwrap();
		assert_eq!(out, b"a\n");
	}

	#[test]
	fn shorter_line_does_not_match() {
		let mut out = vec![];
		copy_until(Cursor::new(b"EN\nEND\n".to_vec()), &mut out, "END").unwrap();
		assert_eq!(out, b"EN\n");
	}

	#[test]
	fn end_of_input_without_limiter() {
		let mut out = vec![];
		copy_until(Cursor::new(b"one\ntwo".to_vec()), &mut out, "END").unwrap();
		assert_eq!(out, b"one\ntwo");
	}

	#[test]
	fn limiter_on_first_line_yields_nothing() {
		let mut out = vec![];
		let n = copy_until(Cursor::new(b"END\nfoo\n".to_vec()), &mut out, "END").unwrap();
		assert_eq!(n, 0);
		assert!(out.is_empty());
	}
}
