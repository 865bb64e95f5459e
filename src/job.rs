use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, Pid};
use tracing::{debug, warn};

use crate::error::{PipexError, Result};

pub trait WaitStatusExt {
	fn is_terminated(self) -> bool;
	/// Shell-style exit code: the exit status, or 128 + signal number.
	fn code(self) -> Option<i32>;
}

impl WaitStatusExt for WaitStatus {
	fn is_terminated(self) -> bool {
		match self {
			WaitStatus::Exited(..) | WaitStatus::Signaled(..) => true,
			_ => false,
		}
	}

	fn code(self) -> Option<i32> {
		match self {
			WaitStatus::Exited(_, code) => Some(code),
			WaitStatus::Signaled(_, signal, _) => Some(128 + signal as i32),
			_ => None,
		}
	}
}

/// One spawned process and the last status collected for it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Process {
	pub pid: Pid,
	pub label: String,
	pub status: WaitStatus,
}

/// Every process started for one pipeline run, in spawn order.
#[derive(Debug)]
pub struct Job {
	pub processes: Vec<Process>,
}

impl Job {
	/// Blocks until every process in the job has terminated. Each pid is
	/// waited on exactly once.
	pub fn wait(&mut self) -> Result<()> {
		for pr in self.processes.iter_mut() {
			if pr.status.is_terminated() {
				continue;
			}
			let status = retry_eintr(|| wait::waitpid(pr.pid, None))
				.map_err(PipexError::sys("waitpid"))?;
			debug!(pid = %pr.pid, command = %pr.label, ?status, "reaped");
			match status.code() {
				Some(0) | None => {},
				Some(code) => warn!(command = %pr.label, code, "stage exited with failure"),
			}
			pr.status = status;
		}
		Ok(())
	}

	pub fn is_terminated(&self) -> bool {
		self.processes.iter().all(|pr| pr.status.is_terminated())
	}

	/// Exit code of the most recently spawned process, i.e. the last stage.
	pub fn code(&self) -> Option<i32> {
		self.processes.last().and_then(|pr| pr.status.code())
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint) }
		}
	}

	/// Forks, recording the child under `label` on the parent side.
	pub fn push_fork(&mut self, label: &str) -> Result<unistd::ForkResult> {
		// Safety: the orchestrator is single-threaded, and the child only
		// rearranges descriptors before exec or _exit.
		let r = unsafe { unistd::fork() }.map_err(PipexError::sys("fork"))?;
		if let unistd::ForkResult::Parent { child } = r {
			self.adopt(child, label);
		}
		Ok(r)
	}

	/// Records a child forked elsewhere so it is reaped with the job.
	pub fn adopt(&mut self, pid: Pid, label: &str) {
		self.imp.processes.push(Process { pid: pid, label: label.to_owned(), status: WaitStatus::StillAlive });
	}

	#[cfg(test)]
	fn is_empty(&self) -> bool {
		self.imp.processes.is_empty()
	}

	pub fn build(self) -> Job {
		self.imp
	}
}

pub fn retry_eintr<F, T>(f: F) -> nix::Result<T> where F: Fn() -> nix::Result<T> {
	loop {
		match f() {
			Err(nix::Error::EINTR) => {},
			result => return result,
		}
	}
}
