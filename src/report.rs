use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

const EXAMPLE: &str = "\
Ex: pipex <file1> <cmd1> <cmd2> <...> <file2>
    pipex here_doc <LIMITER> <cmd> <cmd1> <...> <file>
";

fn paint(msg: &str, color: bool) -> String {
	if color {
		format!("{}{}{}", RED, msg, RESET)
	} else {
		msg.to_owned()
	}
}

/// Prints `Error: <msg>` on standard error, in red when it is a terminal.
pub fn error<T: Display + ?Sized>(msg: &T) {
	let stderr = io::stderr();
	let color = stderr.is_terminal();
	let mut stderr = stderr.lock();
	let _ = writeln!(stderr, "{}", paint(&format!("Error: {}", msg), color));
	let _ = stderr.flush();
}

/// Prints the bad-argument diagnostic on standard error and the invocation
/// example on standard output.
pub fn usage() {
	error("Bad argument");
	let mut stdout = io::stdout();
	let _ = stdout.write_all(EXAMPLE.as_bytes());
	let _ = stdout.flush();
}
