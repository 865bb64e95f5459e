use std::process;

use argh::FromArgs;
use pipex::{eval, global, logging, report, Pipeline};

#[derive(FromArgs)]
/// Run commands connected by pipes, reading a file or a here-document and writing a file.
struct Args {
	/// log level used when RUST_LOG is unset (error, warn, info, debug, trace)
	#[argh(option, default = "String::from(\"warn\")")]
	log_level: String,

	/// operands: <infile> <cmd>... <outfile>, or here_doc <LIMITER> <cmd>... <outfile>
	#[argh(positional, greedy)]
	operands: Vec<String>,
}

fn run(args: &Args) -> anyhow::Result<i32> {
	let state = global::State::from_env()?;
	let pipeline = match Pipeline::from_operands(&args.operands) {
		Some(pipeline) => pipeline,
		None => {
			report::usage();
			return Ok(0);
		},
	};
	let job = eval::eval(&state, &pipeline)?;
	Ok(job.code().unwrap_or(1))
}

fn main() {
	let args: Args = argh::from_env();
	logging::init(&args.log_level);
	let code = run(&args).unwrap_or_else(|e| {
		report::error(&e);
		1
	});
	process::exit(code)
}
