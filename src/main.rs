use clap::{error::ErrorKind, Parser};
use nfa_sim::{parser, Simulator, TestLine, NFA};
use std::{
	fs::File,
	io::{self, BufRead, BufReader, Write},
	path::PathBuf,
	process::ExitCode,
};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const LOG_VAR: &str = "NFA_SIM_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Simulates a nondeterministic finite automaton on a list of strings.
///
/// Every line of STRINGS is tested against the automaton and echoed back followed by
/// "--- Accepted" or "--- Rejected". Use `&` for the empty string. A leading numeric
/// token followed by more text is treated as a label.
#[derive(Debug, Parser)]
#[clap(name = "nfa-sim", version)]
struct Args {
	/// Automaton definition: `.fa` text format, or YAML for `.yaml`/`.yml` files
	automaton: PathBuf,

	/// File with one string per line
	strings: PathBuf,

	/// Print a step-by-step trace after every result
	#[clap(short, long)]
	trace: bool,

	/// Print the loaded automaton as YAML before testing
	#[clap(long)]
	dump: bool,
}

fn setup_logging() {
	let filter =
		EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn main() -> ExitCode {
	setup_logging();

	let args = match Args::try_parse() {
		Ok(args) => args,
		Err(err) => {
			let _ = err.print();
			return match err.kind() {
				ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
				_ => ExitCode::from(1),
			};
		}
	};

	let nfa = match parser::load_file(&args.automaton) {
		Ok(nfa) => nfa,
		Err(err) => {
			error!(path = %args.automaton.display(), "failed to load automaton");
			eprintln!("error creating the automaton: {}", err);
			return ExitCode::from(2);
		}
	};

	let strings = match File::open(&args.strings) {
		Ok(file) => BufReader::new(file),
		Err(err) => {
			eprintln!(
				"cannot open strings file {}: {}",
				args.strings.display(),
				err
			);
			return ExitCode::from(3);
		}
	};

	let stdout = io::stdout();
	match run(&args, &nfa, strings, stdout.lock()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{}", err);
			ExitCode::from(err.exit_code())
		}
	}
}

/// Enum representing a failure while testing the strings.
#[derive(Debug, Error)]
enum RunError {
	#[error("cannot read strings file {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("cannot serialize the automaton: {0}")]
	Dump(#[from] serde_yaml::Error),

	#[error("cannot write results: {0}")]
	Write(#[source] io::Error),
}

impl RunError {
	fn exit_code(&self) -> u8 {
		match self {
			Self::Read { .. } => 3,
			Self::Dump(_) | Self::Write(_) => 4,
		}
	}
}

fn run<R, W>(args: &Args, nfa: &NFA, strings: R, mut out: W) -> Result<(), RunError>
where
	R: BufRead,
	W: Write,
{
	if args.dump {
		let yaml = serde_yaml::to_string(nfa)?;
		writeln!(out, "{}", yaml).map_err(RunError::Write)?;
	}

	let simulator = Simulator::new(nfa);
	let mut tested = 0usize;
	for line in strings.lines() {
		let line = line.map_err(|source| RunError::Read {
			path: args.strings.clone(),
			source,
		})?;
		let line = TestLine::parse(&line);
		let written = if args.trace {
			let trace = simulator.simulate_traced(&line.input);
			writeln!(out, "{}\n{}\n", line.report(trace.accepted()), trace)
		} else {
			writeln!(out, "{}", line.report(simulator.simulate(&line.input)))
		};
		written.map_err(RunError::Write)?;
		tested += 1;
	}
	out.flush().map_err(RunError::Write)?;
	debug!(tested, "all strings tested");
	Ok(())
}
