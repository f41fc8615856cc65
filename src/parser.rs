//! Loading automata from files.
//!
//! The line-oriented `.fa` format looks like this:
//!
//! ```text
//! 0 1
//! 3
//! 0
//! 0 0 3 0 0 1 0 1 1
//! 1 0 1 0 2
//! 2 1 0
//! ```
//!
//! The first line holds the alphabet, one single-character token per symbol. The next
//! two lines hold the number of states and the start state. Then follows one line per
//! state: its id, `1` if it is accepting or `0` otherwise, the number of transitions and
//! that many `symbol destination` pairs. The symbol `&` denotes an epsilon transition.
//!
//! Files ending in `.yaml` or `.yml` are read as a serialized `NFA` instead.

use super::{Automaton, AutomatonError, State, NFA};
use std::{
	collections::BTreeSet,
	fs, io,
	path::{Path, PathBuf},
	str,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Enum representing a failure to load an automaton.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("cannot read automaton file {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("invalid YAML automaton: {0}")]
	Yaml(#[from] serde_yaml::Error),

	#[error("line {line}: missing {what}")]
	MissingLine { line: usize, what: &'static str },

	#[error("line {line}: invalid symbol '{token}' (must be a single character)")]
	InvalidSymbol { line: usize, token: String },

	#[error("line {line}: symbol '{symbol}' is not part of the alphabet")]
	UnknownSymbol { line: usize, symbol: char },

	#[error("line {line}: invalid {what} '{token}'")]
	InvalidNumber {
		line: usize,
		what: &'static str,
		token: String,
	},

	#[error("line {line}: {what} {value} out of range (automaton has {num_states} states)")]
	StateOutOfRange {
		line: usize,
		what: &'static str,
		value: i64,
		num_states: usize,
	},

	#[error("line {line}: accepting flag must be 0 or 1, found '{token}'")]
	InvalidAcceptFlag { line: usize, token: String },

	#[error("line {line}: state {state} declares {expected} transitions but lists {found}")]
	MissingTransition {
		line: usize,
		state: State,
		expected: usize,
		found: usize,
	},

	#[error("line {line}: {source}")]
	Automaton {
		line: usize,
		#[source]
		source: AutomatonError,
	},
}

/// Loads an automaton from a file, choosing the format by extension.
pub fn load_file<P>(path: P) -> Result<NFA, LoadError>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	debug!(path = %path.display(), "loading automaton");
	let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
		path: path.to_owned(),
		source,
	})?;

	match path.extension().and_then(|ext| ext.to_str()) {
		Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&source)?),
		_ => parse_str(&source),
	}
}

/// Parses an automaton in the `.fa` format.
pub fn parse_str(source: &str) -> Result<NFA, LoadError> {
	let mut nfa = NFA::new();
	parse_into(source, &mut nfa)?;
	Ok(nfa)
}

/// Parses an automaton in the `.fa` format into an existing `NFA`.
///
/// The automaton is reset first. Parsing stops at the first error, leaving the
/// automaton partially populated.
pub fn parse_into(source: &str, nfa: &mut NFA) -> Result<(), LoadError> {
	nfa.reset();
	let mut lines = Lines::new(source);

	let (line, text) = lines.next("alphabet")?;
	for token in text.split_whitespace() {
		let symbol = single_char(line, token)?;
		nfa.add_symbol(symbol).map_err(|source| LoadError::Automaton { line, source })?;
	}

	let (line, text) = lines.next("number of states")?;
	let token = first_token(line, text, "number of states")?;
	let num_states: i64 = parse_number(line, token, "number of states")?;
	// negative counts fail the same way as zero
	let num_states = usize::try_from(num_states).unwrap_or(0);
	nfa.set_num_states(num_states).map_err(|source| LoadError::Automaton { line, source })?;

	let (line, text) = lines.next("start state")?;
	let token = first_token(line, text, "start state")?;
	let start = parse_state(line, token, "start state", num_states)?;
	nfa.set_start_state(start).map_err(|source| LoadError::Automaton { line, source })?;

	let mut defined = BTreeSet::new();
	for _ in 0..num_states {
		let (line, text) = lines.next("state definition")?;
		let mut tokens = text.split_whitespace();

		let token = tokens.next().unwrap_or_default();
		let state = parse_state(line, token, "state", num_states)?;
		let accepts = match tokens.next() {
			Some("0") => false,
			Some("1") => true,
			token => {
				return Err(LoadError::InvalidAcceptFlag {
					line,
					token: token.unwrap_or_default().to_owned(),
				})
			}
		};
		let token = tokens.next().unwrap_or_default();
		let count: usize = parse_number(line, token, "transition count")?;

		if !defined.insert(state) {
			warn!(line, state, "state defined more than once, merging definitions");
		}
		if accepts {
			nfa.add_accepting_state(state).map_err(|source| LoadError::Automaton { line, source })?;
		}

		for found in 0..count {
			let (symbol, dest) = match (tokens.next(), tokens.next()) {
				(Some(symbol), Some(dest)) => (symbol, dest),
				_ => {
					return Err(LoadError::MissingTransition {
						line,
						state,
						expected: count,
						found,
					})
				}
			};
			let symbol = single_char(line, symbol)?;
			if !nfa.has_symbol(symbol) {
				return Err(LoadError::UnknownSymbol { line, symbol });
			}
			let dest = parse_state(line, dest, "destination state", num_states)?;
			nfa.add_transition(state, symbol, dest)
				.map_err(|source| LoadError::Automaton { line, source })?;
		}
		if tokens.next().is_some() {
			debug!(line, state, "ignoring tokens after the last transition");
		}
	}

	let trailing = lines.remaining();
	if trailing > 0 {
		debug!(trailing, "ignoring lines after the state definitions");
	}
	debug!(
		num_states,
		start,
		symbols = nfa.alphabet().len(),
		accepting = nfa.accepting_states().len(),
		"automaton loaded"
	);
	Ok(())
}

/// Line iterator keeping track of 1-based line numbers.
struct Lines<'a> {
	inner: str::Lines<'a>,
	line: usize,
}

impl<'a> Lines<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			inner: source.lines(),
			line: 0,
		}
	}

	fn next(&mut self, what: &'static str) -> Result<(usize, &'a str), LoadError> {
		self.line += 1;
		let line = self.line;
		self.inner
			.next()
			.map(|text| (line, text))
			.ok_or(LoadError::MissingLine { line, what })
	}

	fn remaining(self) -> usize {
		self.inner.filter(|text| !text.trim().is_empty()).count()
	}
}

fn first_token<'a>(line: usize, text: &'a str, what: &'static str) -> Result<&'a str, LoadError> {
	text.split_whitespace()
		.next()
		.ok_or(LoadError::MissingLine { line, what })
}

fn single_char(line: usize, token: &str) -> Result<char, LoadError> {
	let mut chars = token.chars();
	match (chars.next(), chars.next()) {
		(Some(symbol), None) => Ok(symbol),
		_ => Err(LoadError::InvalidSymbol {
			line,
			token: token.to_owned(),
		}),
	}
}

fn parse_number<T>(line: usize, token: &str, what: &'static str) -> Result<T, LoadError>
where
	T: str::FromStr,
{
	token.parse().map_err(|_| LoadError::InvalidNumber {
		line,
		what,
		token: token.to_owned(),
	})
}

fn parse_state(
	line: usize,
	token: &str,
	what: &'static str,
	num_states: usize,
) -> Result<State, LoadError> {
	let value: i64 = parse_number(line, token, what)?;
	State::try_from(value)
		.ok()
		.filter(|&state| state < num_states)
		.ok_or(LoadError::StateOutOfRange {
			line,
			what,
			value,
			num_states,
		})
}
