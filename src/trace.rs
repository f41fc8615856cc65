use super::{State, StateSet, Symbol, EPSILON};
use std::fmt;

/// A single rule `(state, symbol) -> targets` looked up during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
	pub state: State,
	pub symbol: Symbol,
	pub targets: StateSet,
}

/// Everything that happened while consuming one input symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
	pub symbol: Symbol,
	/// Configuration before the step.
	pub active: StateSet,
	/// Rules on `symbol`, one per active state.
	pub rules: Vec<Rule>,
	/// Epsilon rules leaving active states. Already covered by the previous closure.
	pub epsilon_rules: Vec<Rule>,
	/// Direct destinations on `symbol`.
	pub reached: StateSet,
	/// Epsilon rules leaving the direct destinations.
	pub closure_rules: Vec<Rule>,
	/// Configuration after the step.
	pub closed: StateSet,
}

/// Final outcome of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	/// The final configuration contains this accepting state.
	Accepted(State),
	/// The input contains a symbol unknown to the automaton.
	UnknownSymbol(Symbol),
	/// The configuration became empty.
	Exhausted,
	/// The final configuration contains no accepting state.
	NoAcceptingState,
}

impl Verdict {
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted(_))
	}
}

/// Step-by-step record of a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
	/// Epsilon closure of the start state.
	pub initial: StateSet,
	pub steps: Vec<Step>,
	pub verdict: Verdict,
}

impl Trace {
	pub fn accepted(&self) -> bool {
		self.verdict.is_accepted()
	}
}

/// Formats a set of states as `{0,1,2}`.
pub struct DisplaySet<'a>(pub &'a StateSet);

impl fmt::Display for DisplaySet<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (i, state) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, "{}", state)?;
		}
		f.write_str("}")
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({},{}) -> {}",
			self.state,
			self.symbol,
			DisplaySet(&self.targets)
		)
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Accepted(state) => write!(f, "accepting state {} reached -> Accepted", state),
			Self::UnknownSymbol(symbol) => {
				write!(f, "symbol '{}' not in alphabet -> Rejected", symbol)
			}
			Self::Exhausted => f.write_str("no active states left -> Rejected"),
			Self::NoAcceptingState => {
				f.write_str("no accepting state in the final configuration -> Rejected")
			}
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "symbol '{}'", self.symbol)?;
		writeln!(f, "  active states: {}", DisplaySet(&self.active))?;
		for rule in &self.rules {
			writeln!(f, "    {}", rule)?;
		}
		for rule in &self.epsilon_rules {
			writeln!(f, "    {}  [{} from active state]", rule, EPSILON)?;
		}
		writeln!(f, "  reached: {}", DisplaySet(&self.reached))?;
		for rule in &self.closure_rules {
			writeln!(f, "    {}", rule)?;
		}
		writeln!(f, "  after closure: {}", DisplaySet(&self.closed))
	}
}

impl fmt::Display for Trace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "initial states: {}", DisplaySet(&self.initial))?;
		for step in &self.steps {
			write!(f, "{}", step)?;
		}
		write!(f, "{}", self.verdict)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreeset;

	#[test]
	fn display() {
		let trace = Trace {
			initial: btreeset![0, 1],
			steps: vec![Step {
				symbol: 'a',
				active: btreeset![0, 1],
				rules: vec![
					Rule {
						state: 0,
						symbol: 'a',
						targets: btreeset![2],
					},
					Rule {
						state: 1,
						symbol: 'a',
						targets: btreeset![],
					},
				],
				epsilon_rules: vec![Rule {
					state: 0,
					symbol: EPSILON,
					targets: btreeset![1],
				}],
				reached: btreeset![2],
				closure_rules: vec![Rule {
					state: 2,
					symbol: EPSILON,
					targets: btreeset![],
				}],
				closed: btreeset![2],
			}],
			verdict: Verdict::Accepted(2),
		};

		let expected = "initial states: {0,1}\n\
		                symbol 'a'\n  \
		                active states: {0,1}\n    \
		                (0,a) -> {2}\n    \
		                (1,a) -> {}\n    \
		                (0,&) -> {1}  [& from active state]\n  \
		                reached: {2}\n    \
		                (2,&) -> {}\n  \
		                after closure: {2}\n\
		                accepting state 2 reached -> Accepted";
		assert_eq!(expected, trace.to_string());
		assert!(trace.accepted(), "Accepted trace reported as rejected");
	}
}
