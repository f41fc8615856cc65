use super::{AutomatonError, State, Symbol, EPSILON, NFA};
use std::{collections::BTreeSet, fmt, vec};
use thiserror::Error;

/// Builds an `NFA` from a complete definition, validated as a whole.
///
/// Unlike the mutators of `NFA`, the order of the calls does not matter and nothing is
/// silently adjusted: `build` either yields a valid automaton or every problem found.
#[derive(Default, Debug, Clone)]
pub struct NFABuilder {
	alphabet: Vec<Symbol>,
	num_states: Option<usize>,
	start: Option<State>,
	accepting: Vec<State>,
	transitions: Vec<(State, Symbol, State)>,
}

impl NFABuilder {
	/// Creates a new empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a symbol to the alphabet.
	pub fn symbol(mut self, symbol: Symbol) -> Self {
		self.alphabet.push(symbol);
		self
	}

	/// Adds several symbols to the alphabet.
	pub fn symbols<I>(mut self, symbols: I) -> Self
	where
		I: IntoIterator<Item = Symbol>,
	{
		self.alphabet.extend(symbols);
		self
	}

	/// Sets the number of states.
	pub fn states(mut self, num_states: usize) -> Self {
		self.num_states = Some(num_states);
		self
	}

	/// Sets the start state.
	pub fn start(mut self, state: State) -> Self {
		self.start = Some(state);
		self
	}

	/// Marks a state as accepting.
	pub fn accepting(mut self, state: State) -> Self {
		self.accepting.push(state);
		self
	}

	/// Adds a transition, possibly on `EPSILON`.
	pub fn transition(mut self, from: State, symbol: Symbol, to: State) -> Self {
		self.transitions.push((from, symbol, to));
		self
	}

	/// Adds an epsilon transition.
	pub fn epsilon(self, from: State, to: State) -> Self {
		self.transition(from, EPSILON, to)
	}

	/// Validates the definition and creates the automaton.
	///
	/// Transitions on symbols outside the alphabet are rejected here, even though
	/// `NFA::add_transition` itself accepts them.
	pub fn build(self) -> Result<NFA, ValidationErrors> {
		let mut errors = Vec::new();
		let num_states = self.num_states.unwrap_or(0);
		let alphabet: BTreeSet<_> = self.alphabet.iter().copied().collect();

		// range errors would only repeat the missing count
		let check = |state: State, errors: &mut Vec<_>| {
			if num_states != 0 && state >= num_states {
				errors.push(AutomatonError::InexistentState { state, num_states });
			}
		};

		if num_states == 0 {
			errors.push(AutomatonError::NoStates);
		}
		if alphabet.contains(&EPSILON) {
			errors.push(AutomatonError::ReservedSymbol(EPSILON));
		}
		match self.start {
			Some(start) => check(start, &mut errors),
			None => errors.push(AutomatonError::MissingStartState),
		}
		for &state in &self.accepting {
			check(state, &mut errors);
		}
		for &(from, symbol, to) in &self.transitions {
			check(from, &mut errors);
			check(to, &mut errors);
			if symbol != EPSILON && !alphabet.contains(&symbol) {
				errors.push(AutomatonError::UnknownSymbol(symbol));
			}
		}
		if !errors.is_empty() {
			return Err(ValidationErrors(errors));
		}

		let mut nfa = NFA::new();
		for symbol in alphabet {
			nfa.add_symbol(symbol)?;
		}
		nfa.set_num_states(num_states)?;
		if let Some(start) = self.start {
			nfa.set_start_state(start)?;
		}
		for state in self.accepting {
			nfa.add_accepting_state(state)?;
		}
		for (from, symbol, to) in self.transitions {
			nfa.add_transition(from, symbol, to)?;
		}
		Ok(nfa)
	}
}

/// Every problem found while validating an automaton definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid automaton definition: {}", DisplayList(.0))]
pub struct ValidationErrors(Vec<AutomatonError>);

impl ValidationErrors {
	pub fn errors(&self) -> &[AutomatonError] {
		&self.0
	}
}

impl From<AutomatonError> for ValidationErrors {
	fn from(error: AutomatonError) -> Self {
		Self(vec![error])
	}
}

impl From<Vec<AutomatonError>> for ValidationErrors {
	fn from(errors: Vec<AutomatonError>) -> Self {
		Self(errors)
	}
}

impl IntoIterator for ValidationErrors {
	type Item = AutomatonError;
	type IntoIter = vec::IntoIter<AutomatonError>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

struct DisplayList<'a>(&'a [AutomatonError]);

impl fmt::Display for DisplayList<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, error) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			write!(f, "{}", error)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Automaton;
	use maplit::btreeset;

	#[test]
	fn build() {
		let nfa = NFABuilder::new()
			.symbols("ab".chars())
			.states(3)
			.start(0)
			.accepting(2)
			.transition(0, 'a', 1)
			.transition(0, 'a', 2)
			.epsilon(1, 2)
			.build()
			.unwrap();

		assert_eq!(3, nfa.num_states(), "State count not set");
		assert_eq!(&btreeset![2], nfa.accepting_states(), "Accepting states incorrect");
		assert_eq!(Some(&btreeset![1, 2]), nfa.targets(0, 'a'), "Transitions incorrect");
		assert_eq!(Some(&btreeset![2]), nfa.targets(1, EPSILON), "Epsilon transition missing");
	}

	#[test]
	fn order_independent() {
		let nfa = NFABuilder::new()
			.transition(3, 'x', 4)
			.accepting(4)
			.start(3)
			.states(5)
			.symbol('x')
			.build()
			.unwrap();
		assert_eq!(3, nfa.start_state(), "Start state adjusted during build");
	}

	#[test]
	fn collects_all_errors() {
		let errors = NFABuilder::new()
			.symbols(vec!['a', EPSILON])
			.states(2)
			.accepting(2)
			.transition(0, 'b', 1)
			.build()
			.unwrap_err();

		assert_eq!(
			&[
				AutomatonError::ReservedSymbol(EPSILON),
				AutomatonError::MissingStartState,
				AutomatonError::InexistentState {
					state: 2,
					num_states: 2
				},
				AutomatonError::UnknownSymbol('b'),
			],
			errors.errors()
		);
		assert_eq!(
			"invalid automaton definition: symbol '&' is reserved for epsilon transitions; \
			 no start state given; inexistent state 2 (automaton has 2 states); \
			 symbol 'b' is not part of the alphabet",
			errors.to_string()
		);
	}

	#[test]
	fn missing_state_count() {
		let errors = NFABuilder::new().start(4).accepting(9).build().unwrap_err();
		assert_eq!(&[AutomatonError::NoStates], errors.errors());
	}
}
