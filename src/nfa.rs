use super::{Automaton, AutomatonError, Definition, State, StateSet, Symbol, Transitions, EPSILON};
use serde::Deserialize;
use std::{
	borrow::Cow,
	collections::{BTreeSet, HashMap},
};

/// A nondeterministic finite automaton with epsilon transitions.
///
/// States are the integers `0..num_states`. The automaton starts out empty and is
/// populated through its mutators, each of which validates its arguments and leaves
/// the automaton untouched when it returns an error.
///
/// Serialization fails for automata the loaders would reject, e.g. without a state
/// count or with transitions on symbols outside the alphabet.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Definition")]
pub struct NFA {
	alphabet: BTreeSet<Symbol>,
	num_states: usize,
	start: State,
	accepting: StateSet,
	transitions: HashMap<State, Transitions>,
}

impl NFA {
	/// Creates a new empty NFA.
	pub fn new() -> Self {
		Self::default()
	}

	/// Clears the whole definition, returning to the empty automaton.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Adds a symbol to the alphabet.
	/// Returns an `AutomatonError::ReservedSymbol` error for `EPSILON`.
	pub fn add_symbol(&mut self, symbol: Symbol) -> Result<(), AutomatonError> {
		if symbol == EPSILON {
			return Err(AutomatonError::ReservedSymbol(symbol));
		}
		self.alphabet.insert(symbol);
		Ok(())
	}

	/// Fixes the number of states.
	/// A start state falling outside the new range is moved back to state 0.
	pub fn set_num_states(&mut self, num_states: usize) -> Result<(), AutomatonError> {
		if num_states < 1 {
			return Err(AutomatonError::NoStates);
		}
		self.num_states = num_states;
		if self.start >= num_states {
			self.start = 0;
		}
		Ok(())
	}

	/// Sets the start state.
	/// Returns an `AutomatonError::InexistentState` error if the state is out of range.
	pub fn set_start_state(&mut self, state: State) -> Result<(), AutomatonError> {
		self.check_state(state)?;
		self.start = state;
		Ok(())
	}

	/// Marks a state as accepting.
	/// Returns an `AutomatonError::InexistentState` error if the state is out of range.
	pub fn add_accepting_state(&mut self, state: State) -> Result<(), AutomatonError> {
		self.check_state(state)?;
		self.accepting.insert(state);
		Ok(())
	}

	/// Adds a transition, possibly on `EPSILON`.
	/// Returns an `AutomatonError::InexistentState` error if one of the states is out of range.
	pub fn add_transition(
		&mut self,
		from: State,
		symbol: Symbol,
		to: State,
	) -> Result<(), AutomatonError> {
		self.check_state(from)?;
		self.check_state(to)?;
		self.transitions
			.entry(from)
			.or_default()
			.entry(symbol)
			.or_default()
			.insert(to);
		Ok(())
	}

	/// Iterates over every transition as `(from, symbol, to)`.
	pub fn iter_transitions(&self) -> impl Iterator<Item = (State, Symbol, State)> + '_ {
		self.transitions.iter().flat_map(|(&from, transitions)| {
			transitions.iter().flat_map(move |(&symbol, targets)| {
				targets.iter().map(move |&to| (from, symbol, to))
			})
		})
	}

	/// Range check applied by the mutators.
	/// Any state passes while the state count is unset.
	fn check_state(&self, state: State) -> Result<(), AutomatonError> {
		if self.num_states != 0 && state >= self.num_states {
			Err(AutomatonError::InexistentState {
				state,
				num_states: self.num_states,
			})
		} else {
			Ok(())
		}
	}
}

impl Automaton for NFA {
	fn num_states(&self) -> usize {
		self.num_states
	}

	fn start_state(&self) -> State {
		self.start
	}

	fn accepting_states(&self) -> &StateSet {
		&self.accepting
	}

	fn alphabet(&self) -> &BTreeSet<Symbol> {
		&self.alphabet
	}

	fn transitions(&self, state: State) -> Cow<'_, Transitions> {
		match self.transitions.get(&state) {
			Some(transitions) => Cow::Borrowed(transitions),
			None => Cow::Owned(Transitions::new()),
		}
	}

	fn targets(&self, state: State, symbol: Symbol) -> Option<&StateSet> {
		self.transitions.get(&state)?.get(&symbol)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::{btreeset, hashmap};
	use proptest::prelude::*;

	#[test]
	fn construct() {
		let mut nfa = NFA::new();
		nfa.add_symbol('0').unwrap();
		nfa.add_symbol('1').unwrap();
		nfa.set_num_states(3).unwrap();
		nfa.set_start_state(0).unwrap();
		nfa.add_accepting_state(2).unwrap();
		nfa.add_transition(0, '1', 0).unwrap();
		nfa.add_transition(0, '1', 1).unwrap();
		nfa.add_transition(1, EPSILON, 2).unwrap();

		assert_eq!(3, nfa.num_states(), "State count not stored");
		assert_eq!(0, nfa.start_state(), "Start state not stored");
		assert_eq!(&btreeset![2], nfa.accepting_states(), "Accepting states incorrect");
		assert_eq!(&btreeset!['0', '1'], nfa.alphabet(), "Alphabet incorrect");
		assert_eq!(
			Some(&btreeset![0, 1]),
			nfa.targets(0, '1'),
			"Nondeterministic destinations not merged"
		);
		assert_eq!(
			hashmap! { EPSILON => btreeset![2] },
			nfa.transitions(1).into_owned(),
			"Epsilon transition missing"
		);
	}

	#[test]
	fn empty_transitions() {
		let mut nfa = NFA::new();
		nfa.set_num_states(2).unwrap();
		nfa.add_transition(0, 'a', 1).unwrap();
		assert!(nfa.transitions(1).is_empty(), "State without transitions not empty");
		assert!(nfa.transitions(7).is_empty(), "Inexistent state not empty");
		assert_eq!(None, nfa.targets(0, 'b'), "Unexpected destinations");
	}

	#[test]
	fn reserved_symbol() {
		let mut nfa = NFA::new();
		assert_eq!(
			Err(AutomatonError::ReservedSymbol(EPSILON)),
			nfa.add_symbol(EPSILON)
		);
		assert!(nfa.alphabet().is_empty(), "Epsilon added to alphabet");
		assert!(nfa.has_symbol(EPSILON), "Epsilon should always be known");
		assert!(!nfa.has_symbol('a'), "Unknown symbol reported as known");

		nfa.add_symbol('a').unwrap();
		nfa.add_symbol('a').unwrap();
		assert_eq!(&btreeset!['a'], nfa.alphabet(), "Re-adding a symbol changed the alphabet");
	}

	#[test]
	fn num_states() {
		let mut nfa = NFA::new();
		assert!(!nfa.has_state(0), "State 0 exists before the count is set");
		assert_eq!(Err(AutomatonError::NoStates), nfa.set_num_states(0));
		assert_eq!(0, nfa.num_states(), "Failed call changed the state count");

		nfa.set_num_states(1).unwrap();
		assert!(nfa.has_state(0), "State 0 missing");
		assert!(!nfa.has_state(1), "State 1 should not exist");
	}

	#[test]
	fn provisional_start_state() {
		let mut nfa = NFA::new();
		nfa.set_start_state(5).unwrap();
		assert_eq!(5, nfa.start_state(), "Provisional start state rejected");

		nfa.set_num_states(10).unwrap();
		assert_eq!(5, nfa.start_state(), "Start state in range was moved");

		nfa.set_num_states(3).unwrap();
		assert_eq!(0, nfa.start_state(), "Start state out of range was kept");
	}

	#[test]
	fn out_of_range() {
		let mut nfa = NFA::new();
		nfa.set_num_states(2).unwrap();
		nfa.set_start_state(1).unwrap();

		let error = AutomatonError::InexistentState {
			state: 2,
			num_states: 2,
		};
		assert_eq!(Err(error.clone()), nfa.set_start_state(2));
		assert_eq!(Err(error.clone()), nfa.add_accepting_state(2));
		assert_eq!(Err(error.clone()), nfa.add_transition(0, 'a', 2));
		assert_eq!(Err(error), nfa.add_transition(2, 'a', 0));

		assert_eq!(1, nfa.start_state(), "Failed call changed the start state");
		assert!(nfa.accepting_states().is_empty(), "Failed call added accepting state");
		assert_eq!(0, nfa.iter_transitions().count(), "Failed call added transition");
	}

	#[test]
	fn reset() {
		let mut nfa = NFA::new();
		nfa.add_symbol('a').unwrap();
		nfa.set_num_states(2).unwrap();
		nfa.set_start_state(1).unwrap();
		nfa.add_accepting_state(1).unwrap();
		nfa.add_transition(0, 'a', 1).unwrap();

		nfa.reset();
		assert_eq!(NFA::new(), nfa, "Reset did not clear the automaton");
		assert!(!nfa.has_state(0), "State exists after reset");
	}

	proptest! {
		#[test]
		fn has_state_matches_range(num_states in 1usize..64, state in 0usize..128) {
			let mut nfa = NFA::new();
			prop_assert!(!nfa.has_state(state));
			nfa.set_num_states(num_states).unwrap();
			prop_assert_eq!(state < num_states, nfa.has_state(state));
		}

		#[test]
		fn mutators_reject_out_of_range(num_states in 1usize..32, offset in 0usize..32) {
			let mut nfa = NFA::new();
			nfa.set_num_states(num_states).unwrap();
			let state = num_states + offset;
			prop_assert!(nfa.set_start_state(state).is_err());
			prop_assert!(nfa.add_accepting_state(state).is_err());
			prop_assert!(nfa.add_transition(0, 'a', state).is_err());
			prop_assert!(nfa.add_transition(state, EPSILON, 0).is_err());

			let mut expected = NFA::new();
			expected.set_num_states(num_states).unwrap();
			prop_assert_eq!(expected, nfa);
		}
	}
}
