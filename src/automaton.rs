use std::{
	borrow::Cow,
	collections::{BTreeSet, HashMap},
};
use thiserror::Error;

/// Identifier of a state, valid in the range `0..num_states`.
pub type State = usize;

/// A single input character.
pub type Symbol = char;

/// Reserved symbol labelling empty transitions. Never part of an alphabet.
pub const EPSILON: Symbol = '&';

/// Set of states, e.g. the active configuration of a simulation.
pub type StateSet = BTreeSet<State>;

/// Outgoing transitions of a single state, keyed by symbol (or `EPSILON`).
pub type Transitions = HashMap<Symbol, StateSet>;

/// Read-only view of a nondeterministic finite automaton with epsilon moves.
pub trait Automaton {
	/// Number of states, 0 while unset.
	fn num_states(&self) -> usize;

	/// Initial state.
	fn start_state(&self) -> State;

	/// Set of accepting states.
	fn accepting_states(&self) -> &StateSet;

	/// Set of input symbols, never containing `EPSILON`.
	fn alphabet(&self) -> &BTreeSet<Symbol>;

	/// Transitions leaving a state. Empty for states without any.
	fn transitions(&self, state: State) -> Cow<'_, Transitions>;

	/// Destinations of `state` on `symbol`, if there are any.
	fn targets(&self, state: State, symbol: Symbol) -> Option<&StateSet>;

	/// Checks whether a state lies within `0..num_states`.
	/// Always false while the state count is unset.
	fn has_state(&self, state: State) -> bool {
		state < self.num_states()
	}

	/// Checks whether a symbol is known to the automaton.
	/// `EPSILON` always counts as known.
	fn has_symbol(&self, symbol: Symbol) -> bool {
		symbol == EPSILON || self.alphabet().contains(&symbol)
	}

	/// Checks whether a state is accepting.
	fn is_accepting(&self, state: State) -> bool {
		self.accepting_states().contains(&state)
	}
}

/// Enum representing a rejected mutation of an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
	#[error("symbol '{0}' is reserved for epsilon transitions")]
	ReservedSymbol(Symbol),

	#[error("an automaton needs at least one state")]
	NoStates,

	#[error("inexistent state {state} (automaton has {num_states} states)")]
	InexistentState { state: State, num_states: usize },

	#[error("symbol '{0}' is not part of the alphabet")]
	UnknownSymbol(Symbol),

	#[error("no start state given")]
	MissingStartState,
}
