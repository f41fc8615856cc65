use super::{Automaton, AutomatonError, NFABuilder, State, Symbol, ValidationErrors, NFA};
use serde::{ser, Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StateDefinition {
	#[serde(skip_serializing_if = "is_false")]
	accepts: bool,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	transitions: BTreeMap<Symbol, Vec<State>>,
}

fn is_false(value: &bool) -> bool {
	!*value
}

/// Serialized form of an `NFA`.
///
/// The number of states is the number of entries under `states`, whose keys must
/// cover exactly `0..n`. Epsilon transitions use the `'&'` symbol.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Definition {
	alphabet: Vec<Symbol>,
	start: Option<State>,
	states: BTreeMap<State, StateDefinition>,
}

impl TryFrom<Definition> for NFA {
	type Error = ValidationErrors;

	fn try_from(definition: Definition) -> Result<Self, Self::Error> {
		let num_states = definition.states.len();
		let mut errors: Vec<_> = definition
			.states
			.keys()
			.filter(|&&state| state >= num_states)
			.map(|&state| AutomatonError::InexistentState { state, num_states })
			.collect();

		let mut builder = NFABuilder::new()
			.symbols(definition.alphabet)
			.states(num_states);
		if let Some(start) = definition.start {
			builder = builder.start(start);
		}
		for (id, state) in definition.states {
			if state.accepts {
				builder = builder.accepting(id);
			}
			for (symbol, targets) in state.transitions {
				for to in targets {
					builder = builder.transition(id, symbol, to);
				}
			}
		}

		match builder.build() {
			Ok(nfa) if errors.is_empty() => Ok(nfa),
			Ok(_) => Err(errors.into()),
			Err(invalid) => {
				errors.extend(invalid);
				Err(errors.into())
			}
		}
	}
}

impl TryFrom<&NFA> for Definition {
	type Error = ValidationErrors;

	/// Fails for automata that would not load back, checked by the same rules as loading.
	fn try_from(nfa: &NFA) -> Result<Self, Self::Error> {
		let mut builder = NFABuilder::new()
			.symbols(nfa.alphabet().iter().copied())
			.states(nfa.num_states())
			.start(nfa.start_state());
		for &state in nfa.accepting_states() {
			builder = builder.accepting(state);
		}
		for (from, symbol, to) in nfa.iter_transitions() {
			builder = builder.transition(from, symbol, to);
		}
		builder.build()?;

		let mut states: BTreeMap<_, _> = (0..nfa.num_states())
			.map(|state| {
				let definition = StateDefinition {
					accepts: nfa.is_accepting(state),
					transitions: BTreeMap::new(),
				};
				(state, definition)
			})
			.collect();
		for (from, symbol, to) in nfa.iter_transitions() {
			let targets = states
				.entry(from)
				.or_default()
				.transitions
				.entry(symbol)
				.or_default();
			targets.push(to);
			targets.sort_unstable();
		}

		Ok(Self {
			alphabet: nfa.alphabet().iter().copied().collect(),
			start: Some(nfa.start_state()),
			states,
		})
	}
}

impl Serialize for NFA {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		Definition::try_from(self)
			.map_err(<S::Error as ser::Error>::custom)?
			.serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::EPSILON;
	use maplit::btreeset;

	#[test]
	fn deserialize() {
		let yaml = r"{alphabet: [a, b], start: 0, states: {0: {transitions: {a: [0, 1], '&': [2]}}, 1: {accepts: true, transitions: {b: [1]}}, 2: {}}}";
		let nfa: NFA = serde_yaml::from_str(yaml).unwrap();
		assert_eq!(3, nfa.num_states(), "Deserialized NFA has wrong state count");
		assert_eq!(&btreeset![1], nfa.accepting_states(), "Accepting states incorrect");
		assert_eq!(Some(&btreeset![0, 1]), nfa.targets(0, 'a'), "Transitions incorrect");
		assert_eq!(Some(&btreeset![2]), nfa.targets(0, EPSILON), "Epsilon transition missing");
	}

	#[test]
	fn deserialize_invalid() {
		let yaml = r"{alphabet: [a], start: 0, states: {0: {transitions: {b: [0]}}, 3: {accepts: true}}}";
		let error = serde_yaml::from_str::<NFA>(yaml).unwrap_err().to_string();
		assert!(
			error.contains("inexistent state 3 (automaton has 2 states)"),
			"Missing range error in \"{}\"",
			error
		);
		assert!(
			error.contains("symbol 'b' is not part of the alphabet"),
			"Missing alphabet error in \"{}\"",
			error
		);
	}

	#[test]
	fn deserialize_unknown_field() {
		let yaml = r"{start: 0, states: {0: {accepts: true, final: true}}}";
		assert!(
			serde_yaml::from_str::<NFA>(yaml).is_err(),
			"Unknown field accepted"
		);
	}

	#[test]
	fn serialize() {
		let nfa = NFABuilder::new()
			.symbol('a')
			.states(2)
			.start(1)
			.accepting(0)
			.transition(1, 'a', 0)
			.epsilon(1, 1)
			.build()
			.unwrap();
		let yaml = serde_yaml::to_string(&nfa).unwrap();
		let parsed: NFA = serde_yaml::from_str(&yaml).unwrap();
		assert_eq!(nfa, parsed, "Serialized NFA does not load back:\n{}", yaml);
	}

	#[test]
	fn serialize_unknown_symbol() {
		let mut nfa = NFA::new();
		nfa.set_num_states(2).unwrap();
		nfa.add_accepting_state(1).unwrap();
		nfa.add_transition(0, 'z', 1).unwrap();

		let error = serde_yaml::to_string(&nfa).unwrap_err().to_string();
		assert!(
			error.contains("symbol 'z' is not part of the alphabet"),
			"Unexpected error \"{}\"",
			error
		);
	}

	#[test]
	fn serialize_without_state_count() {
		let mut nfa = NFA::new();
		nfa.add_accepting_state(1).unwrap();
		nfa.add_transition(0, EPSILON, 1).unwrap();

		let error = serde_yaml::to_string(&nfa).unwrap_err().to_string();
		assert!(
			error.contains("an automaton needs at least one state"),
			"Unexpected error \"{}\"",
			error
		);
	}

	#[test]
	fn serialize_after_shrinking() {
		let mut nfa = NFA::new();
		nfa.add_accepting_state(4).unwrap();
		nfa.set_num_states(2).unwrap();

		let error = serde_yaml::to_string(&nfa).unwrap_err().to_string();
		assert!(
			error.contains("inexistent state 4 (automaton has 2 states)"),
			"Accepting state out of range silently dropped: \"{}\"",
			error
		);
	}
}
