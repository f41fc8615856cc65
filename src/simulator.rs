use super::{Automaton, Rule, State, StateSet, Step, Symbol, Trace, Verdict, EPSILON};
use std::{collections::VecDeque, iter};
use tracing::trace;

/// Decides acceptance of strings against a borrowed automaton.
///
/// The simulator tracks the full set of active states, so nondeterministic branches
/// and epsilon moves are all followed at once. The automaton is never mutated.
#[derive(Debug)]
pub struct Simulator<'a, A: ?Sized> {
	automaton: &'a A,
}

impl<'a, A> Simulator<'a, A>
where
	A: Automaton + ?Sized,
{
	/// Creates a new simulator over an automaton.
	pub fn new(automaton: &'a A) -> Self {
		Self { automaton }
	}

	/// Computes the set of states reachable from `states` through epsilon transitions alone.
	/// The result always contains `states` itself.
	pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
		let mut closure = states.clone();
		let mut queue: VecDeque<State> = states.iter().copied().collect();
		while let Some(state) = queue.pop_front() {
			if let Some(targets) = self.automaton.targets(state, EPSILON) {
				for &target in targets {
					if closure.insert(target) {
						queue.push_back(target);
					}
				}
			}
		}
		closure
	}

	/// Collects the direct destinations of `states` on `symbol`, without closure.
	pub fn step(&self, states: &StateSet, symbol: Symbol) -> StateSet {
		states
			.iter()
			.filter_map(|&state| self.automaton.targets(state, symbol))
			.flatten()
			.copied()
			.collect()
	}

	/// Checks whether the automaton accepts `input`.
	///
	/// The empty string is accepted iff the closure of the start state holds an accepting
	/// state. Inputs with symbols outside the alphabet are rejected.
	pub fn simulate(&self, input: &str) -> bool {
		self.run(input, None).1.is_accepted()
	}

	/// Same as `simulate`, additionally recording every step.
	pub fn simulate_traced(&self, input: &str) -> Trace {
		let mut steps = Vec::new();
		let (initial, verdict) = self.run(input, Some(&mut steps));
		Trace {
			initial,
			steps,
			verdict,
		}
	}

	fn run(&self, input: &str, mut steps: Option<&mut Vec<Step>>) -> (StateSet, Verdict) {
		let start = iter::once(self.automaton.start_state()).collect();
		let initial = self.epsilon_closure(&start);
		trace!(input, initial = ?initial, "starting simulation");

		if let Some(symbol) = input.chars().find(|&symbol| !self.automaton.has_symbol(symbol)) {
			trace!(%symbol, "symbol not in alphabet");
			return (initial, Verdict::UnknownSymbol(symbol));
		}

		let mut current = initial.clone();
		for symbol in input.chars() {
			let reached = self.step(&current, symbol);
			let closed = self.epsilon_closure(&reached);
			trace!(%symbol, active = ?current, reached = ?reached, closed = ?closed, "step");

			if let Some(steps) = steps.as_mut() {
				steps.push(self.describe(symbol, &current, reached, closed.clone()));
			}
			current = closed;
			if current.is_empty() {
				return (initial, Verdict::Exhausted);
			}
		}

		let verdict = match current.iter().find(|&&state| self.automaton.is_accepting(state)) {
			Some(&state) => Verdict::Accepted(state),
			None => Verdict::NoAcceptingState,
		};
		trace!(final_states = ?current, %verdict, "simulation done");
		(initial, verdict)
	}

	fn rule(&self, state: State, symbol: Symbol) -> Rule {
		Rule {
			state,
			symbol,
			targets: self
				.automaton
				.targets(state, symbol)
				.cloned()
				.unwrap_or_default(),
		}
	}

	fn describe(
		&self,
		symbol: Symbol,
		active: &StateSet,
		reached: StateSet,
		closed: StateSet,
	) -> Step {
		Step {
			symbol,
			active: active.clone(),
			rules: active.iter().map(|&state| self.rule(state, symbol)).collect(),
			epsilon_rules: active
				.iter()
				.filter(|&&state| self.automaton.targets(state, EPSILON).is_some())
				.map(|&state| self.rule(state, EPSILON))
				.collect(),
			closure_rules: reached.iter().map(|&state| self.rule(state, EPSILON)).collect(),
			reached,
			closed,
		}
	}
}
