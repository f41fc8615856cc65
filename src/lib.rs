mod automaton;
mod builder;
mod definition;
mod input;
mod nfa;
pub mod parser;
mod simulator;
mod trace;

pub use automaton::{Automaton, AutomatonError, State, StateSet, Symbol, Transitions, EPSILON};
pub use builder::{NFABuilder, ValidationErrors};
pub use definition::Definition;
pub use input::{Report, TestLine};
pub use nfa::NFA;
pub use parser::LoadError;
pub use simulator::Simulator;
pub use trace::{DisplaySet, Rule, Step, Trace, Verdict};
