//! Finite automata.
//!
//! - `nfa`: Thompson construction from the syntax tree, epsilon closures,
//!   wildcard expansion, and the subset construction.
//! - `dfa`: the deterministic automaton, acceptance, unreachable-state
//!   removal, and minimization.

mod dfa;
mod nfa;

pub use dfa::Dfa;
pub use nfa::Nfa;

use std::fmt;
use std::ops::RangeInclusive;

/// One element of an automaton's alphabet.
///
/// `Wildcard` only ever appears in intermediate NFAs; it is expanded to
/// [`WILDCARD_ALPHABET`] before determinization, so a finished DFA carries
/// `Char` symbols exclusively.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Char(char),
    Wildcard,
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{:?}", c),
            Symbol::Wildcard => write!(f, "<any>"),
        }
    }
}

/// The characters `.` stands for: printable ASCII, space through tilde.
///
/// This set is a fixed part of the external interface; a wildcard in the
/// pattern makes exactly these 95 characters observable in the compiled
/// DFA's alphabet.
pub const WILDCARD_ALPHABET: RangeInclusive<char> = ' '..='~';
