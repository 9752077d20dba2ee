//! minre: a small regular-expression engine compiling patterns to
//! minimized DFAs.
//!
//! The pipeline is the classical one: parse to a syntax tree, lower with
//! Thompson's construction to an NFA, determinize by subset construction,
//! then minimize by partition refinement. Matching is a full-string walk
//! over the resulting table, anchored at both ends.
//!
//! ```
//! let dfa = minre::compile("(a|b)*c").unwrap();
//! assert!(dfa.accepts("abbac"));
//! assert!(!dfa.accepts("cab"));
//! ```
//!
//! Supported syntax: literals, `\x` escapes (literal `x` for any `x`),
//! `.` (any printable-ASCII character), `|` alternation, `(...)` grouping,
//! and the postfix quantifiers `*` `+` `?` (no stacking). `[` and `]` are
//! reserved for a future character-class syntax and rejected. The empty
//! pattern is accepted and matches only the empty string.
//!
//! A compiled [`Dfa`] is immutable and freely shareable across threads.
//! Compilation may be exponential in pattern size for pathological
//! patterns (the classical subset-construction bound); matching is linear
//! in the input.

mod ast;
mod automaton;
mod parser;
mod state;
mod trie;

pub use ast::Ast;
pub use automaton::{Dfa, Nfa, Symbol, WILDCARD_ALPHABET};
pub use parser::{parse, ParseError};
pub use state::{StateGen, StateId};

/// Compiles a pattern into a minimized DFA.
///
/// Runs the whole pipeline: parse, optimize the tree, Thompson
/// construction, subset construction, minimization. The only failures are
/// parse errors; every later stage is total on well-formed input.
pub fn compile(pattern: &str) -> Result<Dfa, ParseError> {
    let ast = parse(pattern)?.optimize();
    let mut gen = StateGen::new();
    let nfa = Nfa::compile(&ast, &mut gen);
    Ok(nfa.into_dfa(&mut gen).minimize())
}
