//! Thompson construction and determinization.
//!
//! [`Nfa::compile`] lowers each syntax-tree node to an automaton fragment
//! with one fresh initial state and a set of final states, stitched to its
//! children with epsilon transitions. Fragments never share states (ids
//! come from one generator), so assembling a parent out of children is a
//! matter of moving maps, not copying them.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{smallvec, SmallVec};

use crate::ast::Ast;
use crate::state::{StateGen, StateId};
use crate::trie::StateTrie;

use super::{Dfa, Symbol, WILDCARD_ALPHABET};

/// Targets of one transition. Most NFA edges have a single target.
pub type Targets = SmallVec<[StateId; 2]>;

/// Nondeterministic finite automaton with epsilon transitions.
#[derive(Debug)]
pub struct Nfa {
    pub initial: StateId,
    pub finals: FxHashSet<StateId>,
    pub states: FxHashSet<StateId>,
    pub alphabet: FxHashSet<Symbol>,
    pub delta: FxHashMap<StateId, FxHashMap<Symbol, Targets>>,
    pub epsilon: FxHashMap<StateId, Targets>,
}

impl Nfa {
    /// Thompson's construction: compiles a syntax tree to an NFA.
    ///
    /// Every node mints at most two fresh states, so the result has at most
    /// twice as many states as the tree has nodes.
    pub fn compile(ast: &Ast, gen: &mut StateGen) -> Nfa {
        match ast {
            Ast::Char(c) => Nfa::atom(Symbol::Char(*c), gen),
            Ast::Wildcard => Nfa::atom(Symbol::Wildcard, gen),
            Ast::Empty => {
                let (initial, fin, mut nfa) = Nfa::shell(gen);
                nfa.add_epsilon(initial, fin);
                nfa
            }
            Ast::Concat(left, right) => {
                let mut nfa = Nfa::compile(left, gen);
                let mut rhs = Nfa::compile(right, gen);
                let rhs_initial = rhs.initial;
                let rhs_finals = std::mem::take(&mut rhs.finals);
                let lhs_finals = std::mem::take(&mut nfa.finals);
                nfa.absorb(rhs);
                for &fin in &lhs_finals {
                    nfa.add_epsilon(fin, rhs_initial);
                }
                nfa.finals = rhs_finals;
                nfa
            }
            Ast::Alt(branches) => {
                let (initial, fin, mut nfa) = Nfa::shell(gen);
                for branch in branches {
                    let mut sub = Nfa::compile(branch, gen);
                    let sub_initial = sub.initial;
                    let sub_finals = std::mem::take(&mut sub.finals);
                    nfa.absorb(sub);
                    nfa.add_epsilon(initial, sub_initial);
                    for &sub_fin in &sub_finals {
                        nfa.add_epsilon(sub_fin, fin);
                    }
                }
                nfa
            }
            Ast::Star(sub) => Nfa::repeat(sub, gen, true),
            Ast::Plus(sub) => Nfa::repeat(sub, gen, false),
            Ast::Maybe(sub) => {
                let (initial, fin, mut nfa) = Nfa::shell(gen);
                let mut inner = Nfa::compile(sub, gen);
                let inner_initial = inner.initial;
                let inner_finals = std::mem::take(&mut inner.finals);
                nfa.absorb(inner);
                nfa.add_epsilon(initial, fin);
                nfa.add_epsilon(initial, inner_initial);
                for &inner_fin in &inner_finals {
                    nfa.add_epsilon(inner_fin, fin);
                }
                nfa
            }
        }
    }

    /// Shared lowering of `Star` and `Plus`. The two differ in a single
    /// epsilon: `Star` may skip the body (`initial -> final`), `Plus` must
    /// pass through it at least once.
    fn repeat(sub: &Ast, gen: &mut StateGen, may_skip: bool) -> Nfa {
        let (initial, fin, mut nfa) = Nfa::shell(gen);
        let mut inner = Nfa::compile(sub, gen);
        let inner_initial = inner.initial;
        let inner_finals = std::mem::take(&mut inner.finals);
        nfa.absorb(inner);
        if may_skip {
            nfa.add_epsilon(initial, fin);
        }
        nfa.add_epsilon(initial, inner_initial);
        for &inner_fin in &inner_finals {
            nfa.add_epsilon(inner_fin, fin);
            nfa.add_epsilon(inner_fin, inner_initial);
        }
        nfa
    }

    /// Fresh two-state fragment with no transitions yet: `initial` and a
    /// single final state.
    fn shell(gen: &mut StateGen) -> (StateId, StateId, Nfa) {
        let initial = gen.generate();
        let fin = gen.generate();
        let mut states = FxHashSet::default();
        states.insert(initial);
        states.insert(fin);
        let mut finals = FxHashSet::default();
        finals.insert(fin);
        let nfa = Nfa {
            initial,
            finals,
            states,
            alphabet: FxHashSet::default(),
            delta: FxHashMap::default(),
            epsilon: FxHashMap::default(),
        };
        (initial, fin, nfa)
    }

    /// Two-state fragment consuming exactly one symbol.
    fn atom(symbol: Symbol, gen: &mut StateGen) -> Nfa {
        let (initial, fin, mut nfa) = Nfa::shell(gen);
        nfa.alphabet.insert(symbol);
        nfa.delta
            .entry(initial)
            .or_default()
            .insert(symbol, smallvec![fin]);
        nfa
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.epsilon.entry(from).or_default().push(to);
    }

    /// Moves `other`'s states and transitions into `self`, leaving initial
    /// and final states for the caller to wire up. Fragments never share
    /// states, so the map unions are disjoint.
    fn absorb(&mut self, other: Nfa) {
        self.states.extend(other.states);
        self.alphabet.extend(other.alphabet);
        self.delta.extend(other.delta);
        self.epsilon.extend(other.epsilon);
    }

    /// Epsilon closure of every state: all states reachable through epsilon
    /// transitions alone, always including the state itself.
    pub fn epsilon_closures(&self) -> FxHashMap<StateId, FxHashSet<StateId>> {
        let mut closures =
            FxHashMap::with_capacity_and_hasher(self.states.len(), Default::default());
        for &state in &self.states {
            let mut closure = FxHashSet::default();
            closure.insert(state);
            let mut queue = VecDeque::from([state]);
            while let Some(next) = queue.pop_front() {
                if let Some(targets) = self.epsilon.get(&next) {
                    for &target in targets {
                        if closure.insert(target) {
                            queue.push_back(target);
                        }
                    }
                }
            }
            closures.insert(state, closure);
        }
        closures
    }

    /// Replaces every wildcard edge with one edge per character in
    /// [`WILDCARD_ALPHABET`], then drops `Wildcard` from the automaton.
    /// The enumerated characters join the alphabet only when a wildcard
    /// was actually present.
    pub fn expand_wildcards(&mut self) {
        if !self.alphabet.remove(&Symbol::Wildcard) {
            return;
        }
        for row in self.delta.values_mut() {
            let Some(targets) = row.remove(&Symbol::Wildcard) else {
                continue;
            };
            for c in WILDCARD_ALPHABET {
                let entry = row.entry(Symbol::Char(c)).or_default();
                for &target in &targets {
                    if !entry.contains(&target) {
                        entry.push(target);
                    }
                }
            }
        }
        self.alphabet.extend(WILDCARD_ALPHABET.map(Symbol::Char));
    }

    /// Subset construction: consumes the NFA and returns an equivalent DFA.
    ///
    /// Each DFA state stands for a set of NFA states, canonicalized as the
    /// sorted sequence of its members; the trie maps every sequence seen so
    /// far to its merged id, which both deduplicates states and bounds the
    /// construction.
    pub fn into_dfa(mut self, gen: &mut StateGen) -> Dfa {
        self.expand_wildcards();
        let closures = self.epsilon_closures();

        let mut trie = StateTrie::new();
        let mut states = FxHashSet::default();
        let mut finals = FxHashSet::default();
        let mut delta: FxHashMap<StateId, FxHashMap<Symbol, StateId>> = FxHashMap::default();

        let mut start_key: Vec<StateId> = closures[&self.initial].iter().copied().collect();
        start_key.sort_unstable();

        let initial = merged_state(&mut trie, &start_key, gen);
        states.insert(initial);
        if start_key.iter().any(|s| self.finals.contains(s)) {
            finals.insert(initial);
        }

        // keys in the queue are always sorted
        let mut queue = VecDeque::from([start_key]);
        while let Some(key) = queue.pop_front() {
            let origin = merged_state(&mut trie, &key, gen);
            for &symbol in &self.alphabet {
                let mut targets = FxHashSet::default();
                for state in &key {
                    let Some(row) = self.delta.get(state) else {
                        continue;
                    };
                    let Some(steps) = row.get(&symbol) else {
                        continue;
                    };
                    for target in steps {
                        targets.extend(closures[target].iter().copied());
                    }
                }
                if targets.is_empty() {
                    // no transition; the DFA rejects here
                    continue;
                }
                let mut target_key: Vec<StateId> = targets.into_iter().collect();
                target_key.sort_unstable();

                if trie.lookup(&target_key).is_none() {
                    queue.push_back(target_key.clone());
                }
                let target = merged_state(&mut trie, &target_key, gen);
                states.insert(target);
                if target_key.iter().any(|s| self.finals.contains(s)) {
                    finals.insert(target);
                }
                delta.entry(origin).or_default().insert(symbol, target);
            }
        }

        Dfa {
            initial,
            finals,
            states,
            alphabet: self.alphabet,
            delta,
        }
    }
}

/// Canonical DFA state for a sorted set of NFA states, minting a fresh one
/// on first sight.
fn merged_state(trie: &mut StateTrie, key: &[StateId], gen: &mut StateGen) -> StateId {
    if let Some(existing) = trie.lookup(key) {
        return existing;
    }
    let id = gen.generate();
    trie.insert(key, id)
        .expect("key was just checked to be absent");
    id
}
