//! Deterministic automaton: acceptance and minimization.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::state::StateId;

use super::Symbol;

/// Deterministic finite automaton.
///
/// `delta` is partial: a missing entry means there is no transition and the
/// input is rejected. Once compiled the automaton is immutable and can be
/// queried from any number of threads without synchronization.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub initial: StateId,
    pub finals: FxHashSet<StateId>,
    pub states: FxHashSet<StateId>,
    pub alphabet: FxHashSet<Symbol>,
    pub delta: FxHashMap<StateId, FxHashMap<Symbol, StateId>>,
}

impl Dfa {
    /// Full-match acceptance: the whole input must drive the automaton
    /// from the initial state into a final one. The empty input is
    /// accepted iff the initial state is final.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.initial;
        for c in input.chars() {
            let next = self
                .delta
                .get(&current)
                .and_then(|row| row.get(&Symbol::Char(c)));
            match next {
                Some(&next) => current = next,
                None => return false,
            }
        }
        self.finals.contains(&current)
    }

    /// Drops every state the initial state cannot reach. Unreachable
    /// states have no transitions into them, so only the state set, the
    /// final set and the outgoing rows need updating.
    pub fn remove_unreachable(&mut self) {
        let mut reachable = FxHashSet::default();
        reachable.insert(self.initial);
        let mut queue = VecDeque::from([self.initial]);
        while let Some(state) = queue.pop_front() {
            if let Some(row) = self.delta.get(&state) {
                for &next in row.values() {
                    if reachable.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        self.states.retain(|s| reachable.contains(s));
        self.finals.retain(|s| reachable.contains(s));
        self.delta.retain(|s, _| reachable.contains(s));
    }

    /// Renames every state through `f`, folding together states that map
    /// to the same name.
    fn map_states(&self, f: impl Fn(StateId) -> StateId) -> Dfa {
        let mut delta: FxHashMap<StateId, FxHashMap<Symbol, StateId>> = FxHashMap::default();
        for (&src, row) in &self.delta {
            let entry = delta.entry(f(src)).or_default();
            for (&symbol, &dst) in row {
                entry.insert(symbol, f(dst));
            }
        }
        Dfa {
            initial: f(self.initial),
            finals: self.finals.iter().map(|&s| f(s)).collect(),
            states: self.states.iter().map(|&s| f(s)).collect(),
            alphabet: self.alphabet.clone(),
            delta,
        }
    }

    /// Partition-refinement minimization (Hopcroft).
    ///
    /// Starts from the final/non-final split and keeps splitting each
    /// partition by the transition signature of its states until the
    /// partitioning is stable, then collapses every partition onto its
    /// smallest member. The result accepts exactly the same language,
    /// never has more states than the input, and re-minimizing it changes
    /// nothing.
    pub fn minimize(mut self) -> Dfa {
        self.remove_unreachable();

        // fixed symbol order for signatures
        let mut alphabet: Vec<Symbol> = self.alphabet.iter().copied().collect();
        alphabet.sort_unstable();

        let non_finals: FxHashSet<StateId> =
            self.states.difference(&self.finals).copied().collect();
        let mut partitions: Vec<FxHashSet<StateId>> = [self.finals.clone(), non_finals]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();

        loop {
            let mut partition_of: FxHashMap<StateId, usize> = FxHashMap::default();
            for (i, partition) in partitions.iter().enumerate() {
                for &state in partition {
                    partition_of.insert(state, i);
                }
            }

            let mut refined: Vec<FxHashSet<StateId>> = Vec::with_capacity(partitions.len());
            for partition in &partitions {
                // signature: for each symbol, the partition the transition
                // leads to, or None when there is no transition
                let mut groups: FxHashMap<Vec<Option<usize>>, FxHashSet<StateId>> =
                    FxHashMap::default();
                for &state in partition {
                    let row = self.delta.get(&state);
                    let signature: Vec<Option<usize>> = alphabet
                        .iter()
                        .map(|symbol| {
                            row.and_then(|row| row.get(symbol))
                                .map(|next| partition_of[next])
                        })
                        .collect();
                    groups.entry(signature).or_default().insert(state);
                }
                refined.extend(groups.into_values());
            }

            // refinement only splits, so an unchanged count means a fixed
            // point
            let stable = refined.len() == partitions.len();
            partitions = refined;
            if stable {
                break;
            }
        }

        let mut representative: FxHashMap<StateId, StateId> = FxHashMap::default();
        for partition in &partitions {
            let Some(repr) = partition.iter().copied().min() else {
                continue;
            };
            for &state in partition {
                representative.insert(state, repr);
            }
        }
        self.map_states(|s| representative[&s])
    }
}
