//! The compiled shift/reduce/goto table produced by table construction.
mod builder;

pub use builder::build;

use crate::grammar::{Grammar, Symbol, Terminal};
use std::collections::BTreeMap;

/// A single outgoing edge for a terminal: either shift into a new state or
/// reduce by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateEdge {
    Shift(usize),
    Reduce(usize),
}

/// Terminal-keyed transitions for one state. Single-code terminals are
/// looked up directly; ranges are looked up by binary search over a sorted,
/// non-overlapping list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StateTransitions {
    pub direct_edges: BTreeMap<u32, StateEdge>,
    pub range_edges: Vec<(Terminal, StateEdge)>,
}

impl StateTransitions {
    pub fn lookup(&self, code: u32) -> Option<StateEdge> {
        if let Some(edge) = self.direct_edges.get(&code) {
            return Some(*edge);
        }
        self.range_edges
            .binary_search_by(|(range, _)| {
                if code < range.start {
                    std::cmp::Ordering::Greater
                } else if code > range.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|i| self.range_edges[i].1)
    }
}

/// One state of the compiled automaton. Multiple states may share a
/// `transitions` pool entry by structural identity.
#[derive(Debug, Clone)]
pub struct State {
    pub transitions: usize,
    pub gotos: BTreeMap<usize, usize>,
    pub provenance: Option<Symbol>,
}

/// The immutable, shareable compiled parser table: a normalized [Grammar]
/// plus states numbered in LR(0) discovery order (state 0 is the start) and
/// a deduplicated pool of [StateTransitions].
pub struct Table {
    pub grammar: Grammar,
    pub states: Vec<State>,
    pub transitions_pool: Vec<StateTransitions>,
}

impl Table {
    pub fn state_transitions(&self, state: usize) -> &StateTransitions {
        &self.transitions_pool[self.states[state].transitions]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Build a table from a grammar component tree with the default,
    /// silent [BuildConfig](crate::BuildConfig).
    pub fn build(
        tower: &crate::tower::Tower,
        root: crate::tower::NodeId,
        types: crate::grammar::GrammarTypes,
    ) -> Result<Table, crate::BuildError> {
        Self::build_with_config(tower, root, types, &crate::BuildConfig::new())
    }

    /// Run the full pipeline: normalize the grammar tree, compute
    /// FIRST/nullable, enumerate the LR(0) canonical collection, discover
    /// LALR(1) lookaheads, then compact into a [Table].
    pub fn build_with_config(
        tower: &crate::tower::Tower,
        root: crate::tower::NodeId,
        types: crate::grammar::GrammarTypes,
        config: &crate::BuildConfig,
    ) -> Result<Table, crate::BuildError> {
        let grammar = crate::grammar::normalize(tower, root, types, config)?;
        let sets = crate::sets::GrammarSets::compute(&grammar);
        let lr0 = crate::lr0::build_canonical_collection(&grammar);
        let lalr = crate::lalr::compute_lookaheads(&grammar, &sets, &lr0);
        let table = build(grammar, &lr0, &lalr, config)?;
        Ok(table)
    }
}
