//! LALR(1) lookahead discovery: DeRemer-Pennello spontaneous generation plus
//! a propagation fixpoint, built on top of the LR(0) canonical collection.
use crate::grammar::{Grammar, Symbol, Terminal};
use crate::item::{LR0Item, LR1Item};
use crate::lr0::Lr0Collection;
use crate::sets::GrammarSets;
use std::collections::{BTreeMap, BTreeSet};

/// Per-`(state, kernel item)` lookahead sets for every state of the
/// canonical collection. Never contains [crate::grammar::LOOKAHEAD_MARKER] —
/// only concrete terminals (including EOF) are recorded.
#[derive(Debug, Clone, Default)]
pub struct Lalr {
    lookaheads: BTreeMap<(usize, LR0Item), BTreeSet<Terminal>>,
}

impl Lalr {
    pub fn lookaheads(&self, state: usize, item: LR0Item) -> BTreeSet<Terminal> {
        self.lookaheads
            .get(&(state, item))
            .cloned()
            .unwrap_or_default()
    }
}

fn lr1_closure(grammar: &Grammar, sets: &GrammarSets, seeds: Vec<LR1Item>) -> Vec<LR1Item> {
    let mut set: BTreeSet<LR1Item> = seeds.into_iter().collect();
    let mut frontier: Vec<LR1Item> = set.iter().copied().collect();

    while let Some(item) = frontier.pop() {
        if let Some(Symbol::NonTerminal(nt)) = item.core.symbol_after_dot(grammar) {
            let rest = &grammar.rule(item.core.rule).symbols[item.core.dot + 1..];
            let firsts = sets.first_of_sequence(rest, item.lookahead);
            for &rule in &grammar.non_terminal(nt).rules {
                for &lookahead in &firsts {
                    let new_item = LR1Item::new(LR0Item::new(rule, 0), lookahead);
                    if set.insert(new_item) {
                        frontier.push(new_item);
                    }
                }
            }
        }
    }
    set.into_iter().collect()
}

pub fn compute_lookaheads(grammar: &Grammar, sets: &GrammarSets, lr0: &Lr0Collection) -> Lalr {
    let mut lookaheads: BTreeMap<(usize, LR0Item), BTreeSet<Terminal>> = BTreeMap::new();
    lookaheads
        .entry((0, LR0Item::new(0, 0)))
        .or_default()
        .insert(Terminal::eof());

    let transition_maps: Vec<BTreeMap<Symbol, usize>> = lr0
        .states
        .iter()
        .map(|s| s.transitions.iter().copied().collect())
        .collect();

    let mut propagations: Vec<((usize, LR0Item), (usize, LR0Item))> = Vec::new();

    for (state_index, state) in lr0.states.iter().enumerate() {
        for &kernel in &state.items.kernels {
            let seed = LR1Item::new(kernel, Terminal::lookahead_marker());
            let closed = lr1_closure(grammar, sets, vec![seed]);
            for item in &closed {
                if let Some(symbol) = item.core.symbol_after_dot(grammar) {
                    if let Some(&target) = transition_maps[state_index].get(&symbol) {
                        let dest_item = item.core.advanced();
                        if item.lookahead == Terminal::lookahead_marker() {
                            propagations.push(((state_index, kernel), (target, dest_item)));
                        } else {
                            lookaheads
                                .entry((target, dest_item))
                                .or_default()
                                .insert(item.lookahead);
                        }
                    }
                }
            }
        }
    }

    loop {
        let mut changed = false;
        for (src, dst) in &propagations {
            let additions: Vec<Terminal> = lookaheads
                .get(src)
                .map(|s| s.iter().copied().collect())
                .unwrap_or_default();
            if additions.is_empty() {
                continue;
            }
            let dst_set = lookaheads.entry(*dst).or_default();
            for terminal in additions {
                if dst_set.insert(terminal) {
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    Lalr { lookaheads }
}
