//! LR(0) closure, goto, and canonical-collection enumeration.
use crate::grammar::{Grammar, Symbol};
use crate::item::{ItemSet, LR0Item};
use std::collections::BTreeMap;

/// Close `kernels` into a full [ItemSet] by repeatedly expanding items whose
/// next symbol is a non-terminal.
pub fn closure(grammar: &Grammar, kernels: impl IntoIterator<Item = LR0Item>) -> ItemSet {
    let mut set = ItemSet::from_kernels(kernels);
    let mut frontier: Vec<LR0Item> = set.all_items().copied().collect();

    while let Some(item) = frontier.pop() {
        if let Some(Symbol::NonTerminal(nt)) = item.symbol_after_dot(grammar) {
            for &rule in &grammar.non_terminal(nt).rules {
                let new_item = LR0Item::new(rule, 0);
                if new_item.is_kernel(grammar) {
                    if set.kernels.insert(new_item) {
                        frontier.push(new_item);
                    }
                } else if set.non_kernels.insert(new_item) {
                    frontier.push(new_item);
                }
            }
        }
    }
    set
}

/// The successor kernel set after advancing every item of `set` whose next
/// symbol equals `symbol` exactly (non-terminals by index, terminals by
/// identical range — see the design notes on range goto).
pub fn goto_kernels(grammar: &Grammar, set: &ItemSet, symbol: Symbol) -> Vec<LR0Item> {
    set.all_items()
        .filter(|item| item.symbol_after_dot(grammar) == Some(symbol))
        .map(|item| item.advanced())
        .collect()
}

/// Distinct symbols appearing immediately after a dot in `set`, in a stable
/// order (non-terminals by name, then terminals by `(start, end)`).
pub fn symbols_after_dot(grammar: &Grammar, set: &ItemSet) -> Vec<Symbol> {
    let mut non_terminals: BTreeMap<&str, usize> = BTreeMap::new();
    let mut terminals = BTreeMap::new();
    for item in set.all_items() {
        match item.symbol_after_dot(grammar) {
            Some(Symbol::NonTerminal(nt)) => {
                non_terminals.insert(&grammar.non_terminal(nt).name, nt);
            }
            Some(t @ Symbol::Terminal(range)) => {
                terminals.insert((range.start, range.end), t);
            }
            None => {}
        }
    }
    non_terminals
        .into_values()
        .map(Symbol::NonTerminal)
        .chain(terminals.into_values())
        .collect()
}

/// One state of the canonical LR(0) collection.
#[derive(Debug, Clone)]
pub struct Lr0State {
    pub items: ItemSet,
    pub transitions: Vec<(Symbol, usize)>,
}

/// The full canonical LR(0) collection, states numbered in discovery order
/// with state 0 the closure of `{(0, 0)}`.
pub struct Lr0Collection {
    pub states: Vec<Lr0State>,
}

pub fn build_canonical_collection(grammar: &Grammar) -> Lr0Collection {
    let start = closure(grammar, [LR0Item::new(0, 0)]);
    let mut states = vec![Lr0State {
        items: start,
        transitions: Vec::new(),
    }];
    let mut index_by_kernels: BTreeMap<Vec<LR0Item>, usize> = BTreeMap::new();
    index_by_kernels.insert(states[0].items.kernels.iter().copied().collect(), 0);

    let mut work_list = vec![0usize];
    while let Some(state_index) = work_list.pop() {
        let symbols = symbols_after_dot(grammar, &states[state_index].items);
        for symbol in symbols {
            let kernels = goto_kernels(grammar, &states[state_index].items, symbol);
            if kernels.is_empty() {
                continue;
            }
            let key: Vec<LR0Item> = {
                let mut k = kernels.clone();
                k.sort();
                k.dedup();
                k
            };
            let target = if let Some(&existing) = index_by_kernels.get(&key) {
                existing
            } else {
                let new_index = states.len();
                let set = closure(grammar, kernels);
                states.push(Lr0State {
                    items: set,
                    transitions: Vec::new(),
                });
                index_by_kernels.insert(key, new_index);
                work_list.push(new_index);
                new_index
            };
            states[state_index].transitions.push((symbol, target));
        }
    }

    Lr0Collection { states }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{NonTerminal, Rule};

    /// `S' -> A`, `A -> 'x' A | 'y'`.
    fn grammar() -> Grammar {
        Grammar {
            non_terminals: vec![
                NonTerminal { index: 0, name: "S'".into(), rules: vec![0] },
                NonTerminal { index: 1, name: "A".into(), rules: vec![1, 2] },
            ],
            rules: vec![
                Rule { index: 0, non_terminal: 0, symbols: vec![Symbol::NonTerminal(1)], generated: false },
                Rule {
                    index: 1,
                    non_terminal: 1,
                    symbols: vec![
                        Symbol::Terminal(crate::grammar::Terminal::single('x' as u32)),
                        Symbol::NonTerminal(1),
                    ],
                    generated: false,
                },
                Rule {
                    index: 2,
                    non_terminal: 1,
                    symbols: vec![Symbol::Terminal(crate::grammar::Terminal::single('y' as u32))],
                    generated: false,
                },
            ],
        }
    }

    #[test]
    fn closure_expands_the_non_terminal_after_the_dot() {
        let grammar = grammar();
        let set = closure(&grammar, [LR0Item::new(0, 0)]);
        assert!(set.non_kernels.contains(&LR0Item::new(1, 0)));
        assert!(set.non_kernels.contains(&LR0Item::new(2, 0)));
    }

    #[test]
    fn symbols_after_dot_orders_non_terminals_by_name_then_terminals_by_range() {
        let grammar = grammar();
        let set = closure(&grammar, [LR0Item::new(0, 0)]);
        let symbols = symbols_after_dot(&grammar, &set);
        assert_eq!(
            symbols,
            vec![
                Symbol::NonTerminal(1),
                Symbol::Terminal(crate::grammar::Terminal::single('x' as u32)),
                Symbol::Terminal(crate::grammar::Terminal::single('y' as u32)),
            ]
        );
    }

    #[test]
    fn canonical_collection_is_deterministic_across_rebuilds() {
        let grammar = grammar();
        let first = build_canonical_collection(&grammar);
        let second = build_canonical_collection(&grammar);

        assert_eq!(first.states.len(), second.states.len());
        for (a, b) in first.states.iter().zip(second.states.iter()) {
            let kernels_a: Vec<_> = a.items.kernels.iter().copied().collect();
            let kernels_b: Vec<_> = b.items.kernels.iter().copied().collect();
            assert_eq!(kernels_a, kernels_b);
            assert_eq!(a.transitions, b.transitions);
        }
    }
}
