use super::{State, StateEdge, StateTransitions, Table};
use crate::grammar::{Grammar, Symbol, Terminal};
use crate::lalr::Lalr;
use crate::lr0::Lr0Collection;
use crate::{BuildConfig, ConflictError, Log};
use std::collections::BTreeMap;

/// Compact the LR(0) canonical collection plus LALR lookaheads into a
/// [Table]. Shift/reduce or reduce/reduce collisions on the same lookahead
/// terminal are reported as a [ConflictError] rather than silently resolved.
pub fn build(
    grammar: Grammar,
    lr0: &Lr0Collection,
    lalr: &Lalr,
    config: &BuildConfig,
) -> Result<Table, ConflictError> {
    let mut transitions_pool: Vec<StateTransitions> = Vec::new();
    let mut pool_index: BTreeMap<Vec<(u32, StateEdge)>, usize> = BTreeMap::new();
    let mut states = Vec::with_capacity(lr0.states.len());

    for (state_index, lr0_state) in lr0.states.iter().enumerate() {
        let mut edges: BTreeMap<Terminal, StateEdge> = BTreeMap::new();
        let mut gotos: BTreeMap<usize, usize> = BTreeMap::new();

        for &(symbol, target) in &lr0_state.transitions {
            match symbol {
                Symbol::NonTerminal(nt) => {
                    gotos.insert(nt, target);
                }
                Symbol::Terminal(terminal) => {
                    insert_edge(
                        &mut edges,
                        terminal,
                        StateEdge::Shift(target),
                        state_index,
                        config,
                    )?;
                }
            }
        }

        for &kernel in &lr0_state.items.kernels {
            if kernel.is_complete(&grammar) {
                let lookaheads = lalr.lookaheads(state_index, kernel);
                for terminal in lookaheads {
                    insert_edge(
                        &mut edges,
                        terminal,
                        StateEdge::Reduce(kernel.rule),
                        state_index,
                        config,
                    )?;
                }
            }
        }

        let mut direct_edges = BTreeMap::new();
        let mut range_edges = Vec::new();
        for (terminal, edge) in edges {
            if terminal.is_single() {
                direct_edges.insert(terminal.start, edge);
            } else {
                range_edges.push((terminal, edge));
            }
        }
        range_edges.sort_by_key(|(t, _)| (t.start, t.end));

        let transitions = StateTransitions {
            direct_edges,
            range_edges,
        };
        let flat_key: Vec<(u32, StateEdge)> = transitions
            .direct_edges
            .iter()
            .map(|(k, v)| (*k, *v))
            .chain(transitions.range_edges.iter().map(|(t, v)| (t.start, *v)))
            .collect();
        let transitions_index = if let Some(&existing) = pool_index.get(&flat_key) {
            existing
        } else {
            let index = transitions_pool.len();
            transitions_pool.push(transitions);
            pool_index.insert(flat_key, index);
            index
        };

        let provenance = lr0
            .states
            .iter()
            .flat_map(|s| s.transitions.iter())
            .find(|(_, target)| *target == state_index)
            .map(|(symbol, _)| *symbol);

        states.push(State {
            transitions: transitions_index,
            gotos,
            provenance,
        });
    }

    if config.log().at_least(Log::Result(())) {
        println!(
            "[{}; table]: {} states, {} shared transition sets",
            config.log(),
            states.len(),
            transitions_pool.len()
        );
    }

    Ok(Table {
        grammar,
        states,
        transitions_pool,
    })
}

fn insert_edge(
    edges: &mut BTreeMap<Terminal, StateEdge>,
    terminal: Terminal,
    edge: StateEdge,
    state: usize,
    config: &BuildConfig,
) -> Result<(), ConflictError> {
    match edges.get(&terminal) {
        Some(existing) if *existing != edge => Err(ConflictError::new(
            state,
            config.stringify(terminal.start),
            format!(
                "conflicting {:?} vs {:?} on terminal [{}, {}]",
                existing, edge, terminal.start, terminal.end
            ),
        )),
        _ => {
            edges.insert(terminal, edge);
            Ok(())
        }
    }
}
