//! FIRST-set and nullability fixpoint over a [Grammar]'s non-terminals.
use crate::grammar::{Grammar, Symbol, Terminal};
use std::collections::BTreeSet;

/// Per-non-terminal FIRST sets and nullability, computed once per [Grammar]
/// and shared read-only by the item-set and lookahead engines.
#[derive(Debug, Clone)]
pub struct GrammarSets {
    first: Vec<BTreeSet<Terminal>>,
    nullable: Vec<bool>,
}

impl GrammarSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let n = grammar.non_terminal_count();
        let mut first: Vec<BTreeSet<Terminal>> = vec![BTreeSet::new(); n];
        let mut nullable = vec![false; n];

        loop {
            let mut changed = false;
            for rule in &grammar.rules {
                let lhs = rule.non_terminal;
                let mut rhs_nullable = true;
                for symbol in &rule.symbols {
                    match symbol {
                        Symbol::Terminal(t) => {
                            if first[lhs].insert(*t) {
                                changed = true;
                            }
                            rhs_nullable = false;
                            break;
                        }
                        Symbol::NonTerminal(nt) => {
                            let additions: Vec<Terminal> = first[*nt].iter().copied().collect();
                            for t in additions {
                                if first[lhs].insert(t) {
                                    changed = true;
                                }
                            }
                            if !nullable[*nt] {
                                rhs_nullable = false;
                                break;
                            }
                        }
                    }
                }
                if rhs_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        Self { first, nullable }
    }

    pub fn first(&self, non_terminal: usize) -> &BTreeSet<Terminal> {
        &self.first[non_terminal]
    }

    pub fn is_nullable(&self, non_terminal: usize) -> bool {
        self.nullable[non_terminal]
    }

    /// FIRST of a symbol sequence, following nullable prefixes. `tail` is
    /// appended if the whole sequence is nullable (used by LR(1) closure to
    /// compute FIRST(beta a) for a trailing lookahead `a`).
    pub fn first_of_sequence(&self, symbols: &[Symbol], tail: Terminal) -> BTreeSet<Terminal> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            match symbol {
                Symbol::Terminal(t) => {
                    result.insert(*t);
                    return result;
                }
                Symbol::NonTerminal(nt) => {
                    result.extend(self.first[*nt].iter().copied());
                    if !self.nullable[*nt] {
                        return result;
                    }
                }
            }
        }
        result.insert(tail);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::NonTerminal;

    /// `S' -> A`, `A -> 'x' B | 'y'`, `B -> <empty> | 'z'`.
    fn grammar() -> Grammar {
        Grammar {
            non_terminals: vec![
                NonTerminal { index: 0, name: "S'".into(), rules: vec![0] },
                NonTerminal { index: 1, name: "A".into(), rules: vec![1, 2] },
                NonTerminal { index: 2, name: "B".into(), rules: vec![3, 4] },
            ],
            rules: vec![
                crate::grammar::Rule { index: 0, non_terminal: 0, symbols: vec![Symbol::NonTerminal(1)], generated: false },
                crate::grammar::Rule {
                    index: 1,
                    non_terminal: 1,
                    symbols: vec![Symbol::Terminal(Terminal::single('x' as u32)), Symbol::NonTerminal(2)],
                    generated: false,
                },
                crate::grammar::Rule {
                    index: 2,
                    non_terminal: 1,
                    symbols: vec![Symbol::Terminal(Terminal::single('y' as u32))],
                    generated: false,
                },
                crate::grammar::Rule { index: 3, non_terminal: 2, symbols: vec![], generated: false },
                crate::grammar::Rule {
                    index: 4,
                    non_terminal: 2,
                    symbols: vec![Symbol::Terminal(Terminal::single('z' as u32))],
                    generated: false,
                },
            ],
        }
    }

    #[test]
    fn nullable_follows_only_the_empty_rule() {
        let sets = GrammarSets::compute(&grammar());
        assert!(sets.is_nullable(2), "B has an empty production");
        assert!(!sets.is_nullable(1), "every A rule consumes a terminal");
        assert!(!sets.is_nullable(0));
    }

    #[test]
    fn first_propagates_through_a_nullable_tail() {
        let sets = GrammarSets::compute(&grammar());
        let first_b: Vec<u32> = sets.first(2).iter().map(|t| t.start).collect();
        assert_eq!(first_b, vec!['z' as u32]);

        let first_a: Vec<u32> = sets.first(1).iter().map(|t| t.start).collect();
        assert_eq!(first_a, vec!['x' as u32, 'y' as u32]);

        // S' -> A only, so FIRST(S') is exactly FIRST(A).
        assert_eq!(sets.first(0), sets.first(1));
    }

    #[test]
    fn first_of_sequence_appends_tail_only_when_nullable() {
        let sets = GrammarSets::compute(&grammar());
        let eof = Terminal::eof();

        // [B] is nullable, so the tail terminal joins B's own FIRST set.
        let seq = sets.first_of_sequence(&[Symbol::NonTerminal(2)], eof);
        assert!(seq.contains(&Terminal::single('z' as u32)));
        assert!(seq.contains(&eof));

        // [A] is never nullable, so the tail must not appear.
        let seq = sets.first_of_sequence(&[Symbol::NonTerminal(1)], eof);
        assert!(!seq.contains(&eof));
    }
}
