//! Worked grammars exercising the table-construction and recognizer
//! pipeline end to end. Each builder here returns a ready-to-run [Table]; the
//! `__tests__` module drives them against concrete input.
use crate::grammar::GrammarBuilder;
use crate::tower::{NodeId, Tower};
use crate::{BuildError, Table};

#[cfg(test)]
mod __tests__;

/// `A -> "a"`. The smallest grammar with one rule and one terminal.
pub fn minimal_terminal() -> Result<Table, BuildError> {
    let mut builder = GrammarBuilder::new();
    let a = builder.rule("A", false);
    builder.string(a, "a");
    let (tower, root, types) = builder.finish();
    Table::build(&tower, root, types)
}

/// The textbook left-recursive expression grammar:
/// ```text
/// E -> E '+' T | T
/// T -> T '*' F | F
/// F -> digit
/// ```
/// Ambiguous under SLR(1) only in the sense of needing two non-terminal
/// levels to get precedence right; included because its action table has a
/// shift/reduce decision on `+` and `*` that a naive table builder gets
/// wrong if FIRST/follow aren't threaded correctly.
pub fn arithmetic_expression() -> Result<Table, BuildError> {
    let mut builder = GrammarBuilder::new();

    let e_plus = builder.rule("E", false);
    builder.reference(e_plus, "E");
    builder.string(e_plus, "+");
    builder.reference(e_plus, "T");

    let e_t = builder.rule("E", false);
    builder.reference(e_t, "T");

    let t_times = builder.rule("T", false);
    builder.reference(t_times, "T");
    builder.string(t_times, "*");
    builder.reference(t_times, "F");

    let t_f = builder.rule("T", false);
    builder.reference(t_f, "F");

    let f = builder.rule("F", false);
    builder.range(f, '0', '9');

    let (tower, root, types) = builder.finish();
    Table::build(&tower, root, types)
}

/// The canonical example of a grammar that is LALR(1) but not SLR(1):
/// ```text
/// S -> L '=' R | R
/// L -> '*' R | i
/// R -> L
/// ```
/// An SLR(1) table built from FOLLOW(R) alone would see `=` in both the
/// `R -> L .` reduction and the `L -> * R .` shift-continuation contexts and
/// report a spurious conflict; LALR(1) keeps the two `R -> L` reductions'
/// lookaheads apart by state.
pub fn non_slr_assignment() -> Result<Table, BuildError> {
    let mut builder = GrammarBuilder::new();

    let s_assign = builder.rule("S", false);
    builder.reference(s_assign, "L");
    builder.string(s_assign, "=");
    builder.reference(s_assign, "R");

    let s_r = builder.rule("S", false);
    builder.reference(s_r, "R");

    let l_star = builder.rule("L", false);
    builder.string(l_star, "*");
    builder.reference(l_star, "R");

    let l_i = builder.rule("L", false);
    builder.string(l_i, "i");

    let r = builder.rule("R", false);
    builder.reference(r, "L");

    let (tower, root, types) = builder.finish();
    Table::build(&tower, root, types)
}

/// `A -> 'x' B`, `B -> <empty> | B 'y'`, exercising a nullable non-terminal
/// through FIRST and closure. Left-recursive rather than
/// `X -> 'x' Y Y` with an independently nullable `Y` in each position: that
/// shape lets `xy` derive both as `x . y . <empty>` and `x . <empty> . y`,
/// which is genuinely ambiguous and would be rejected as a reduce/reduce
/// conflict, not accepted.
pub fn empty_production() -> Result<Table, BuildError> {
    let mut builder = GrammarBuilder::new();

    let a = builder.rule("A", false);
    builder.string(a, "x");
    builder.reference(a, "B");

    builder.rule("B", false);

    let b_y = builder.rule("B", false);
    builder.reference(b_y, "B");
    builder.string(b_y, "y");

    let (tower, root, types) = builder.finish();
    Table::build(&tower, root, types)
}

/// `Number -> Digit Digit`, `Digit -> ['0'-'9']`, exercising a ranged
/// terminal rather than a fixed string.
pub fn two_digit_number() -> Result<Table, BuildError> {
    let mut builder = GrammarBuilder::new();

    let number = builder.rule("Number", false);
    builder.reference(number, "Digit");
    builder.reference(number, "Digit");

    let digit = builder.rule("Digit", false);
    builder.range(digit, '0', '9');

    let (tower, root, types) = builder.finish();
    Table::build(&tower, root, types)
}

/// Build a grammar component tree without consuming it, for tests that want
/// direct access to the underlying [Tower].
pub fn build_tree(describe: impl FnOnce(&mut GrammarBuilder)) -> (Tower, NodeId, crate::GrammarTypes) {
    let mut builder = GrammarBuilder::new();
    describe(&mut builder);
    builder.finish()
}
