use super::*;
use crate::grammar::GrammarBuilder;
use crate::tower::Tower;
use crate::{BuildConfig, BuildError, Recognizer, RecognizerStream, StepResult, Stream, Table, Utf8Stream};
use rstest::rstest;

fn run(table: &Table, input: &[u8]) -> StepResult {
    let mut recognizer = Recognizer::new(table, Utf8Stream::new(input));
    loop {
        match recognizer.step() {
            StepResult::Shift { .. } | StepResult::Reduce { .. } => continue,
            terminal => return terminal,
        }
    }
}

fn accepts(table: &Table, input: &[u8]) -> bool {
    matches!(run(table, input), StepResult::Accept { .. })
}

#[rstest]
#[case(b"a", true)]
#[case(b"b", false)]
#[case(b"", false)]
fn minimal_terminal_accepts_only_a(#[case] input: &[u8], #[case] expected: bool) {
    let table = minimal_terminal().unwrap();
    assert_eq!(accepts(&table, input), expected);
}

#[test]
fn minimal_terminal_reports_parse_error_on_b() {
    let table = minimal_terminal().unwrap();
    match run(&table, b"b") {
        StepResult::ParseError { terminal, pointer, .. } => {
            assert_eq!(terminal, 'b' as u32);
            assert_eq!(pointer, 0);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[rstest]
#[case(b"1*1+1")]
#[case(b"1+1*1")]
#[case(b"9")]
fn arithmetic_expression_parses_precedence_correctly(#[case] input: &[u8]) {
    let table = arithmetic_expression().unwrap();
    let node = match run(&table, input) {
        StepResult::Accept { node } => node,
        other => panic!("expected accept, got {:?}", other),
    };
    assert_eq!(node.start, 0);
    assert_eq!(node.end, input.len());
}

#[test]
fn non_slr_assignment_builds_without_conflict_and_parses() {
    let table = non_slr_assignment().unwrap();
    assert!(accepts(&table, b"**i=*i"));
    assert!(accepts(&table, b"i"));
    assert!(!accepts(&table, b"*i=*i="));
}

#[rstest]
#[case(b"x")]
#[case(b"xy")]
#[case(b"xyy")]
#[case(b"xyyy")]
fn empty_production_accepts_any_number_of_trailing_ys(#[case] input: &[u8]) {
    let table = empty_production().unwrap();
    assert!(accepts(&table, input));
}

#[test]
fn empty_production_rejects_missing_leading_x() {
    let table = empty_production().unwrap();
    assert!(!accepts(&table, b"yy"));
    assert!(!accepts(&table, b""));
}

#[test]
fn two_digit_number_parses_range_terminal() {
    let table = two_digit_number().unwrap();
    assert!(accepts(&table, b"42"));
    assert!(!accepts(&table, b"4"));
    assert!(!accepts(&table, b"4a"));
}

#[test]
fn ambiguous_dangling_else_grammar_reports_conflict() {
    let mut builder = GrammarBuilder::new();

    let if_only = builder.rule("Stmt", false);
    builder.string(if_only, "i");
    builder.reference(if_only, "Stmt");

    let if_else = builder.rule("Stmt", false);
    builder.string(if_else, "i");
    builder.reference(if_else, "Stmt");
    builder.string(if_else, "e");
    builder.reference(if_else, "Stmt");

    let atom = builder.rule("Stmt", false);
    builder.string(atom, "a");

    let (tower, root, types) = builder.finish();

    match Table::build(&tower, root, types) {
        Err(BuildError::Conflict(conflict)) => {
            assert!(conflict.message.contains("conflicting"));
        }
        other => panic!("expected a conflict error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn utf8_stream_reports_invalid_byte_without_advancing() {
    // A lone continuation byte (0x80) is never valid at the start of a
    // UTF-8 sequence.
    let mut stream = Utf8Stream::new(&[b'a', 0x80, b'b']);
    assert!(matches!(stream.read(), crate::ReadOutcome::Token { id, .. } if id == 'a' as u32));
    assert!(matches!(stream.read(), crate::ReadOutcome::Invalid(1)));
    assert!(matches!(stream.read(), crate::ReadOutcome::Invalid(1)));
}

#[test]
fn layered_recognizer_stream_feeds_two_digit_tokens_into_outer_grammar() {
    // Inner "lexer" grammar: a list of two-digit numbers, each reduction of
    // `Num` flagged generated so it surfaces as a terminal for whoever reads
    // this recognizer as a Stream.
    let mut inner_builder = GrammarBuilder::new();
    let tokens_cons = inner_builder.rule("Tokens", false);
    inner_builder.reference(tokens_cons, "Tokens");
    inner_builder.reference(tokens_cons, "Num");
    inner_builder.rule("Tokens", false);

    let num = inner_builder.rule("Num", true);
    inner_builder.reference(num, "Digit");
    inner_builder.reference(num, "Digit");

    let digit = inner_builder.rule("Digit", false);
    inner_builder.range(digit, '0', '9');

    let (inner_tower, inner_root, inner_types) = inner_builder.finish();
    let inner_table = Table::build(&inner_tower, inner_root, inner_types).unwrap();

    let num_rule = inner_table
        .grammar
        .rules
        .iter()
        .find(|rule| rule.generated)
        .expect("inner grammar has exactly one generated rule")
        .index;

    // Outer grammar: two NUM tokens back to back, NUM resolved externally to
    // the inner grammar's generated rule index.
    let mut outer_builder = GrammarBuilder::new();
    let pair = outer_builder.rule("Pair", false);
    outer_builder.reference(pair, "NUM");
    outer_builder.reference(pair, "NUM");
    let (outer_tower, outer_root, outer_types) = outer_builder.finish();

    let resolver = move |name: &str| if name == "NUM" { Some(num_rule as u32) } else { None };
    let config = BuildConfig::new().with_resolver(&resolver);
    let outer_table =
        Table::build_with_config(&outer_tower, outer_root, outer_types, &config).unwrap();

    let inner_recognizer = Recognizer::new(&inner_table, Utf8Stream::new(b"4212"));
    let layered = RecognizerStream::new(inner_recognizer);
    let mut outer_recognizer = Recognizer::new(&outer_table, layered);

    loop {
        match outer_recognizer.step() {
            StepResult::Accept { .. } => return,
            StepResult::ParseError { .. } | StepResult::StreamError { .. } => {
                panic!("layered parse unexpectedly failed")
            }
            StepResult::Halted => panic!("halted before accepting"),
            _ => {}
        }
    }
}

#[test]
fn tower_reference_counts_and_attach_detach() {
    let mut tower = Tower::new();
    let parent = tower.create();
    let child = tower.create();

    assert_eq!(tower.ref_count(child), 1);
    tower.attach(parent, Some("only"), child);
    assert_eq!(tower.ref_count(child), 2);
    // The creator hands ownership to the parent by dropping its own
    // reference, the idiom `GrammarBuilder` follows for every node it
    // attaches.
    tower.release(child);
    assert_eq!(tower.ref_count(child), 1);

    let other = tower.create();
    tower.attach(parent, Some("only"), other);
    tower.release(other);
    // Replacing a named child released the prior occupant entirely.
    assert!(!tower.contains(child));
    assert_eq!(tower.named_child(parent, "only"), Some(other));

    tower.release(parent);
    assert!(!tower.contains(parent));
    assert!(!tower.contains(other), "releasing the parent must release its children");
}

#[test]
fn tower_node_and_component_counters_return_to_baseline_after_full_release() {
    let (mut tower, root, types) = build_tree(|builder| {
        let rule = builder.rule("Only", false);
        builder.string(rule, "z");
        builder.reference(rule, "Only");
        builder.range(rule, 'a', 'b');
    });

    assert!(tower.live_node_count() > 0);
    assert!(tower.live_component_count() > 0);

    // Release the whole tree, then the shared type tokens themselves (the
    // one reference `GrammarTypes::create` never hands off to anyone).
    tower.release(root);
    tower.release(types.rule);
    tower.release(types.symbol);

    assert_eq!(tower.live_node_count(), 0);
    assert_eq!(tower.live_component_count(), 0);
}

#[test]
fn build_tree_helper_round_trips_through_grammar_builder() {
    let (tower, root, types) = build_tree(|builder| {
        let rule = builder.rule("Only", false);
        builder.string(rule, "z");
    });
    let table = Table::build(&tower, root, types).unwrap();
    assert!(accepts(&table, b"z"));
}
