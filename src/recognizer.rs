//! The table-driven recognizer: a state stack, one unit of read-ahead, and a
//! `step` that shifts, reduces, accepts, or halts on error.
use crate::ast_node::AstNode;
use crate::stream::{ReadOutcome, Stream};
use crate::table::{StateEdge, Table};

/// Sentinel `rule` value on leaf [AstNode]s produced for shifted terminals
/// (as opposed to reduced non-terminals).
pub const TERMINAL_LEAF: usize = usize::MAX;

/// The observable outcome of one [Recognizer::step] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Shift { state: usize },
    Reduce { rule: usize, node: AstNode, state: usize },
    Accept { node: AstNode },
    ParseError { state: usize, terminal: u32, pointer: usize },
    StreamError { pointer: usize },
    /// Stepped again after halting; the stack is left untouched.
    Halted,
}

/// Drives a [Stream] against a [Table]. Never consumes more than one unit of
/// lookahead; reads happen only on construction and on shift.
pub struct Recognizer<'t, S: Stream> {
    table: &'t Table,
    stream: S,
    stack: Vec<usize>,
    nodes: Vec<AstNode>,
    current: ReadOutcome,
    running: bool,
}

impl<'t, S: Stream> Recognizer<'t, S> {
    pub fn new(table: &'t Table, mut stream: S) -> Self {
        let current = stream.read();
        Self {
            table,
            stream,
            stack: vec![0],
            nodes: Vec::new(),
            current,
            running: true,
        }
    }

    pub fn table(&self) -> &Table {
        self.table
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_position(&self) -> usize {
        match &self.current {
            ReadOutcome::Token { start, .. } => *start,
            ReadOutcome::Invalid(pointer) => *pointer,
        }
    }

    pub fn step(&mut self) -> StepResult {
        if !self.running {
            return StepResult::Halted;
        }

        let (id, start, length) = match &self.current {
            ReadOutcome::Token { id, start, length } => (*id, *start, *length),
            ReadOutcome::Invalid(pointer) => {
                self.running = false;
                return StepResult::StreamError { pointer: *pointer };
            }
        };

        let top = *self.stack.last().expect("stack never empty");
        let edge = self.table.state_transitions(top).lookup(id);

        match edge {
            None => {
                self.running = false;
                StepResult::ParseError {
                    state: top,
                    terminal: id,
                    pointer: start,
                }
            }
            Some(StateEdge::Shift(target)) => {
                self.stack.push(target);
                self.nodes
                    .push(AstNode::leaf(TERMINAL_LEAF, start, start + length));
                self.current = self.stream.read();
                StepResult::Shift { state: target }
            }
            Some(StateEdge::Reduce(rule_index)) => {
                let rule = self.table.grammar.rule(rule_index);
                let len = rule.symbols.len();
                let children = if len == 0 {
                    Vec::new()
                } else {
                    let split = self.stack.len() - len;
                    self.stack.truncate(split);
                    self.nodes.split_off(self.nodes.len() - len)
                };
                let (node_start, node_end) = match (children.first(), children.last()) {
                    (Some(first), Some(last)) => (first.start, last.end),
                    _ => (start, start),
                };
                let node = AstNode::new(rule_index, node_start, node_end, children);

                if rule_index == 0 {
                    self.running = false;
                    return StepResult::Accept { node };
                }

                let after = *self.stack.last().expect("stack never empty after reduce");
                let target = *self
                    .table
                    .states
                    .get(after)
                    .and_then(|s| s.gotos.get(&rule.non_terminal))
                    .expect("missing goto after reduction: table construction invariant violated");
                self.stack.push(target);
                self.nodes.push(node.clone());
                StepResult::Reduce {
                    rule: rule_index,
                    node,
                    state: target,
                }
            }
        }
    }
}
