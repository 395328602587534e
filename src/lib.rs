//! lalr-pt is a library to compile a grammar described as a tree of rule
//! productions into an LALR(1) shift/reduce table, and to drive that table
//! against an input stream with a step-driven recognizer.
//!
//! # Overview
//!
//! Parser generators usually compile a grammar written in their own Domain
//! Specific Language (DSL) into parser code for a target runtime language.
//! This library instead exposes the grammar as a small reference-counted
//! entity/component graph ([tower]): a root node whose children are rule
//! nodes, each carrying a `Rule` component, with symbol children carrying a
//! `Reference`, `String`, or `Range` component. [GrammarBuilder] is a
//! convenience for building such a tree from Rust code.
//!
//! [Table::build] normalizes that tree into a [Grammar], computes FIRST and
//! nullability ([GrammarSets]), enumerates the LR(0) canonical collection,
//! discovers LALR(1) lookaheads via spontaneous generation plus propagation,
//! and compacts the result into a [Table]. A [Recognizer] then drives the
//! table against any [Stream] (a UTF-8 byte-string source, or another
//! recognizer layered underneath via [RecognizerStream]), yielding shift,
//! reduce, accept, and error events one [step](Recognizer::step) at a time.
//!
//! # Example
//!
//! ```
//! use lalr_pt::{GrammarBuilder, Table, Recognizer, Utf8Stream, StepResult};
//!
//! let mut builder = GrammarBuilder::new();
//! let a = builder.rule("A", false);
//! builder.string(a, "a");
//! let (tower, root, types) = builder.finish();
//!
//! let table = Table::build(&tower, root, types).unwrap();
//! let mut recognizer = Recognizer::new(&table, Utf8Stream::new(b"a"));
//!
//! loop {
//!     match recognizer.step() {
//!         StepResult::Accept { .. } => break,
//!         StepResult::ParseError { .. } | StepResult::StreamError { .. } => panic!("unexpected"),
//!         _ => {}
//!     }
//! }
//! ```
//!
//! # License
//! [lalr-pt](crate) is provided under the MIT OR Apache-2.0 license.

mod ast_node;
mod config;
mod error;
pub mod examples;
pub mod grammar;
mod item;
mod lalr;
mod lr0;
mod recognizer;
mod sets;
mod stream;
pub mod table;
pub mod tower;
pub mod util;

pub use ast_node::AstNode;
pub use config::{BuildConfig, DebugStringifier, ExternalResolver};
pub use grammar::{Grammar, GrammarBuilder, GrammarTypes, NonTerminal, Rule, Symbol, Terminal};
pub use item::{ItemSet, LR0Item, LR1Item};
pub use lalr::Lalr;
pub use lr0::Lr0Collection;
pub use recognizer::{Recognizer, StepResult, TERMINAL_LEAF};
pub use sets::GrammarSets;
pub use stream::{ReadOutcome, RecognizerStream, Stream, Utf8Stream};
pub use table::{State, StateEdge, StateTransitions};
pub use tower::{NodeId, Tower};
pub use util::{Code, Log, Position};

#[derive(Debug, Clone)]
/// An error returned when a grammar component tree cannot be normalized:
/// an empty grammar, an unresolved reference, or a malformed symbol node.
pub struct GrammarError {
    what: String,
    message: String,
}

#[derive(Debug, Clone)]
/// An error returned when table compaction finds a shift/reduce or
/// reduce/reduce collision on the same lookahead terminal — the grammar is
/// not LALR(1).
pub struct ConflictError {
    pub state: usize,
    pub terminal: String,
    pub message: String,
}

#[derive(Debug, Clone)]
/// The error type returned by [Table::build] and
/// [Table::build_with_config].
pub enum BuildError {
    Grammar(GrammarError),
    Conflict(ConflictError),
}

pub use table::Table;
