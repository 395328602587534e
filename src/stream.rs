//! The input-stream abstraction consumed by [Recognizer](crate::Recognizer):
//! a single `read` contract, with a UTF-8 decoding implementation and a
//! recognizer-backed implementation used to layer a lexical table beneath a
//! syntactic one.
use crate::grammar::EOF;
use crate::recognizer::{Recognizer, StepResult};

/// One unit read from a [Stream]. `id == EOF` with `length == 0` signals
/// exhaustion; every subsequent read must also report exhaustion.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    Token {
        id: u32,
        start: usize,
        length: usize,
    },
    /// Malformed input at `start`; the stream does not advance on its own.
    Invalid(usize),
}

pub trait Stream {
    fn read(&mut self) -> ReadOutcome;
}

/// Decodes one UTF-8 code point per read. A malformed byte sequence is
/// reported once as [ReadOutcome::Invalid] without advancing past it.
pub struct Utf8Stream<'c> {
    code: &'c [u8],
    pointer: usize,
}

impl<'c> Utf8Stream<'c> {
    pub fn new(code: &'c [u8]) -> Self {
        Self { code, pointer: 0 }
    }
}

impl<'c> Stream for Utf8Stream<'c> {
    fn read(&mut self) -> ReadOutcome {
        if self.pointer >= self.code.len() {
            return ReadOutcome::Token {
                id: EOF,
                start: self.pointer,
                length: 0,
            };
        }
        match std::str::from_utf8(&self.code[self.pointer..]) {
            Ok(valid) => {
                let ch = valid.chars().next().expect("non-empty remainder");
                let start = self.pointer;
                let length = ch.len_utf8();
                self.pointer += length;
                ReadOutcome::Token {
                    id: ch as u32,
                    start,
                    length,
                }
            }
            Err(err) => {
                if err.valid_up_to() > 0 {
                    let valid = std::str::from_utf8(&self.code[self.pointer..self.pointer + err.valid_up_to()])
                        .expect("prefix validated by from_utf8");
                    let ch = valid.chars().next().expect("non-empty remainder");
                    let start = self.pointer;
                    let length = ch.len_utf8();
                    self.pointer += length;
                    ReadOutcome::Token {
                        id: ch as u32,
                        start,
                        length,
                    }
                } else {
                    ReadOutcome::Invalid(self.pointer)
                }
            }
        }
    }
}

/// Drives an inner [Recognizer] and surfaces its reductions of
/// [generated](crate::grammar::Rule::generated) rules as terminals for an
/// outer grammar, the lexer/parser layering mechanism.
pub struct RecognizerStream<'t, S: Stream> {
    inner: Recognizer<'t, S>,
}

impl<'t, S: Stream> RecognizerStream<'t, S> {
    pub fn new(inner: Recognizer<'t, S>) -> Self {
        Self { inner }
    }
}

impl<'t, S: Stream> Stream for RecognizerStream<'t, S> {
    fn read(&mut self) -> ReadOutcome {
        loop {
            match self.inner.step() {
                StepResult::Reduce { rule, node, .. } => {
                    if self.inner.table().grammar.rule(rule).generated {
                        return ReadOutcome::Token {
                            id: rule as u32,
                            start: node.start,
                            length: node.end - node.start,
                        };
                    }
                }
                StepResult::Accept { .. } => {
                    return ReadOutcome::Token {
                        id: EOF,
                        start: self.inner.last_position(),
                        length: 0,
                    };
                }
                StepResult::Shift { .. } => {}
                StepResult::ParseError { pointer, .. } => return ReadOutcome::Invalid(pointer),
                StepResult::StreamError { pointer } => return ReadOutcome::Invalid(pointer),
                StepResult::Halted => {
                    return ReadOutcome::Token {
                        id: EOF,
                        start: self.inner.last_position(),
                        length: 0,
                    }
                }
            }
        }
    }
}
