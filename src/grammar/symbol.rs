/// Sentinel terminal code marking end-of-input. Distinct from every
/// representable input code and from [LOOKAHEAD_MARKER].
pub const EOF: u32 = u32::MAX;

/// Sentinel terminal used only during LALR lookahead discovery (the `#`
/// marker of the DeRemer-Pennello algorithm). Must never survive into a
/// built [Table](crate::Table).
pub const LOOKAHEAD_MARKER: u32 = u32::MAX - 1;

/// An inclusive code-point range. `start == end` for a single-code terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal {
    pub start: u32,
    pub end: u32,
}

impl Terminal {
    pub fn single(code: u32) -> Self {
        Self {
            start: code,
            end: code,
        }
    }

    pub fn range(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn eof() -> Self {
        Self::single(EOF)
    }

    pub fn lookahead_marker() -> Self {
        Self::single(LOOKAHEAD_MARKER)
    }

    pub fn contains(&self, code: u32) -> bool {
        code >= self.start && code <= self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// A symbol appearing on the right-hand side of a rule: either a reference to
/// a non-terminal (by its interned index) or a terminal code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    NonTerminal(usize),
    Terminal(Terminal),
}

impl Symbol {
    pub fn as_non_terminal(&self) -> Option<usize> {
        match self {
            Symbol::NonTerminal(i) => Some(*i),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<Terminal> {
        match self {
            Symbol::Terminal(t) => Some(*t),
            Symbol::NonTerminal(_) => None,
        }
    }
}
