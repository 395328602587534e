use crate::{BuildError, ConflictError, GrammarError};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: String, message: String) -> Self {
        Self { what, message }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}

impl ConflictError {
    pub fn new(state: usize, terminal: String, message: String) -> Self {
        Self {
            state,
            terminal,
            message,
        }
    }
}

impl Display for ConflictError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConflictError: not LALR(1) in state {} on '{}' - {}",
            self.state, self.terminal, self.message
        )
    }
}

impl std::error::Error for ConflictError {}

impl From<GrammarError> for BuildError {
    fn from(err: GrammarError) -> Self {
        BuildError::Grammar(err)
    }
}

impl From<ConflictError> for BuildError {
    fn from(err: ConflictError) -> Self {
        BuildError::Conflict(err)
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Grammar(err) => write!(f, "{}", err),
            BuildError::Conflict(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for BuildError {}
