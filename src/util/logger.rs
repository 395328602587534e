use std::fmt::{Display, Formatter};

use super::Log;

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Order of the log level, used to compare against a configured threshold.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }

    pub fn at_least(&self, threshold: Log<()>) -> bool {
        self.order() >= threshold.order()
    }
}

impl<T: Clone> Log<T> {
    pub fn label(&self) -> Option<T> {
        match self {
            Log::None => None,
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                Some(s.clone())
            }
        }
    }
}
