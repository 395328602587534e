use crate::util::Log;

/// Resolves a rule reference that does not match any interned non-terminal
/// name to an external terminal code. Returning `None` means the reference
/// is unresolved, a construction error.
pub type ExternalResolver<'a> = dyn Fn(&str) -> Option<u32> + 'a;

/// Produces a human-readable label for a terminal code, used only for
/// diagnostic printing; never consulted by table construction.
pub type DebugStringifier<'a> = dyn Fn(u32) -> Option<String> + 'a;

/// Caller-supplied knobs for [Table::build_with_config](crate::Table::build_with_config).
///
/// The default configuration is silent and resolves no external references,
/// matching the teacher crate's `DefaultParser::new` vs. its lower-level
/// `set_log`/`add_debug_production` debugging knobs.
#[derive(Default)]
pub struct BuildConfig<'a> {
    pub(crate) log: Log<&'static str>,
    pub(crate) resolver: Option<&'a ExternalResolver<'a>>,
    pub(crate) stringifier: Option<&'a DebugStringifier<'a>>,
}

impl<'a> BuildConfig<'a> {
    pub fn new() -> Self {
        Self {
            log: Log::None,
            resolver: None,
            stringifier: None,
        }
    }

    pub fn with_log(mut self, log: Log<&'static str>) -> Self {
        self.log = log;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a ExternalResolver<'a>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_stringifier(mut self, stringifier: &'a DebugStringifier<'a>) -> Self {
        self.stringifier = Some(stringifier);
        self
    }

    pub fn log(&self) -> Log<&'static str> {
        self.log
    }

    pub fn stringify(&self, code: u32) -> String {
        match self.stringifier {
            Some(f) => f(code).unwrap_or_else(|| format!("{}", code)),
            None => format!("{}", code),
        }
    }
}
