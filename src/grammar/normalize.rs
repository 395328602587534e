use super::{Grammar, NonTerminal, Rule, Symbol, Terminal};
use crate::tower::{DestructorThunk, NodeId, Tower};
use crate::{BuildConfig, GrammarError, Log};
use indexmap::IndexMap;

/// A component holds a strong reference on its own `type_id` (acquired by
/// [Tower::create_component]); this destructor gives that reference back up
/// when the host node dies, so a type token's count never outlives its last
/// component.
fn release_type_on_drop(type_id: NodeId) -> DestructorThunk {
    Box::new(move |tower: &mut Tower, _id, _payload| {
        tower.release(type_id);
    })
}

struct RuleComponent {
    name: String,
    generated: bool,
}

enum SymbolComponent {
    Reference(String),
    String(Vec<u32>),
    Range(u32, u32),
}

/// Identity tokens for the two component kinds a grammar tree carries. A
/// component's type is itself a node handle (per the entity/component
/// model); these are created once and shared between whoever builds the
/// tree and [normalize], which reads it back out.
#[derive(Debug, Clone, Copy)]
pub struct GrammarTypes {
    pub rule: NodeId,
    pub symbol: NodeId,
}

impl GrammarTypes {
    pub fn create(tower: &mut Tower) -> Self {
        Self {
            rule: tower.create(),
            symbol: tower.create(),
        }
    }
}

/// Describes a grammar as a component tree: a root node whose children are
/// rule nodes, each carrying a `Rule` component and, as its own children,
/// symbol nodes each carrying exactly one of `Reference`, `String`, `Range`.
pub struct GrammarBuilder {
    tower: Tower,
    types: GrammarTypes,
    root: NodeId,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        let mut tower = Tower::new();
        let types = GrammarTypes::create(&mut tower);
        let root = tower.create();
        Self { tower, types, root }
    }

    /// Add a rule node named `name` as a child of the root and return its
    /// handle so symbols can be attached to it.
    pub fn rule(&mut self, name: &str, generated: bool) -> NodeId {
        let node = self.tower.create();
        self.tower.create_component(
            node,
            self.types.rule,
            || RuleComponent {
                name: name.to_string(),
                generated,
            },
            Some(release_type_on_drop(self.types.rule)),
        );
        self.tower.attach(self.root, None, node);
        self.tower.release(node);
        node
    }

    pub fn reference(&mut self, rule: NodeId, name: &str) -> NodeId {
        let node = self.tower.create();
        self.tower.create_component(
            node,
            self.types.symbol,
            || SymbolComponent::Reference(name.to_string()),
            Some(release_type_on_drop(self.types.symbol)),
        );
        self.tower.attach(rule, None, node);
        self.tower.release(node);
        node
    }

    pub fn string(&mut self, rule: NodeId, text: &str) -> NodeId {
        let node = self.tower.create();
        let codes: Vec<u32> = text.chars().map(|c| c as u32).collect();
        self.tower.create_component(
            node,
            self.types.symbol,
            || SymbolComponent::String(codes),
            Some(release_type_on_drop(self.types.symbol)),
        );
        self.tower.attach(rule, None, node);
        self.tower.release(node);
        node
    }

    pub fn range(&mut self, rule: NodeId, start: char, end: char) -> NodeId {
        let node = self.tower.create();
        self.tower.create_component(
            node,
            self.types.symbol,
            || SymbolComponent::Range(start as u32, end as u32),
            Some(release_type_on_drop(self.types.symbol)),
        );
        self.tower.attach(rule, None, node);
        self.tower.release(node);
        node
    }

    pub fn finish(self) -> (Tower, NodeId, GrammarTypes) {
        (self.tower, self.root, self.types)
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a grammar component tree rooted at `root` into a [Grammar].
///
/// See [GrammarBuilder] for the expected tree shape. Logs unresolved
/// references at [Log::Default] and interned counts at [Log::Verbose],
/// mirroring the teacher crate's `Log`-gated diagnostics during
/// tokenization.
pub fn normalize(
    tower: &Tower,
    root: NodeId,
    types: GrammarTypes,
    config: &BuildConfig,
) -> Result<Grammar, GrammarError> {
    let rule_nodes: Vec<NodeId> = tower.children(root).collect();
    if rule_nodes.is_empty() {
        return Err(GrammarError::new(
            "normalize".into(),
            "grammar must declare at least one rule".into(),
        ));
    }

    let mut non_terminal_index: IndexMap<String, usize> = IndexMap::new();
    non_terminal_index.insert("S'".to_string(), 0);

    for &node in &rule_nodes {
        let rc = tower
            .component::<RuleComponent>(node, types.rule)
            .ok_or_else(|| {
                GrammarError::new("normalize".into(), "rule node missing Rule component".into())
            })?;
        let next = non_terminal_index.len();
        non_terminal_index.entry(rc.name.clone()).or_insert(next);
    }

    let non_terminal_count = non_terminal_index.len();
    let mut non_terminals: Vec<NonTerminal> = (0..non_terminal_count)
        .map(|i| NonTerminal {
            index: i,
            name: String::new(),
            rules: Vec::new(),
        })
        .collect();
    for (name, &index) in non_terminal_index.iter() {
        non_terminals[index].name = name.clone();
    }

    let mut rules: Vec<Rule> = Vec::with_capacity(rule_nodes.len() + 1);
    rules.push(Rule {
        index: 0,
        non_terminal: 0,
        symbols: vec![Symbol::NonTerminal(1)],
        generated: false,
    });
    non_terminals[0].rules.push(0);

    for &node in &rule_nodes {
        let rc = tower.component::<RuleComponent>(node, types.rule).unwrap();
        let nt_index = non_terminal_index[&rc.name];
        let generated = rc.generated;
        let rule_index = rules.len();

        let mut symbols = Vec::new();
        for symbol_node in tower.children(node) {
            let sc = tower
                .component::<SymbolComponent>(symbol_node, types.symbol)
                .ok_or_else(|| {
                    GrammarError::new(
                        "normalize".into(),
                        "symbol node missing Reference/String/Range component".into(),
                    )
                })?;
            match sc {
                SymbolComponent::Reference(name) => {
                    if let Some(&target) = non_terminal_index.get(name) {
                        symbols.push(Symbol::NonTerminal(target));
                    } else if let Some(resolver) = config.resolver {
                        match resolver(name) {
                            Some(code) => symbols.push(Symbol::Terminal(Terminal::single(code))),
                            None => {
                                return Err(GrammarError::new(
                                    "normalize".into(),
                                    format!("unresolved reference '{}'", name),
                                ))
                            }
                        }
                    } else {
                        return Err(GrammarError::new(
                            "normalize".into(),
                            format!("unresolved reference '{}'", name),
                        ));
                    }
                }
                SymbolComponent::String(codes) => {
                    for &code in codes {
                        symbols.push(Symbol::Terminal(Terminal::single(code)));
                    }
                }
                SymbolComponent::Range(a, b) => {
                    symbols.push(Symbol::Terminal(Terminal::range(*a, *b)));
                }
            }
        }

        non_terminals[nt_index].rules.push(rule_index);
        rules.push(Rule {
            index: rule_index,
            non_terminal: nt_index,
            symbols,
            generated,
        });
    }

    if config.log().at_least(Log::Verbose(())) {
        println!(
            "[{}; normalize]: {} non-terminals, {} rules",
            config.log(),
            non_terminals.len(),
            rules.len()
        );
    }

    Ok(Grammar {
        non_terminals,
        rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(builder: &mut GrammarBuilder) {
        let rule = builder.rule("Only", false);
        builder.string(rule, "z");
        builder.reference(rule, "Only");
    }

    #[test]
    fn normalize_is_deterministic_across_separate_builds() {
        let mut a = GrammarBuilder::new();
        describe(&mut a);
        let (tower_a, root_a, types_a) = a.finish();
        let grammar_a = normalize(&tower_a, root_a, types_a, &BuildConfig::new()).unwrap();

        let mut b = GrammarBuilder::new();
        describe(&mut b);
        let (tower_b, root_b, types_b) = b.finish();
        let grammar_b = normalize(&tower_b, root_b, types_b, &BuildConfig::new()).unwrap();

        assert_eq!(grammar_a, grammar_b);
    }

    #[test]
    fn normalize_reports_an_unresolved_reference() {
        let mut builder = GrammarBuilder::new();
        let rule = builder.rule("Only", false);
        builder.reference(rule, "Missing");
        let (tower, root, types) = builder.finish();

        let err = normalize(&tower, root, types, &BuildConfig::new()).unwrap_err();
        assert!(format!("{:?}", err).contains("Missing"));
    }

    #[test]
    fn normalize_rejects_an_empty_grammar() {
        let builder = GrammarBuilder::new();
        let (tower, root, types) = builder.finish();
        assert!(normalize(&tower, root, types, &BuildConfig::new()).is_err());
    }

    #[test]
    fn releasing_the_tree_also_releases_the_type_tokens_own_references() {
        let mut builder = GrammarBuilder::new();
        describe(&mut builder);
        let (mut tower, root, types) = builder.finish();

        tower.release(root);
        tower.release(types.rule);
        tower.release(types.symbol);

        assert_eq!(tower.live_node_count(), 0);
    }
}
