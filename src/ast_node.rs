use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};

/// A parse-tree node produced by a [Recognizer](crate::Recognizer) step on
/// reduction: the reduced rule index, the input span it covers, and its
/// children in left-to-right order.
#[derive(Clone, PartialEq, Eq)]
pub struct AstNode {
    pub rule: usize,
    pub start: usize,
    pub end: usize,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(rule: usize, start: usize, end: usize, children: Vec<AstNode>) -> Self {
        Self {
            rule,
            start,
            end,
            children,
        }
    }

    pub fn leaf(rule: usize, start: usize, end: usize) -> Self {
        Self::new(rule, start, end, Vec::new())
    }

    pub fn find_tree<TF: Fn(&AstNode) -> bool>(&self, p: &TF) -> Option<&AstNode> {
        if p(self) {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find_tree(p))
        }
    }

    pub fn list_tree_with_rule<'this>(&'this self, rule: usize) -> Vec<&'this AstNode> {
        let mut found = Vec::new();
        self.walk_tree(&mut found, &|node, list| {
            if node.rule == rule {
                list.push(node);
            }
        });
        found
    }

    fn walk_tree<'this, TR, TF: Fn(&'this Self, &mut TR)>(&'this self, r: &mut TR, p: &TF) {
        p(self, r);
        self.children.iter().for_each(|child| child.walk_tree(r, p));
    }

    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("rule", &self.rule)
            .field("span", &(self.start, self.end))
            .finish()
    }
}

impl Debug for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug_struct = f.debug_struct("AstNode");
        debug_struct
            .field("rule", &self.rule)
            .field("start", &self.start)
            .field("end", &self.end);
        if !self.children.is_empty() {
            debug_struct.field("children", &self.children);
        }
        debug_struct.finish()
    }
}

impl TreeItem for AstNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "rule {} # {}-{}", self.rule, self.start, self.end)
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}
