use std::fmt::Write as _;

use crate::interpreter::{
    lexer::Token,
    parser::{ParseTree, Rule},
};

/// What a flattened node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// An inner node, named after the topmost production of its chain.
    Rule(Rule),
    /// A token.
    Token(Token),
}

/// A parse tree with its single-child chains collapsed.
///
/// The raw parse tree has one node per precedence level, so a lone name used
/// as a statement sits under a dozen single-child nodes. Flattening keeps
/// the topmost node of every such chain and attaches whatever the chain ends
/// in directly to it. Useful for diagnostics only; evaluation works on the
/// AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Cst {
    /// Rule name or token.
    pub payload:  Payload,
    /// Flattened children in source order.
    pub children: Vec<Self>,
}

impl Cst {
    /// Flattens a parse tree.
    ///
    /// # Examples
    /// ```
    /// use pyrite::interpreter::{
    ///     cst::{Cst, Payload},
    ///     lexer::tokenize,
    ///     parser::{Rule, StartRule, parse},
    /// };
    ///
    /// let tokens = tokenize("1 + 2").unwrap();
    /// let tree = parse(&tokens, StartRule::Expression).unwrap();
    /// let cst = Cst::flatten(&tree);
    ///
    /// assert_eq!(cst.payload, Payload::Rule(Rule::EvalInput));
    /// // Test, NEWLINE and EndMarker
    /// assert_eq!(cst.children.len(), 3);
    /// // The chain down to the sum collapses into `Test`: `1`, `+`, `2`.
    /// assert_eq!(cst.children[0].children.len(), 3);
    /// ```
    #[must_use]
    pub fn flatten(tree: &ParseTree) -> Self {
        match tree {
            ParseTree::Leaf(token) => Self::leaf(token),
            ParseTree::Node { rule, .. } => {
                let mut root = Self::inner(*rule);
                root.walk(tree);
                root
            },
        }
    }

    fn leaf(token: &Token) -> Self {
        Self { payload:  Payload::Token(token.clone()),
               children: Vec::new(), }
    }

    const fn inner(rule: Rule) -> Self {
        Self { payload:  Payload::Rule(rule),
               children: Vec::new(), }
    }

    fn walk(&mut self, tree: &ParseTree) {
        match tree {
            ParseTree::Leaf(token) => self.children.push(Self::leaf(token)),
            ParseTree::Node { children, .. } => match children.as_slice() {
                [] => {},
                [only] => self.walk(only),
                many => {
                    for child in many {
                        let mut flattened = Self::flatten_head(child);
                        if let ParseTree::Node { .. } = child {
                            flattened.walk(child);
                        }
                        self.children.push(flattened);
                    }
                },
            },
        }
    }

    fn flatten_head(tree: &ParseTree) -> Self {
        match tree {
            ParseTree::Leaf(token) => Self::leaf(token),
            ParseTree::Node { rule, .. } => Self::inner(*rule),
        }
    }

    /// Renders the tree with box-drawing characters, one node per line.
    ///
    /// With `with_positions` every token caption also carries its
    /// `(line, column)`.
    #[must_use]
    pub fn render(&self, with_positions: bool) -> String {
        let mut out = String::new();
        self.render_into(&mut out, "", true, with_positions);
        out
    }

    fn render_into(&self, out: &mut String, prefix: &str, last: bool, with_positions: bool) {
        let branch = if last { "└──── " } else { "├──── " };
        let caption = match &self.payload {
            Payload::Rule(rule) => rule.to_string(),
            Payload::Token(token) if with_positions => {
                format!("TOKEN[type: {:?}, text: {}, at ({}, {})]",
                        token.kind,
                        token.text.escape_debug(),
                        token.line,
                        token.column)
            },
            Payload::Token(token) => {
                format!("TOKEN[type: {:?}, text: {}]", token.kind, token.text.escape_debug())
            },
        };
        let _ = writeln!(out, "{prefix}{branch}{caption}");

        let child_prefix = format!("{prefix}{}", if last { "        " } else { "│       " });
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.render_into(out, &child_prefix, i + 1 == count, with_positions);
        }
    }
}

impl std::fmt::Display for Cst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(false))
    }
}
