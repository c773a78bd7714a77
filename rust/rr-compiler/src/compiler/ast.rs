//! The RR abstract syntax tree.

use rr_core::Value;
use serde::Serialize;

/// A node in the AST. Nodes own their children; the whole tree is
/// produced top-down by the parser and dropped after evaluation.
///
/// Structural invariants maintained by the parser: a `Literal`'s value is
/// exclusively owned; a `Csv` never directly contains another `Csv`; a
/// `ListBuilder`'s child is always a `Csv`, even for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AstNode {
    /// Sequence of lines; evaluates to the last child's value.
    Statement(Vec<AstNode>),
    Literal(Value),
    Var(String),
    /// A function name; looked up at the enclosing `Evaluate`.
    Fun(String),
    /// An operator application: zero operands for a function-like
    /// reference, one for prefix unary, two for infix.
    Op { name: String, args: Vec<AstNode> },
    If {
        cond: Box<AstNode>,
        then: Box<AstNode>,
        or_else: Box<AstNode>,
    },
    /// Comma-separated expressions, two or more unless produced as an
    /// argument list.
    Csv(Vec<AstNode>),
    /// List literal; the single child is a `Csv`.
    ListBuilder(Box<AstNode>),
    /// Postfix application: callee plus a `Csv` of arguments.
    Evaluate {
        callee: Box<AstNode>,
        args: Box<AstNode>,
    },
    /// Postfix indexing: collection plus index expression.
    Index {
        target: Box<AstNode>,
        index: Box<AstNode>,
    },
}

impl AstNode {
    /// Wrap in a single-element `Csv` unless already a `Csv`.
    pub fn into_csv(self) -> AstNode {
        match self {
            csv @ AstNode::Csv(_) => csv,
            other => AstNode::Csv(vec![other]),
        }
    }
}
