//! Operator-precedence parser for RR.
//!
//! Three mutually recursive productions walk the token vector:
//! `parse_block_statement` collects lines until `}` or end of input,
//! `parse_line` handles terminators and comma lists, and
//! `parse_expression` grows one expression by operator-precedence
//! insertion and postfix attachment. The parser consults the shared
//! environment to tell operator symbols from function and variable
//! names; membership in the priority table is the sole discriminator.

use crate::compiler::ast::AstNode;
use crate::compiler::tokens::{Span, Token, TokenKind};
use rr_core::{Environment, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("delimiter '{delim}' has no meaning here at line {line}, col {col}")]
    UnknownDelim {
        delim: char,
        line: usize,
        col: usize,
    },
    #[error("expected an operator, found {found} at line {line}, col {col}")]
    ExpectedOperator {
        found: String,
        line: usize,
        col: usize,
    },
    #[error("expected an expression, found {found} at line {line}, col {col}")]
    ExpectedExpression {
        found: String,
        line: usize,
        col: usize,
    },
    #[error("'if' missing its 'else' branch at line {line}, col {col}")]
    IfWithoutElse { line: usize, col: usize },
    #[error("'else' without a matching 'if' at line {line}, col {col}")]
    ElseWithoutIf { line: usize, col: usize },
    #[error("cannot index into operator '{name}' at line {line}, col {col}")]
    IndexIntoOperator {
        name: String,
        line: usize,
        col: usize,
    },
}

/// A pending postfix application: call arguments or an index expression.
enum Postfix {
    Call(AstNode),
    Index(AstNode),
}

pub struct Parser<'e> {
    tokens: Vec<Token>,
    at: usize,
    env: &'e Environment,
}

impl<'e> Parser<'e> {
    pub fn new(tokens: Vec<Token>, env: &'e Environment) -> Self {
        Self { tokens, at: 0, env }
    }

    /// Parse the whole token stream as one top-level statement block.
    pub fn parse(mut self) -> Result<AstNode, ParseError> {
        self.parse_block_statement()
    }

    fn current(&self) -> &Token {
        // The lexer guarantees a trailing Eof token.
        const END: Token = Token {
            kind: TokenKind::Eof,
            span: Span { line: 0, col: 0 },
        };
        self.tokens.get(self.at).unwrap_or(&END)
    }

    fn advance(&mut self) {
        self.at += 1;
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// The current token's symbol text when it names a registered
    /// operator.
    fn current_operator(&self) -> Option<String> {
        self.current()
            .kind
            .symbol_text()
            .filter(|name| self.env.is_operator(name))
            .map(str::to_string)
    }

    /// Lines until `}` or end of input; bare newlines are skipped.
    fn parse_block_statement(&mut self) -> Result<AstNode, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Eof => break,
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Newline => {
                    self.advance();
                }
                _ => children.push(self.parse_line()?),
            }
        }
        Ok(AstNode::Statement(children))
    }

    /// One line: an expression, optionally continued by commas, ended by
    /// a newline or a closing delimiter.
    fn parse_line(&mut self) -> Result<AstNode, ParseError> {
        let mut root = self.parse_expression()?;
        loop {
            let span = self.span();
            match &self.current().kind {
                TokenKind::Newline => {
                    self.advance();
                    return Ok(root);
                }
                TokenKind::Eof => return Ok(root),
                TokenKind::RParen => {
                    self.advance();
                    if !matches!(root, AstNode::Csv(_) | AstNode::Statement(_)) {
                        root = AstNode::Statement(vec![root]);
                    }
                    return Ok(root);
                }
                TokenKind::RBracket => {
                    self.advance();
                    return Ok(root);
                }
                // The caller decides what a closing brace ends.
                TokenKind::RBrace => return Ok(root),
                TokenKind::Comma => {
                    self.advance();
                    let mut items = match root {
                        AstNode::Csv(items) => items,
                        other => vec![other],
                    };
                    items.push(self.parse_expression()?);
                    root = AstNode::Csv(items);
                }
                TokenKind::Dot => {
                    return Err(ParseError::UnknownDelim {
                        delim: '.',
                        line: span.line,
                        col: span.col,
                    })
                }
                other => {
                    return Err(ParseError::ExpectedOperator {
                        found: other.to_string(),
                        line: span.line,
                        col: span.col,
                    })
                }
            }
        }
    }

    /// One expression: a seed from `parse_next_expression`, extended by
    /// operator-precedence insertion (`a + b`), indexing (`a[i]`), and
    /// call application (`f(x)`) until none of the three applies.
    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        let mut root = self.parse_next_expression()?;
        loop {
            let span = self.span();
            match &self.current().kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_line()?;
                    root = apply_postfix(root, Postfix::Index(index), span)?;
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = if self.current().kind == TokenKind::RParen {
                        self.advance();
                        AstNode::Csv(Vec::new())
                    } else {
                        self.parse_line()?.into_csv()
                    };
                    root = apply_postfix(root, Postfix::Call(args), span)?;
                }
                _ => match self.current_operator() {
                    Some(name) => {
                        self.advance();
                        root = self.insert_op(root, name)?;
                    }
                    None => return Ok(root),
                },
            }
        }
    }

    /// Exactly one independent expression, without lookahead beyond what
    /// is necessary to form it.
    fn parse_next_expression(&mut self) -> Result<AstNode, ParseError> {
        let span = self.span();
        let kind = self.current().kind.clone();
        match kind {
            // Grouped expression; parse_line consumes the `)`.
            TokenKind::LParen => {
                self.advance();
                self.parse_line()
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_block_statement()
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_line()?.into_csv();
                Ok(AstNode::ListBuilder(Box::new(items)))
            }
            TokenKind::IntLit(n) => {
                self.advance();
                Ok(AstNode::Literal(Value::Int(n)))
            }
            TokenKind::FloatLit(x) => {
                self.advance();
                Ok(AstNode::Literal(Value::Float(x)))
            }
            TokenKind::StrLit(s) => {
                self.advance();
                Ok(AstNode::Literal(Value::new_str(s)))
            }
            TokenKind::Ident(name) if name == "true" || name == "false" => {
                self.advance();
                Ok(AstNode::Literal(Value::Bool(name == "true")))
            }
            TokenKind::Ident(name) if name == "if" => {
                self.advance();
                self.parse_if()
            }
            TokenKind::Ident(name) if name == "else" => Err(ParseError::ElseWithoutIf {
                line: span.line,
                col: span.col,
            }),
            TokenKind::Ident(name) | TokenKind::Special(name) if self.env.is_operator(&name) => {
                self.advance();
                if self.current().kind == TokenKind::LParen {
                    // Function-like use such as `+(1, 2)`; arguments
                    // attach through a later Evaluate.
                    Ok(AstNode::Op {
                        name,
                        args: Vec::new(),
                    })
                } else {
                    let operand = self.parse_next_expression()?;
                    Ok(AstNode::Op {
                        name,
                        args: vec![operand],
                    })
                }
            }
            TokenKind::Ident(name) | TokenKind::Special(name) => {
                self.advance();
                if self.env.is_function(&name) {
                    Ok(AstNode::Fun(name))
                } else {
                    Ok(AstNode::Var(name))
                }
            }
            TokenKind::Dot => Err(ParseError::UnknownDelim {
                delim: '.',
                line: span.line,
                col: span.col,
            }),
            other => Err(ParseError::ExpectedExpression {
                found: other.to_string(),
                line: span.line,
                col: span.col,
            }),
        }
    }

    /// The `if` keyword is already consumed.
    fn parse_if(&mut self) -> Result<AstNode, ParseError> {
        let cond = self.parse_expression()?;
        let then = self.parse_expression()?;
        let span = self.span();
        if !matches!(&self.current().kind, TokenKind::Ident(s) if s == "else") {
            return Err(ParseError::IfWithoutElse {
                line: span.line,
                col: span.col,
            });
        }
        self.advance();
        let or_else = self.parse_expression()?;
        Ok(AstNode::If {
            cond: Box::new(cond),
            then: Box::new(then),
            or_else: Box::new(or_else),
        })
    }

    /// Operator-precedence insertion of `name` into `root`. Descends the
    /// right spine while the incoming operator binds tighter; `=` also
    /// descends on a priority tie, making it right-associative.
    fn insert_op(&mut self, root: AstNode, name: String) -> Result<AstNode, ParseError> {
        match root {
            AstNode::Op {
                name: root_op,
                mut args,
            } if !args.is_empty() => {
                let descend = self.env.op_priority_higher(&root_op, &name)
                    || (name == "=" && self.env.priority_of(&root_op) == self.env.priority_of(&name));
                if descend {
                    if let Some(last) = args.pop() {
                        args.push(self.insert_op(last, name)?);
                    }
                    Ok(AstNode::Op {
                        name: root_op,
                        args,
                    })
                } else {
                    let rhs = self.parse_next_expression()?;
                    Ok(AstNode::Op {
                        name,
                        args: vec![
                            AstNode::Op {
                                name: root_op,
                                args,
                            },
                            rhs,
                        ],
                    })
                }
            }
            // A tie to the comma: operators bind tighter, so insertion
            // continues in the last element.
            AstNode::Csv(mut items) => {
                if let Some(last) = items.pop() {
                    items.push(self.insert_op(last, name)?);
                }
                Ok(AstNode::Csv(items))
            }
            other => {
                let rhs = self.parse_next_expression()?;
                Ok(AstNode::Op {
                    name,
                    args: vec![other, rhs],
                })
            }
        }
    }
}

/// Attach a postfix application to `root`: descend through the last
/// child of each operator node until that child is not an operator or is
/// a childless one, and wrap the subtree found there. A childless
/// operator absorbs call arguments (`+(1, 2)`) but cannot be indexed.
fn apply_postfix(root: AstNode, postfix: Postfix, span: Span) -> Result<AstNode, ParseError> {
    match root {
        AstNode::Op { name, mut args } if !args.is_empty() => {
            if let Some(last) = args.pop() {
                args.push(apply_postfix(last, postfix, span)?);
            }
            Ok(AstNode::Op { name, args })
        }
        target => match postfix {
            Postfix::Call(args) => Ok(AstNode::Evaluate {
                callee: Box::new(target),
                args: Box::new(args),
            }),
            Postfix::Index(index) => {
                if let AstNode::Op { name, .. } = &target {
                    return Err(ParseError::IndexIntoOperator {
                        name: name.clone(),
                        line: span.line,
                        col: span.col,
                    });
                }
                Ok(AstNode::Index {
                    target: Box::new(target),
                    index: Box::new(index),
                })
            }
        },
    }
}
