//! Recursive-descent parser producing the rucop-core syntax tree

use crate::lexer::{LexError, Lexer, Token, TokenKind};
use rucop_core::ast::{Block, ElsifClause, Node, NodeKind, Visibility};
use rucop_core::{BinOp, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Unexpected token at line {line}, column {column}: expected {expected}, got {got:?}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        expected: String,
        got: TokenKind,
    },

    #[error("Unexpected end of file")]
    UnexpectedEof,
}

/// Parse Ruby source into a list of top-level statements.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        // The token stream always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(self.kind()) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if std::mem::discriminant(self.kind()) == std::mem::discriminant(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::UnexpectedEof
        } else {
            ParseError::UnexpectedToken {
                line: token.line,
                column: token.column,
                expected: expected.to_string(),
                got: token.kind.clone(),
            }
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn skip_terminators(&mut self) {
        while matches!(self.kind(), TokenKind::Newline | TokenKind::Semi) {
            self.advance();
        }
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds
            .iter()
            .any(|k| std::mem::discriminant(self.kind()) == std::mem::discriminant(k))
    }

    fn parse_program(&mut self) -> Result<Vec<Node>, ParseError> {
        let statements = self.parse_statements(&[])?;
        if !matches!(self.kind(), TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(statements)
    }

    fn parse_statements(&mut self, stop: &[TokenKind]) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_terminators();
            if matches!(self.kind(), TokenKind::Eof) || self.at_any(stop) {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.kind() {
            TokenKind::Class => self.parse_class(),
            TokenKind::Def => self.parse_def(),
            TokenKind::Protected | TokenKind::Private | TokenKind::Public => {
                self.parse_visibility()
            }
            TokenKind::If | TokenKind::Unless => self.parse_if_statement(),
            _ => {
                let expr = self.parse_expression()?;
                self.parse_modifiers(expr)
            }
        }
    }

    /// Attach trailing statement modifiers: `expr if cond`,
    /// `expr unless cond`, `expr while cond`, `expr rescue handler`.
    fn parse_modifiers(&mut self, mut expr: Node) -> Result<Node, ParseError> {
        loop {
            match self.kind() {
                TokenKind::If | TokenKind::Unless => {
                    let unless = matches!(self.kind(), TokenKind::Unless);
                    self.advance();
                    let cond = self.parse_expression()?;
                    let span = Span::new(expr.span.start, cond.span.end);
                    expr = Node::new(
                        NodeKind::If {
                            unless,
                            modifier: true,
                            cond: Box::new(cond),
                            then_body: vec![expr],
                            elsif_clauses: Vec::new(),
                            else_body: None,
                        },
                        span,
                    );
                }
                TokenKind::While => {
                    self.advance();
                    let cond = self.parse_expression()?;
                    let span = Span::new(expr.span.start, cond.span.end);
                    expr = Node::new(
                        NodeKind::WhileMod {
                            body: Box::new(expr),
                            cond: Box::new(cond),
                        },
                        span,
                    );
                }
                TokenKind::Rescue => {
                    self.advance();
                    let handler = self.parse_expression()?;
                    let span = Span::new(expr.span.start, handler.span.end);
                    expr = Node::new(
                        NodeKind::RescueMod {
                            body: Box::new(expr),
                            handler: Box::new(handler),
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_class(&mut self) -> Result<Node, ParseError> {
        let class_tok = self.advance();
        let name_tok = self.expect(&TokenKind::Const(String::new()), "class name")?;
        let name = match name_tok.kind {
            TokenKind::Const(name) => name,
            _ => unreachable!(),
        };

        let superclass = if self.eat(&TokenKind::Lt) {
            let super_tok = self.expect(&TokenKind::Const(String::new()), "superclass name")?;
            match super_tok.kind {
                TokenKind::Const(name) => Some(name),
                _ => unreachable!(),
            }
        } else {
            None
        };

        let body = self.parse_statements(&[TokenKind::End])?;
        self.expect(&TokenKind::End, "`end`")?;

        Ok(Node::new(
            NodeKind::Class {
                name,
                superclass,
                body,
            },
            Span::new(class_tok.span.start, self.prev_end()),
        ))
    }

    fn parse_def(&mut self) -> Result<Node, ParseError> {
        let def_tok = self.advance();
        let name_tok = self.expect(&TokenKind::Ident(String::new()), "method name")?;
        let name = match name_tok.kind {
            TokenKind::Ident(name) => name,
            _ => unreachable!(),
        };

        let mut params = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while let TokenKind::Ident(param) = self.kind() {
                params.push(param.clone());
                self.advance();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen, "`)`")?;
        }

        let body = self.parse_statements(&[TokenKind::End])?;
        self.expect(&TokenKind::End, "`end`")?;

        Ok(Node::new(
            NodeKind::Def { name, params, body },
            Span::new(def_tok.span.start, self.prev_end()),
        ))
    }

    fn parse_visibility(&mut self) -> Result<Node, ParseError> {
        let marker_tok = self.advance();
        let scope = match marker_tok.kind {
            TokenKind::Protected => Visibility::Protected,
            TokenKind::Private => Visibility::Private,
            _ => Visibility::Public,
        };

        // Inline modifier form: `private def x; end`
        let def = if matches!(self.kind(), TokenKind::Def) {
            Some(Box::new(self.parse_def()?))
        } else {
            None
        };

        Ok(Node::new(
            NodeKind::Visibility { scope, def },
            Span::new(marker_tok.span.start, self.prev_end()),
        ))
    }

    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let if_tok = self.advance();
        let unless = matches!(if_tok.kind, TokenKind::Unless);

        let cond = self.parse_expression()?;
        let stop = [TokenKind::End, TokenKind::Else, TokenKind::Elsif];
        let then_body = self.parse_statements(&stop)?;

        let mut elsif_clauses = Vec::new();
        while matches!(self.kind(), TokenKind::Elsif) {
            self.advance();
            let elsif_cond = self.parse_expression()?;
            let body = self.parse_statements(&stop)?;
            elsif_clauses.push(ElsifClause {
                cond: elsif_cond,
                body,
            });
        }

        let else_body = if self.eat(&TokenKind::Else) {
            Some(self.parse_statements(&[TokenKind::End])?)
        } else {
            None
        };

        self.expect(&TokenKind::End, "`end`")?;

        Ok(Node::new(
            NodeKind::If {
                unless,
                modifier: false,
                cond: Box::new(cond),
                then_body,
                elsif_clauses,
                else_body,
            },
            Span::new(if_tok.span.start, self.prev_end()),
        ))
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let target = self.parse_ternary()?;
        if matches!(self.kind(), TokenKind::Eq) {
            self.advance();
            let value = self.parse_assignment()?;
            let span = Span::new(target.span.start, value.span.end);
            return Ok(Node::new(
                NodeKind::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }
        Ok(target)
    }

    fn parse_ternary(&mut self) -> Result<Node, ParseError> {
        let cond = self.parse_or()?;
        if !matches!(self.kind(), TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        let then_branch = self.parse_ternary()?;
        self.expect(&TokenKind::Colon, "`:`")?;
        let else_branch = self.parse_ternary()?;
        let span = Span::new(cond.span.start, else_branch.span.end);
        Ok(Node::new(
            NodeKind::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_additive()?;
        while matches!(self.kind(), TokenKind::OrOr) {
            self.advance();
            let rhs = self.parse_additive()?;
            let span = Span::new(lhs.span.start, rhs.span.end);
            lhs = Node::new(
                NodeKind::BinaryOp {
                    op: BinOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            let span = Span::new(lhs.span.start, rhs.span.end);
            lhs = Node::new(
                NodeKind::BinaryOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            let span = Span::new(lhs.span.start, rhs.span.end);
            lhs = Node::new(
                NodeKind::BinaryOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if matches!(self.kind(), TokenKind::Bang) {
            let bang_tok = self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(bang_tok.span.start, operand.span.end);
            return Ok(Node::new(
                NodeKind::Not {
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name_tok =
                        self.expect(&TokenKind::Ident(String::new()), "method name")?;
                    let method = match name_tok.kind {
                        TokenKind::Ident(name) => name,
                        _ => unreachable!(),
                    };
                    let (args, parens) = if self.eat(&TokenKind::LParen) {
                        let args = self.parse_call_args()?;
                        self.expect(&TokenKind::RParen, "`)`")?;
                        (args, true)
                    } else if self.at_command_arg_start() {
                        (self.parse_command_args()?, false)
                    } else {
                        (Vec::new(), false)
                    };
                    let block = self.maybe_block()?;
                    let span = Span::new(node.span.start, self.prev_end());
                    node = Node::new(
                        NodeKind::Send {
                            receiver: Some(Box::new(node)),
                            method,
                            args,
                            parens,
                            block,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket, "`]`")?;
                    let span = Span::new(node.span.start, self.prev_end());
                    node = Node::new(
                        NodeKind::Index {
                            receiver: Box::new(node),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                // Leading-dot method chains may continue on the next line
                TokenKind::Newline => {
                    let mut lookahead = self.pos;
                    while matches!(self.tokens[lookahead].kind, TokenKind::Newline) {
                        lookahead += 1;
                    }
                    if matches!(self.tokens[lookahead].kind, TokenKind::Dot) {
                        self.pos = lookahead;
                    } else {
                        return Ok(node);
                    }
                }
                _ => return Ok(node),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Node::new(NodeKind::Int(*value), token.span))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Node::new(NodeKind::Float(*value), token.span))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Node::new(NodeKind::Str(value.clone()), token.span))
            }
            TokenKind::Symbol(name) => {
                self.advance();
                Ok(Node::new(NodeKind::Symbol(name.clone()), token.span))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Node::new(NodeKind::Nil, token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::new(NodeKind::True, token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::new(NodeKind::False, token.span))
            }
            TokenKind::Ivar(name) => {
                self.advance();
                Ok(Node::new(NodeKind::Ivar(name.clone()), token.span))
            }
            TokenKind::Const(name) => {
                self.advance();
                Ok(Node::new(NodeKind::Const(name.clone()), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let inner = self.parse_modifiers(inner)?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !matches!(self.kind(), TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RBracket, "`]`")?;
                Ok(Node::new(
                    NodeKind::Array { elements },
                    Span::new(token.span.start, self.prev_end()),
                ))
            }
            TokenKind::Ident(name) => {
                let method = name.clone();
                self.advance();
                let (args, parens) = if matches!(self.kind(), TokenKind::LParen) {
                    self.advance();
                    let args = self.parse_call_args()?;
                    self.expect(&TokenKind::RParen, "`)`")?;
                    (args, true)
                } else if self.at_command_arg_start() {
                    (self.parse_command_args()?, false)
                } else {
                    (Vec::new(), false)
                };
                let block = self.maybe_block()?;
                Ok(Node::new(
                    NodeKind::Send {
                        receiver: None,
                        method,
                        args,
                        parens,
                        block,
                    },
                    Span::new(token.span.start, self.prev_end()),
                ))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Whether the current token can begin a bare (parenthesis-free)
    /// argument list after a method name on the same line.
    fn at_command_arg_start(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident(_)
                | TokenKind::Const(_)
                | TokenKind::Ivar(_)
                | TokenKind::Symbol(_)
                | TokenKind::Str(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Nil
                | TokenKind::True
                | TokenKind::False
        )
    }

    fn parse_command_args(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_ternary()?);
            if !self.eat(&TokenKind::Comma) {
                return Ok(args);
            }
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        self.skip_terminators();
        if matches!(self.kind(), TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            if matches!(self.kind(), TokenKind::Amp) {
                let amp_tok = self.advance();
                let value = self.parse_expression()?;
                let span = Span::new(amp_tok.span.start, value.span.end);
                args.push(Node::new(
                    NodeKind::BlockPass {
                        value: Box::new(value),
                    },
                    span,
                ));
            } else {
                args.push(self.parse_expression()?);
            }
            self.skip_terminators();
            if !self.eat(&TokenKind::Comma) {
                return Ok(args);
            }
            self.skip_terminators();
        }
    }

    fn maybe_block(&mut self) -> Result<Option<Block>, ParseError> {
        if !matches!(self.kind(), TokenKind::LBrace) {
            return Ok(None);
        }
        self.advance();

        let mut params = Vec::new();
        if self.eat(&TokenKind::Pipe) {
            while let TokenKind::Ident(param) = self.kind() {
                params.push(param.clone());
                self.advance();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::Pipe, "`|`")?;
        }

        let body = self.parse_statements(&[TokenKind::RBrace])?;
        self.expect(&TokenKind::RBrace, "`}`")?;
        Ok(Some(Block { params, body }))
    }
}
