//! Ruby-subset lexer - tokenizes source into spanned tokens
//!
//! Comments are skipped entirely; they never produce tokens but stay in
//! the source buffer, so range-based rewrites keep them intact.

use rucop_core::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A lowercase identifier or method name, possibly `?`-suffixed
    Ident(String),
    /// A capitalized constant name
    Const(String),
    /// An instance variable (`@name`)
    Ivar(String),
    /// A symbol literal (`:name`)
    Symbol(String),
    /// A string literal (content, without quotes)
    Str(String),
    Int(i64),
    Float(f64),
    // Keywords
    Class,
    Def,
    End,
    If,
    Unless,
    Else,
    Elsif,
    While,
    Rescue,
    Nil,
    True,
    False,
    Protected,
    Private,
    Public,
    // Punctuation and operators
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Pipe,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    Question,
    Colon,
    Bang,
    Amp,
    Lt,
    Eq,
    Semi,
    Newline,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: usize, column: usize) -> Self {
        Self {
            kind,
            span,
            line,
            column,
        }
    }
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("Unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("Numeric literal '{text}' out of range at line {line}, column {column}")]
    InvalidNumber {
        text: String,
        line: usize,
        column: usize,
    },
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn is_ident_start(ch: char) -> bool {
        ch.is_ascii_lowercase() || ch == '_'
    }

    fn is_ident_continue(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    /// Tokenize the whole input, ending with an Eof token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            // Skip horizontal whitespace and comments
            while let Some(ch) = self.peek() {
                if ch == ' ' || ch == '\t' || ch == '\r' {
                    self.bump();
                } else if ch == '#' {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                } else {
                    break;
                }
            }

            let start = self.pos;
            let line = self.line;
            let column = self.column;

            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Span::new(start, start), line, column));
                return Ok(tokens);
            };

            let kind = match ch {
                '\n' => {
                    self.bump();
                    TokenKind::Newline
                }
                '@' => {
                    self.bump();
                    let name = self.read_name();
                    TokenKind::Ivar(name)
                }
                ':' => {
                    if self.peek_second().is_some_and(|c| Self::is_ident_start(c) || c.is_ascii_uppercase()) {
                        self.bump();
                        let name = self.read_name();
                        TokenKind::Symbol(name)
                    } else {
                        self.bump();
                        TokenKind::Colon
                    }
                }
                '\'' | '"' => self.read_string(ch, line, column)?,
                '|' => {
                    self.bump();
                    if self.peek() == Some('|') {
                        self.bump();
                        TokenKind::OrOr
                    } else {
                        TokenKind::Pipe
                    }
                }
                '.' => {
                    self.bump();
                    TokenKind::Dot
                }
                ',' => {
                    self.bump();
                    TokenKind::Comma
                }
                '(' => {
                    self.bump();
                    TokenKind::LParen
                }
                ')' => {
                    self.bump();
                    TokenKind::RParen
                }
                '[' => {
                    self.bump();
                    TokenKind::LBracket
                }
                ']' => {
                    self.bump();
                    TokenKind::RBracket
                }
                '{' => {
                    self.bump();
                    TokenKind::LBrace
                }
                '}' => {
                    self.bump();
                    TokenKind::RBrace
                }
                '+' => {
                    self.bump();
                    TokenKind::Plus
                }
                '-' => {
                    self.bump();
                    TokenKind::Minus
                }
                '*' => {
                    self.bump();
                    TokenKind::Star
                }
                '/' => {
                    self.bump();
                    TokenKind::Slash
                }
                '?' => {
                    self.bump();
                    TokenKind::Question
                }
                '!' => {
                    self.bump();
                    TokenKind::Bang
                }
                '&' => {
                    self.bump();
                    TokenKind::Amp
                }
                '<' => {
                    self.bump();
                    TokenKind::Lt
                }
                '=' => {
                    self.bump();
                    TokenKind::Eq
                }
                ';' => {
                    self.bump();
                    TokenKind::Semi
                }
                c if c.is_ascii_digit() => self.read_number(line, column)?,
                c if c.is_ascii_uppercase() => {
                    let name = self.read_name();
                    TokenKind::Const(name)
                }
                c if Self::is_ident_start(c) => {
                    let name = self.read_ident();
                    Self::keyword_or_ident(name)
                }
                c => {
                    return Err(LexError::UnexpectedChar {
                        ch: c,
                        line,
                        column,
                    })
                }
            };

            tokens.push(Token::new(kind, Span::new(start, self.pos), line, column));
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if Self::is_ident_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    /// Read an identifier, attaching a trailing `?` when it belongs to
    /// the name (predicate methods like `present?`) rather than to a
    /// ternary operator.
    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if Self::is_ident_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }
        if self.peek() == Some('?') {
            let belongs = match self.peek_second() {
                None => true,
                Some(c) => matches!(c, ' ' | '\t' | '\r' | '\n' | ')' | ']' | ',' | ';' | '.'),
            };
            if belongs {
                self.bump();
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_number(&mut self, line: usize, column: usize) -> Result<TokenKind, LexError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            let text = &self.input[start..self.pos];
            text.parse().map(TokenKind::Float).map_err(|_| LexError::InvalidNumber {
                text: text.to_string(),
                line,
                column,
            })
        } else {
            let text = &self.input[start..self.pos];
            text.parse().map(TokenKind::Int).map_err(|_| LexError::InvalidNumber {
                text: text.to_string(),
                line,
                column,
            })
        }
    }

    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Result<TokenKind, LexError> {
        self.bump();
        let mut content = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString { line, column });
                }
                Some('\\') => {
                    if let Some(escaped) = self.bump() {
                        content.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            other => other,
                        });
                    }
                }
                Some(c) if c == quote => break,
                Some(c) => content.push(c),
            }
        }
        Ok(TokenKind::Str(content))
    }

    fn keyword_or_ident(name: String) -> TokenKind {
        match name.as_str() {
            "class" => TokenKind::Class,
            "def" => TokenKind::Def,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "unless" => TokenKind::Unless,
            "else" => TokenKind::Else,
            "elsif" => TokenKind::Elsif,
            "while" => TokenKind::While,
            "rescue" => TokenKind::Rescue,
            "nil" => TokenKind::Nil,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "protected" => TokenKind::Protected,
            "private" => TokenKind::Private,
            "public" => TokenKind::Public,
            _ => TokenKind::Ident(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_predicate_method_vs_ternary() {
        assert_eq!(
            kinds("a.present? ? a : nil"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Dot,
                TokenKind::Ident("present?".into()),
                TokenKind::Question,
                TokenKind::Ident("a".into()),
                TokenKind::Colon,
                TokenKind::Nil,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_symbol_vs_colon() {
        assert_eq!(
            kinds("b[:c]"),
            vec![
                TokenKind::Ident("b".into()),
                TokenKind::LBracket,
                TokenKind::Symbol("c".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_colon_without_space() {
        // `nil:` in `!a.present? ? nil: a`
        assert_eq!(
            kinds("nil: a"),
            vec![
                TokenKind::Nil,
                TokenKind::Colon,
                TokenKind::Ident("a".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_skipped() {
        assert_eq!(
            kinds("def index # first\nend"),
            vec![
                TokenKind::Def,
                TokenKind::Ident("index".into()),
                TokenKind::Newline,
                TokenKind::End,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_float_and_chain() {
        assert_eq!(
            kinds("b.to_f + 12.0"),
            vec![
                TokenKind::Ident("b".into()),
                TokenKind::Dot,
                TokenKind::Ident("to_f".into()),
                TokenKind::Plus,
                TokenKind::Float(12.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_pass_and_or() {
        assert_eq!(
            kinds("map(&:baz) || b"),
            vec![
                TokenKind::Ident("map".into()),
                TokenKind::LParen,
                TokenKind::Amp,
                TokenKind::Symbol("baz".into()),
                TokenKind::RParen,
                TokenKind::OrOr,
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_ivar_and_assignment() {
        assert_eq!(
            kinds("@user = User.find(params[:id])"),
            vec![
                TokenKind::Ivar("user".into()),
                TokenKind::Eq,
                TokenKind::Const("User".into()),
                TokenKind::Dot,
                TokenKind::Ident("find".into()),
                TokenKind::LParen,
                TokenKind::Ident("params".into()),
                TokenKind::LBracket,
                TokenKind::Symbol("id".into()),
                TokenKind::RBracket,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = Lexer::new("a ? b : c").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 3));
        assert_eq!(tokens[4].span, Span::new(8, 9));
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        // Larger than i64::MAX; must not silently collapse to zero
        let result = Lexer::new("x = 99999999999999999999").tokenize();
        match result {
            Err(LexError::InvalidNumber { text, line, column }) => {
                assert_eq!(text, "99999999999999999999");
                assert_eq!(line, 1);
                assert_eq!(column, 5);
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let result = Lexer::new("'oops").tokenize();
        assert!(matches!(result, Err(LexError::UnterminatedString { .. })));
    }
}
