//! rucop-parser: Ruby-subset parser for the rucop cops
//!
//! Produces the closed `rucop_core::Node` tree from source text. The
//! grammar covers exactly the constructs the cops and their corrected
//! output exercise; anything outside it is a `ParseError`, surfaced by
//! the engine as an unparsable file rather than an offense.

pub mod lexer;
pub mod parser;

pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{parse, ParseError};
