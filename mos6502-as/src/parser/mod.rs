//! Parser module for assembly source

pub mod lexer;
pub mod number;
pub mod resolver;

pub use lexer::{Lexer, Token, TokenKind};
pub use number::parse_hex;
pub use resolver::Parser;
