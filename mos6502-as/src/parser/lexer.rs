//! Tokenizer for assembly source text

use std::fmt;

use super::number::parse_hex;
use crate::addressing::Register;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Any 3-character alphanumeric run. Whether it names an instruction is
    /// decided by the parser.
    Mnemonic(String),
    Register(Register),
    /// 2 hex digits.
    Byte(u8),
    /// 4 hex digits.
    Word(u16),
    Hash,
    Dollar,
    LParen,
    RParen,
    Comma,
    Eof,
    /// Alphanumeric run that is neither a register, a literal nor a mnemonic,
    /// or a character the grammar does not use.
    Invalid(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Mnemonic(text) => write!(f, "mnemonic '{text}'"),
            TokenKind::Register(r) => write!(f, "register {r}"),
            TokenKind::Byte(b) => write!(f, "byte {b:02X}"),
            TokenKind::Word(w) => write!(f, "word {w:04X}"),
            TokenKind::Hash => f.write_str("'#'"),
            TokenKind::Dollar => f.write_str("'$'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Invalid(text) => write!(f, "'{text}'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line the token starts on.
    pub line: usize,
}

/// Pull-model tokenizer with one token of lookahead.
///
/// Never fails: malformed input comes back as [`TokenKind::Invalid`] and the
/// end of the source as [`TokenKind::Eof`], repeated on every further call.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            peeked: None,
        }
    }

    /// Current line of the cursor.
    pub fn line(&self) -> usize {
        match &self.peeked {
            Some(token) => token.line,
            None => self.line,
        }
    }

    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.peeked.insert(token)
    }

    fn skip_trivia(&mut self) {
        let bytes = self.src.as_bytes();
        while let Some(&c) = bytes.get(self.pos) {
            match c {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\x0B' | b'\r' => self.pos += 1,
                b';' => {
                    while bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self) -> Token {
        self.skip_trivia();
        let line = self.line;
        let token = |kind| Token { kind, line };

        let src = self.src;
        let rest = &src[self.pos..];
        let Some(c) = rest.chars().next() else {
            return token(TokenKind::Eof);
        };

        let single = match c {
            '#' => Some(TokenKind::Hash),
            '$' => Some(TokenKind::Dollar),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            return token(kind);
        }

        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if len == 0 {
            self.pos += c.len_utf8();
            return token(TokenKind::Invalid(c.to_string()));
        }

        let text = &rest[..len];
        self.pos += len;
        token(classify(text))
    }
}

/// Classify an alphanumeric run by its length.
fn classify(text: &str) -> TokenKind {
    let invalid = || TokenKind::Invalid(text.to_string());
    match text.len() {
        1 => text
            .chars()
            .next()
            .and_then(Register::from_char)
            .map_or_else(invalid, TokenKind::Register),
        2 => parse_hex(text).map_or_else(invalid, |v| TokenKind::Byte(v as u8)),
        3 => TokenKind::Mnemonic(text.to_string()),
        4 => parse_hex(text).map_or_else(invalid, TokenKind::Word),
        _ => invalid(),
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to, not including, end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn punctuation_and_literals() {
        assert_eq!(
            kinds("LDA ($44),Y"),
            vec![
                TokenKind::Mnemonic("LDA".into()),
                TokenKind::LParen,
                TokenKind::Dollar,
                TokenKind::Byte(0x44),
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Register(Register::Y),
            ]
        );
        assert_eq!(
            kinds("#$ff $BEEF"),
            vec![
                TokenKind::Hash,
                TokenKind::Dollar,
                TokenKind::Byte(0xFF),
                TokenKind::Dollar,
                TokenKind::Word(0xBEEF),
            ]
        );
    }

    #[test]
    fn classification_by_length() {
        assert_eq!(kinds("x"), vec![TokenKind::Register(Register::X)]);
        assert_eq!(kinds("q"), vec![TokenKind::Invalid("q".into())]);
        assert_eq!(kinds("G5"), vec![TokenKind::Invalid("G5".into())]);
        assert_eq!(kinds("zzz"), vec![TokenKind::Mnemonic("zzz".into())]);
        assert_eq!(kinds("12G4"), vec![TokenKind::Invalid("12G4".into())]);
        assert_eq!(kinds("12345"), vec![TokenKind::Invalid("12345".into())]);
    }

    #[test]
    fn unknown_characters_are_consumed() {
        assert_eq!(
            kinds("%é!"),
            vec![
                TokenKind::Invalid("%".into()),
                TokenKind::Invalid("é".into()),
                TokenKind::Invalid("!".into()),
            ]
        );
    }

    #[test]
    fn lines_and_comments() {
        let mut lexer = Lexer::new("NOP ; first\r\n\n\tINX ; $zz (\nDEX");
        assert_eq!(lexer.next_token().line, 1);
        let inx = lexer.next_token();
        assert_eq!(inx.kind, TokenKind::Mnemonic("INX".into()));
        assert_eq!(inx.line, 3);
        assert_eq!(lexer.next_token().line, 4);
        let eof = lexer.next_token();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("\n\nRTS");
        assert_eq!(lexer.peek().kind, TokenKind::Mnemonic("RTS".into()));
        assert_eq!(lexer.line(), 3);
        assert_eq!(lexer.next_token().kind, TokenKind::Mnemonic("RTS".into()));
        assert_eq!(lexer.peek().kind, TokenKind::Eof);
    }
}
