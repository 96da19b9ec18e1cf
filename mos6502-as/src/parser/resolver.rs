//! Operand resolution: one grammar per mnemonic family
//!
//! Addressing modes are chosen from syntax alone. The width of a hex literal
//! (2 or 4 digits) decides between zero page and absolute forms, whatever its
//! value; `$003F` is absolute.

use tracing::debug;

use super::lexer::{Lexer, Token, TokenKind};
use crate::addressing::{AddressingMode, Register};
use crate::error::AsmError;
use crate::instruction::{Instruction, Operand};
use crate::mnemonic::{Grammar, Mnemonic};
use crate::opcodes::OpcodeTables;

/// Turns a token stream into resolved instructions, one per call.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    tables: &'static OpcodeTables,
    failed: bool,
}

fn unexpected(expected: &str, found: &Token) -> AsmError {
    AsmError::UnexpectedToken {
        expected: expected.to_string(),
        found: found.kind.to_string(),
        line: found.line,
    }
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            tables: OpcodeTables::get(),
            failed: false,
        }
    }

    /// Parse the next instruction. `Ok(None)` at end of input.
    pub fn next_instruction(&mut self) -> Result<Option<Instruction>, AsmError> {
        let token = self.lexer.next_token();
        let line = token.line;
        let text = match token.kind {
            TokenKind::Eof => return Ok(None),
            TokenKind::Mnemonic(text) => text,
            _ => return Err(unexpected("mnemonic", &token)),
        };
        let mnemonic: Mnemonic = text
            .parse()
            .map_err(|_| AsmError::UnknownMnemonic { text, line })?;

        let instruction = match mnemonic.grammar() {
            Grammar::Implied => {
                Instruction::new(mnemonic, AddressingMode::Implied, Operand::None, line)
            }
            Grammar::Relative => self.relative(mnemonic, line)?,
            Grammar::Shift => self.shift(mnemonic, line)?,
            Grammar::Memory => self.memory(mnemonic, line)?,
        };
        debug!(line, mnemonic = %mnemonic, mode = %instruction.mode, "resolved instruction");
        Ok(Some(instruction))
    }

    // ===== Grammars =====

    fn relative(&mut self, mnemonic: Mnemonic, line: usize) -> Result<Instruction, AsmError> {
        let target = self.expect_literal()?;
        Ok(Instruction::new(mnemonic, AddressingMode::Relative, target, line))
    }

    fn shift(&mut self, mnemonic: Mnemonic, line: usize) -> Result<Instruction, AsmError> {
        let next = self.lexer.peek().kind.clone();
        match next {
            TokenKind::Mnemonic(_) | TokenKind::Eof => {}
            TokenKind::Register(Register::A) => {
                self.lexer.next_token();
            }
            _ => return self.memory(mnemonic, line),
        }
        Ok(Instruction::new(mnemonic, AddressingMode::Accumulator, Operand::None, line))
    }

    /// The load/store shaped grammar:
    ///
    /// ```text
    /// #$bb          immediate
    /// ($bb),Y       indirect indexed
    /// ($bb,X)       indexed indirect
    /// ($wwww)       indirect
    /// $bb[,X|,Y]    zero page [indexed]
    /// $wwww[,X|,Y]  absolute [indexed]
    /// A             accumulator
    /// ```
    ///
    /// The mode found must exist in the opcode table for `mnemonic`.
    fn memory(&mut self, mnemonic: Mnemonic, line: usize) -> Result<Instruction, AsmError> {
        let next = self.lexer.peek().kind.clone();
        let (mode, operand) = match next {
            TokenKind::Hash => {
                self.lexer.next_token();
                (AddressingMode::Immediate, self.expect_byte()?)
            }
            TokenKind::LParen => {
                self.lexer.next_token();
                self.indirect()?
            }
            TokenKind::Dollar => {
                let operand = self.expect_literal()?;
                let zero_page = matches!(operand, Operand::Byte(_));
                if self.lexer.peek().kind == TokenKind::Comma {
                    self.lexer.next_token();
                    (self.indexed(mnemonic, zero_page, line)?, operand)
                } else if zero_page {
                    (AddressingMode::ZeroPage, operand)
                } else {
                    (AddressingMode::Absolute, operand)
                }
            }
            TokenKind::Register(Register::A) => {
                self.lexer.next_token();
                (AddressingMode::Accumulator, Operand::None)
            }
            TokenKind::Mnemonic(_) | TokenKind::Eof => (AddressingMode::Implied, Operand::None),
            _ => {
                let token = self.lexer.next_token();
                return Err(unexpected("operand", &token));
            }
        };

        if !self.tables.supports(mnemonic, mode) {
            return Err(AsmError::UnsupportedAddressingMode {
                mnemonic,
                mode,
                line,
            });
        }
        Ok(Instruction::new(mnemonic, mode, operand, line))
    }

    /// Everything after `(`.
    fn indirect(&mut self) -> Result<(AddressingMode, Operand), AsmError> {
        let base = self.expect_literal()?;
        if let Operand::Word(_) = base {
            self.expect(TokenKind::RParen)?;
            return Ok((AddressingMode::Indirect, base));
        }

        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::RParen => {
                if self.lexer.peek().kind != TokenKind::Comma {
                    return Err(AsmError::UnexpectedToken {
                        expected: "4-digit address in ($hhhh)".to_string(),
                        found: format!("byte {base}"),
                        line: token.line,
                    });
                }
                self.lexer.next_token();
                self.expect_index(Register::Y)?;
                Ok((AddressingMode::IndirectIndexedY, base))
            }
            TokenKind::Comma => {
                self.expect_index(Register::X)?;
                self.expect(TokenKind::RParen)?;
                Ok((AddressingMode::IndexedIndirectX, base))
            }
            _ => Err(unexpected("')' or ','", &token)),
        }
    }

    /// Index register after `$base,`.
    fn indexed(
        &mut self,
        mnemonic: Mnemonic,
        zero_page: bool,
        line: usize,
    ) -> Result<AddressingMode, AsmError> {
        let (reg, reg_line) = self.expect_register()?;
        let invalid = AsmError::InvalidRegister {
            found: reg.as_char(),
            line: reg_line,
        };
        let Some(mode) = AddressingMode::indexed(zero_page, reg) else {
            return Err(invalid);
        };
        if self.tables.supports(mnemonic, mode) {
            return Ok(mode);
        }
        match mode.other_index() {
            Some(other) if self.tables.supports(mnemonic, other) => Err(invalid),
            _ => Err(AsmError::UnsupportedAddressingMode {
                mnemonic,
                mode,
                line,
            }),
        }
    }

    // ===== Token expectations =====

    fn expect(&mut self, kind: TokenKind) -> Result<(), AsmError> {
        let token = self.lexer.next_token();
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(&kind.to_string(), &token))
        }
    }

    fn expect_register(&mut self) -> Result<(Register, usize), AsmError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Register(reg) => Ok((reg, token.line)),
            _ => Err(unexpected("register", &token)),
        }
    }

    fn expect_index(&mut self, required: Register) -> Result<(), AsmError> {
        let (reg, line) = self.expect_register()?;
        if reg == required {
            Ok(())
        } else {
            Err(AsmError::InvalidRegister {
                found: reg.as_char(),
                line,
            })
        }
    }

    /// `$` followed by a 2 or 4 digit hex literal.
    fn expect_literal(&mut self) -> Result<Operand, AsmError> {
        self.expect(TokenKind::Dollar)?;
        let token = self.lexer.next_token();
        let line = token.line;
        match token.kind {
            TokenKind::Byte(b) => Ok(Operand::Byte(b)),
            TokenKind::Word(w) => Ok(Operand::Word(w)),
            TokenKind::Invalid(text) | TokenKind::Mnemonic(text) => {
                Err(AsmError::MalformedLiteral { text, line })
            }
            TokenKind::Register(reg) => Err(AsmError::MalformedLiteral {
                text: reg.to_string(),
                line,
            }),
            _ => Err(unexpected("hex literal", &token)),
        }
    }

    fn expect_byte(&mut self) -> Result<Operand, AsmError> {
        let line = self.lexer.line();
        match self.expect_literal()? {
            Operand::Word(w) => Err(AsmError::UnexpectedToken {
                expected: "byte".to_string(),
                found: TokenKind::Word(w).to_string(),
                line,
            }),
            operand => Ok(operand),
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Instruction, AsmError>;

    /// Stops after end of input or after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_instruction();
        self.failed = result.is_err();
        result.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AddressingMode::*;

    fn resolve(src: &str) -> Result<Instruction, AsmError> {
        Parser::new(src)
            .next_instruction()
            .map(|i| i.expect("source has an instruction"))
    }

    fn mode_of(src: &str) -> AddressingMode {
        match resolve(src) {
            Ok(i) => i.mode,
            Err(e) => panic!("{src}: {e}"),
        }
    }

    #[test]
    fn load_accumulator_shapes() {
        assert_eq!(mode_of("LDA #$10"), Immediate);
        assert_eq!(mode_of("LDA $3F"), ZeroPage);
        assert_eq!(mode_of("LDA $003F"), Absolute);
        assert_eq!(mode_of("LDA $44,X"), ZeroPageIndexedX);
        assert_eq!(mode_of("LDA $4400,X"), AbsoluteIndexedX);
        assert_eq!(mode_of("LDA $4400,Y"), AbsoluteIndexedY);
        assert_eq!(mode_of("LDA ($44),Y"), IndirectIndexedY);
        assert_eq!(mode_of("LDA ($44,X)"), IndexedIndirectX);
        assert_eq!(mode_of("lda ( $44 , x )"), IndexedIndirectX);
    }

    #[test]
    fn literal_width_decides_operand() {
        let zp = resolve("LDA $3F").unwrap();
        assert_eq!(zp.operand, Operand::Byte(0x3F));
        let abs = resolve("LDA $003F").unwrap();
        assert_eq!(abs.operand, Operand::Word(0x003F));
    }

    #[test]
    fn other_families() {
        assert_eq!(mode_of("LDX $10,Y"), ZeroPageIndexedY);
        assert_eq!(mode_of("STX $10,Y"), ZeroPageIndexedY);
        assert_eq!(mode_of("LDY $1000,X"), AbsoluteIndexedX);
        assert_eq!(mode_of("JMP ($FFFC)"), Indirect);
        assert_eq!(mode_of("JSR $2000"), Absolute);
        assert_eq!(mode_of("ASL"), Accumulator);
        assert_eq!(mode_of("ror a"), Accumulator);
        assert_eq!(mode_of("ASL $10,X"), ZeroPageIndexedX);
        assert_eq!(mode_of("BNE $0810"), Relative);
        assert_eq!(mode_of("BEQ $10"), Relative);
        assert_eq!(mode_of("CLC"), Implied);
    }

    #[test]
    fn bare_operands_stop_at_next_mnemonic() {
        let instructions: Vec<_> = Parser::new("LSR\nTAX\nROL A\nRTS")
            .map(|r| r.unwrap().mode)
            .collect();
        assert_eq!(instructions, vec![Accumulator, Implied, Accumulator, Implied]);
    }

    #[test]
    fn wrong_register_is_rejected() {
        assert!(matches!(
            resolve("LDA ($44),X"),
            Err(AsmError::InvalidRegister { found: 'X', line: 1 })
        ));
        assert!(matches!(
            resolve("LDA ($44,Y)"),
            Err(AsmError::InvalidRegister { found: 'Y', line: 1 })
        ));
        assert!(matches!(
            resolve("LDA $44,Y"),
            Err(AsmError::InvalidRegister { found: 'Y', .. })
        ));
        assert!(matches!(
            resolve("LDX $44,X"),
            Err(AsmError::InvalidRegister { found: 'X', .. })
        ));
        assert!(matches!(
            resolve("LDA $4400,A"),
            Err(AsmError::InvalidRegister { found: 'A', .. })
        ));
    }

    #[test]
    fn unsupported_modes() {
        assert!(matches!(
            resolve("STA #$10"),
            Err(AsmError::UnsupportedAddressingMode { mnemonic: Mnemonic::STA, mode: Immediate, .. })
        ));
        assert!(matches!(
            resolve("JMP $10"),
            Err(AsmError::UnsupportedAddressingMode { mode: ZeroPage, .. })
        ));
        assert!(matches!(
            resolve("CPX $10,X"),
            Err(AsmError::UnsupportedAddressingMode { mode: ZeroPageIndexedX, .. })
        ));
        assert!(matches!(
            resolve("LDA"),
            Err(AsmError::UnsupportedAddressingMode { mode: Implied, .. })
        ));
        assert!(matches!(
            resolve("LDA A"),
            Err(AsmError::UnsupportedAddressingMode { mode: Accumulator, .. })
        ));
        assert!(matches!(
            resolve("LDA ($1234)"),
            Err(AsmError::UnsupportedAddressingMode { mode: Indirect, .. })
        ));
    }

    #[test]
    fn malformed_and_unexpected_tokens() {
        assert!(matches!(
            resolve("\nLDA $G5"),
            Err(AsmError::MalformedLiteral { line: 2, .. })
        ));
        assert!(matches!(
            resolve("LDA $123"),
            Err(AsmError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            resolve("LDA #$1234"),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            resolve("LDA #10"),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            resolve("LDA ($44"),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            resolve("$10"),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            resolve("LDZ #$10"),
            Err(AsmError::UnknownMnemonic { .. })
        ));
    }

    #[test]
    fn unexpected_token_reports_both_sides() {
        let err = resolve("LDA ($44),\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: expected register, found end of input");
    }

    #[test]
    fn byte_base_needs_an_index_inside_parentheses() {
        let err = resolve("JMP ($44)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: expected 4-digit address in ($hhhh), found byte $44"
        );
        assert!(matches!(
            resolve("LDA ($44)\nNOP"),
            Err(AsmError::UnexpectedToken { line: 1, .. })
        ));
    }

    #[test]
    fn iterator_stops_after_error() {
        let results: Vec<_> = Parser::new("NOP\nLDA $G5\nNOP").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
