//! Resolved instructions

use std::fmt;

use crate::addressing::AddressingMode;
use crate::mnemonic::Mnemonic;

/// Operand value as written in the source. Its width is the width of the
/// literal (2 or 4 hex digits), not of the value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
    None,
    Byte(u8),
    Word(u16),
}

impl Operand {
    pub fn width(self) -> usize {
        match self {
            Operand::None => 0,
            Operand::Byte(_) => 1,
            Operand::Word(_) => 2,
        }
    }

    pub fn value(self) -> Option<u16> {
        match self {
            Operand::None => None,
            Operand::Byte(b) => Some(b as u16),
            Operand::Word(w) => Some(w),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Byte(b) => write!(f, "${b:02X}"),
            Operand::Word(w) => write!(f, "${w:04X}"),
        }
    }
}

/// One mnemonic with its resolved addressing mode and operand.
///
/// For [`AddressingMode::Relative`] the operand is the branch target address,
/// which the encoder turns into a one-byte displacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub operand: Operand,
    /// Source line of the mnemonic.
    pub line: usize,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, mode: AddressingMode, operand: Operand, line: usize) -> Self {
        Self {
            mnemonic,
            mode,
            operand,
            line,
        }
    }

    /// Whether the operand has the width the addressing mode requires.
    pub fn operand_fits_mode(&self) -> bool {
        match self.mode {
            AddressingMode::Relative => self.operand != Operand::None,
            mode => self.operand.width() == mode.operand_width(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddressingMode::*;
        let m = self.mnemonic;
        let op = self.operand;
        match self.mode {
            Implied => write!(f, "{m}"),
            Accumulator => write!(f, "{m} A"),
            Immediate => write!(f, "{m} #{op}"),
            ZeroPage | Absolute | Relative => write!(f, "{m} {op}"),
            ZeroPageIndexedX | AbsoluteIndexedX => write!(f, "{m} {op},X"),
            ZeroPageIndexedY | AbsoluteIndexedY => write!(f, "{m} {op},Y"),
            IndexedIndirectX => write!(f, "{m} ({op},X)"),
            IndirectIndexedY => write!(f, "{m} ({op}),Y"),
            Indirect => write!(f, "{m} ({op})"),
        }
    }
}
