//! Error types for the assembler

use thiserror::Error;

use crate::addressing::AddressingMode;
use crate::mnemonic::Mnemonic;

/// Everything that can stop the assembly of a source.
///
/// Parse and encode errors are fatal to the source being assembled: the
/// first one aborts it and no partial output is produced.
#[derive(Debug, Error)]
pub enum AsmError {
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("line {line}: invalid register '{found}' in this position")]
    InvalidRegister { found: char, line: usize },

    #[error("line {line}: malformed hex literal '{text}' (expected 2 or 4 hex digits)")]
    MalformedLiteral { text: String, line: usize },

    #[error("line {line}: unknown mnemonic '{text}'")]
    UnknownMnemonic { text: String, line: usize },

    #[error("line {line}: {mnemonic} does not support {mode} addressing")]
    UnsupportedAddressingMode {
        mnemonic: Mnemonic,
        mode: AddressingMode,
        line: usize,
    },

    #[error("{mnemonic} {mode}: operand width does not match the addressing mode")]
    OperandWidth {
        mnemonic: Mnemonic,
        mode: AddressingMode,
    },

    #[error("line {line}: branch to ${target:04X} out of range (offset {offset})")]
    BranchOutOfRange { target: u16, offset: i32, line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AsmError {
    /// Source line the error was raised on, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::UnexpectedToken { line, .. }
            | AsmError::InvalidRegister { line, .. }
            | AsmError::MalformedLiteral { line, .. }
            | AsmError::UnknownMnemonic { line, .. }
            | AsmError::UnsupportedAddressingMode { line, .. }
            | AsmError::BranchOutOfRange { line, .. } => Some(*line),
            AsmError::OperandWidth { .. } | AsmError::Io(_) => None,
        }
    }
}
