//! Single-pass MOS 6502 assembler
//! - Strict hex-only syntax (`$` prefix, exactly 2 or 4 digits)
//! - The literal's width picks the addressing mode: `$3F` is zero page,
//!   `$003F` is absolute, whatever the value
//! - All 56 official mnemonics and their 151 documented opcodes
//! - Optional human-readable listing (feature: "listing")
//!
//! ## Pipeline
//! 1. **Lexer** ([`Lexer`]) turns source text into tokens on demand.
//! 2. **Operand resolver** ([`Parser`]) runs the grammar of each mnemonic and
//!    yields one [`Instruction`] with its addressing mode.
//! 3. **Encoder** ([`Encoder`]) looks up the opcode and appends the operand
//!    bytes little-endian.
//!
//! Branch targets are absolute addresses in the source. They are turned into
//! displacements using the address the [`Assembler`] tracks from its origin.
//! There are no labels, macros or directives.
//!
//! ## Syntax
//! ```text
//! LDA #$10       ; immediate
//! LDA $44        ; zero page
//! LDA $44,X      ; zero page,X
//! LDA $4400,Y    ; absolute,Y
//! LDA ($44,X)    ; (indirect,X)
//! LDA ($44),Y    ; (indirect),Y
//! JMP ($FFFC)    ; indirect
//! ASL            ; accumulator (also `ASL A`)
//! BNE $0800      ; relative
//! ```
//!
//! ## Basic Usage
//! ```rust
//! use mos6502_as::Assembler;
//!
//! fn main() -> Result<(), mos6502_as::AsmError> {
//!     let assembler = Assembler::with_origin(0x0800);
//!     let src = r#"
//!         LDA #$42
//!         STA $0200
//!     "#;
//!
//!     let bytes = assembler.assemble_bytes(src)?;
//!     assert_eq!(bytes, vec![0xA9, 0x42, 0x8D, 0x00, 0x02]);
//!     Ok(())
//! }
//! ```
//!
//! ## License
//! This project is released under [The Unlicense](https://unlicense.org/).
//! You are free to use it for any purpose, without restriction.

mod addressing;
mod assembler;
mod encoder;
mod error;
mod instruction;
mod mnemonic;
mod opcodes;
pub mod parser;

// Public exports
pub use addressing::{AddressingMode, Register};
pub use assembler::{Assembler, Item};
pub use encoder::{AddressResolver, EncodedInstruction, Encoder, ProgramCounter};
pub use error::AsmError;
pub use instruction::{Instruction, Operand};
pub use mnemonic::{Grammar, Mnemonic};
pub use opcodes::OpcodeTables;
pub use parser::{Lexer, Parser, Token, TokenKind, parse_hex};
