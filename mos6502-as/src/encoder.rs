//! Instruction encoding

use tracing::trace;

use crate::addressing::AddressingMode;
use crate::error::AsmError;
use crate::instruction::{Instruction, Operand};
use crate::opcodes::OpcodeTables;

/// Opcode followed by 0 to 2 little-endian operand bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodedInstruction {
    bytes: [u8; 3],
    len: u8,
}

impl EncodedInstruction {
    fn new(opcode: u8) -> Self {
        Self {
            bytes: [opcode, 0, 0],
            len: 1,
        }
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len as usize] = byte;
        self.len += 1;
    }

    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false: an encoding holds at least the opcode.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for EncodedInstruction {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Supplies the load address of the instruction being encoded, so branch
/// targets can become relative displacements.
pub trait AddressResolver {
    fn current_address(&self) -> u16;
}

/// Address tracking from an origin, advanced by each encoded instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramCounter {
    address: u16,
}

impl ProgramCounter {
    pub fn new(origin: u16) -> Self {
        Self { address: origin }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn advance(&mut self, encoded: &EncodedInstruction) {
        self.address = self.address.wrapping_add(encoded.len() as u16);
    }
}

impl AddressResolver for ProgramCounter {
    fn current_address(&self) -> u16 {
        self.address
    }
}

/// Signed distance from the instruction after a branch at `from` to `to`.
/// Wraps around the 64K address space like the CPU does.
fn branch_offset(from: u16, to: u16) -> i32 {
    to.wrapping_sub(from.wrapping_add(2)) as i16 as i32
}

pub struct Encoder {
    tables: &'static OpcodeTables,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            tables: OpcodeTables::get(),
        }
    }

    /// Encode without address information. Branches are rejected.
    pub fn encode(&self, instruction: &Instruction) -> Result<EncodedInstruction, AsmError> {
        self.encode_with(instruction, None)
    }

    /// Encode an instruction placed at `resolver.current_address()`.
    pub fn encode_at(
        &self,
        instruction: &Instruction,
        resolver: &dyn AddressResolver,
    ) -> Result<EncodedInstruction, AsmError> {
        self.encode_with(instruction, Some(resolver))
    }

    fn encode_with(
        &self,
        instruction: &Instruction,
        resolver: Option<&dyn AddressResolver>,
    ) -> Result<EncodedInstruction, AsmError> {
        let Instruction {
            mnemonic,
            mode,
            operand,
            line,
        } = *instruction;
        let unsupported = || AsmError::UnsupportedAddressingMode {
            mnemonic,
            mode,
            line,
        };

        let opcode = self.tables.lookup(mnemonic, mode).ok_or_else(unsupported)?;
        if !instruction.operand_fits_mode() {
            return Err(AsmError::OperandWidth { mnemonic, mode });
        }

        let mut encoded = EncodedInstruction::new(opcode);
        match (mode, operand) {
            (AddressingMode::Relative, _) => {
                let resolver = resolver.ok_or_else(unsupported)?;
                let target = operand
                    .value()
                    .ok_or(AsmError::OperandWidth { mnemonic, mode })?;
                let offset = branch_offset(resolver.current_address(), target);
                let displacement = i8::try_from(offset).map_err(|_| AsmError::BranchOutOfRange {
                    target,
                    offset,
                    line,
                })?;
                encoded.push(displacement as u8);
            }
            (_, Operand::None) => {}
            (_, Operand::Byte(b)) => encoded.push(b),
            (_, Operand::Word(w)) => {
                for b in w.to_le_bytes() {
                    encoded.push(b);
                }
            }
        }

        trace!(line, instruction = %instruction, bytes = ?encoded.as_bytes(), "encoded");
        Ok(encoded)
    }
}
