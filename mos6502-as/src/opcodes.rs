//! 6502 opcode tables and initialization

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::addressing::AddressingMode::{self, *};
use crate::mnemonic::Mnemonic::{self, *};

/// Every documented NMOS 6502 opcode, grouped by mnemonic.
const ISA: &[(Mnemonic, &[(AddressingMode, u8)])] = &[
    // Load/store
    (LDA, &[
        (Immediate, 0xA9), (ZeroPage, 0xA5), (ZeroPageIndexedX, 0xB5),
        (Absolute, 0xAD), (AbsoluteIndexedX, 0xBD), (AbsoluteIndexedY, 0xB9),
        (IndexedIndirectX, 0xA1), (IndirectIndexedY, 0xB1),
    ]),
    (LDX, &[
        (Immediate, 0xA2), (ZeroPage, 0xA6), (ZeroPageIndexedY, 0xB6),
        (Absolute, 0xAE), (AbsoluteIndexedY, 0xBE),
    ]),
    (LDY, &[
        (Immediate, 0xA0), (ZeroPage, 0xA4), (ZeroPageIndexedX, 0xB4),
        (Absolute, 0xAC), (AbsoluteIndexedX, 0xBC),
    ]),
    (STA, &[
        (ZeroPage, 0x85), (ZeroPageIndexedX, 0x95),
        (Absolute, 0x8D), (AbsoluteIndexedX, 0x9D), (AbsoluteIndexedY, 0x99),
        (IndexedIndirectX, 0x81), (IndirectIndexedY, 0x91),
    ]),
    (STX, &[(ZeroPage, 0x86), (ZeroPageIndexedY, 0x96), (Absolute, 0x8E)]),
    (STY, &[(ZeroPage, 0x84), (ZeroPageIndexedX, 0x94), (Absolute, 0x8C)]),
    // Arithmetic and logic
    (ADC, &[
        (Immediate, 0x69), (ZeroPage, 0x65), (ZeroPageIndexedX, 0x75),
        (Absolute, 0x6D), (AbsoluteIndexedX, 0x7D), (AbsoluteIndexedY, 0x79),
        (IndexedIndirectX, 0x61), (IndirectIndexedY, 0x71),
    ]),
    (SBC, &[
        (Immediate, 0xE9), (ZeroPage, 0xE5), (ZeroPageIndexedX, 0xF5),
        (Absolute, 0xED), (AbsoluteIndexedX, 0xFD), (AbsoluteIndexedY, 0xF9),
        (IndexedIndirectX, 0xE1), (IndirectIndexedY, 0xF1),
    ]),
    (AND, &[
        (Immediate, 0x29), (ZeroPage, 0x25), (ZeroPageIndexedX, 0x35),
        (Absolute, 0x2D), (AbsoluteIndexedX, 0x3D), (AbsoluteIndexedY, 0x39),
        (IndexedIndirectX, 0x21), (IndirectIndexedY, 0x31),
    ]),
    (ORA, &[
        (Immediate, 0x09), (ZeroPage, 0x05), (ZeroPageIndexedX, 0x15),
        (Absolute, 0x0D), (AbsoluteIndexedX, 0x1D), (AbsoluteIndexedY, 0x19),
        (IndexedIndirectX, 0x01), (IndirectIndexedY, 0x11),
    ]),
    (EOR, &[
        (Immediate, 0x49), (ZeroPage, 0x45), (ZeroPageIndexedX, 0x55),
        (Absolute, 0x4D), (AbsoluteIndexedX, 0x5D), (AbsoluteIndexedY, 0x59),
        (IndexedIndirectX, 0x41), (IndirectIndexedY, 0x51),
    ]),
    (CMP, &[
        (Immediate, 0xC9), (ZeroPage, 0xC5), (ZeroPageIndexedX, 0xD5),
        (Absolute, 0xCD), (AbsoluteIndexedX, 0xDD), (AbsoluteIndexedY, 0xD9),
        (IndexedIndirectX, 0xC1), (IndirectIndexedY, 0xD1),
    ]),
    (CPX, &[(Immediate, 0xE0), (ZeroPage, 0xE4), (Absolute, 0xEC)]),
    (CPY, &[(Immediate, 0xC0), (ZeroPage, 0xC4), (Absolute, 0xCC)]),
    (BIT, &[(ZeroPage, 0x24), (Absolute, 0x2C)]),
    (INC, &[(ZeroPage, 0xE6), (ZeroPageIndexedX, 0xF6), (Absolute, 0xEE), (AbsoluteIndexedX, 0xFE)]),
    (DEC, &[(ZeroPage, 0xC6), (ZeroPageIndexedX, 0xD6), (Absolute, 0xCE), (AbsoluteIndexedX, 0xDE)]),
    (INX, &[(Implied, 0xE8)]),
    (INY, &[(Implied, 0xC8)]),
    (DEX, &[(Implied, 0xCA)]),
    (DEY, &[(Implied, 0x88)]),
    // Shifts/rotates
    (ASL, &[(Accumulator, 0x0A), (ZeroPage, 0x06), (ZeroPageIndexedX, 0x16), (Absolute, 0x0E), (AbsoluteIndexedX, 0x1E)]),
    (LSR, &[(Accumulator, 0x4A), (ZeroPage, 0x46), (ZeroPageIndexedX, 0x56), (Absolute, 0x4E), (AbsoluteIndexedX, 0x5E)]),
    (ROL, &[(Accumulator, 0x2A), (ZeroPage, 0x26), (ZeroPageIndexedX, 0x36), (Absolute, 0x2E), (AbsoluteIndexedX, 0x3E)]),
    (ROR, &[(Accumulator, 0x6A), (ZeroPage, 0x66), (ZeroPageIndexedX, 0x76), (Absolute, 0x6E), (AbsoluteIndexedX, 0x7E)]),
    // Jumps and branches
    (JMP, &[(Absolute, 0x4C), (Indirect, 0x6C)]),
    (JSR, &[(Absolute, 0x20)]),
    (RTS, &[(Implied, 0x60)]),
    (RTI, &[(Implied, 0x40)]),
    (BCC, &[(Relative, 0x90)]),
    (BCS, &[(Relative, 0xB0)]),
    (BEQ, &[(Relative, 0xF0)]),
    (BMI, &[(Relative, 0x30)]),
    (BNE, &[(Relative, 0xD0)]),
    (BPL, &[(Relative, 0x10)]),
    (BVC, &[(Relative, 0x50)]),
    (BVS, &[(Relative, 0x70)]),
    // Flags
    (CLC, &[(Implied, 0x18)]),
    (SEC, &[(Implied, 0x38)]),
    (CLD, &[(Implied, 0xD8)]),
    (SED, &[(Implied, 0xF8)]),
    (CLI, &[(Implied, 0x58)]),
    (SEI, &[(Implied, 0x78)]),
    (CLV, &[(Implied, 0xB8)]),
    // Transfers and stack
    (TAX, &[(Implied, 0xAA)]),
    (TXA, &[(Implied, 0x8A)]),
    (TAY, &[(Implied, 0xA8)]),
    (TYA, &[(Implied, 0x98)]),
    (TSX, &[(Implied, 0xBA)]),
    (TXS, &[(Implied, 0x9A)]),
    (PHA, &[(Implied, 0x48)]),
    (PLA, &[(Implied, 0x68)]),
    (PHP, &[(Implied, 0x08)]),
    (PLP, &[(Implied, 0x28)]),
    // System
    (BRK, &[(Implied, 0x00)]),
    (NOP, &[(Implied, 0xEA)]),
];

static TABLES: LazyLock<OpcodeTables> = LazyLock::new(OpcodeTables::new);

pub struct OpcodeTables {
    /// mnemonic -> addressing mode -> opcode
    opcodes: HashMap<Mnemonic, HashMap<AddressingMode, u8>>,
}

impl OpcodeTables {
    fn new() -> Self {
        let opcodes = ISA
            .iter()
            .map(|&(mnemonic, modes)| (mnemonic, modes.iter().copied().collect::<HashMap<_, _>>()))
            .collect();
        Self { opcodes }
    }

    /// Process-wide table, built on first use.
    pub fn get() -> &'static OpcodeTables {
        &TABLES
    }

    pub fn lookup(&self, mnemonic: Mnemonic, mode: AddressingMode) -> Option<u8> {
        self.opcodes.get(&mnemonic).and_then(|m| m.get(&mode)).copied()
    }

    pub fn supports(&self, mnemonic: Mnemonic, mode: AddressingMode) -> bool {
        self.lookup(mnemonic, mode).is_some()
    }

    /// All `(mnemonic, mode, opcode)` triples.
    pub fn entries(&self) -> impl Iterator<Item = (Mnemonic, AddressingMode, u8)> + '_ {
        self.opcodes
            .iter()
            .flat_map(|(&m, modes)| modes.iter().map(move |(&mode, &op)| (m, mode, op)))
    }
}
