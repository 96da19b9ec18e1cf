//! Addressing modes and index registers

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Accumulator,
    Implied,
    Immediate,
    Absolute,
    ZeroPage,
    Relative,
    AbsoluteIndexedX,
    AbsoluteIndexedY,
    ZeroPageIndexedX,
    ZeroPageIndexedY,
    /// `($zp,X)`
    IndexedIndirectX,
    /// `($zp),Y`
    IndirectIndexedY,
    /// `($hhhh)`, JMP only
    Indirect,
}

impl AddressingMode {
    /// Number of operand bytes emitted after the opcode.
    pub fn operand_width(self) -> usize {
        use AddressingMode::*;
        match self {
            Accumulator | Implied => 0,
            Immediate | ZeroPage | ZeroPageIndexedX | ZeroPageIndexedY | IndexedIndirectX
            | IndirectIndexedY | Relative => 1,
            Absolute | AbsoluteIndexedX | AbsoluteIndexedY | Indirect => 2,
        }
    }

    /// Mode selected by `base,reg` where `base` is a zero page or absolute address.
    pub fn indexed(zero_page: bool, reg: Register) -> Option<AddressingMode> {
        match (zero_page, reg) {
            (true, Register::X) => Some(AddressingMode::ZeroPageIndexedX),
            (true, Register::Y) => Some(AddressingMode::ZeroPageIndexedY),
            (false, Register::X) => Some(AddressingMode::AbsoluteIndexedX),
            (false, Register::Y) => Some(AddressingMode::AbsoluteIndexedY),
            (_, Register::A) => None,
        }
    }

    /// The same base addressed through the other index register.
    pub fn other_index(self) -> Option<AddressingMode> {
        use AddressingMode::*;
        match self {
            ZeroPageIndexedX => Some(ZeroPageIndexedY),
            ZeroPageIndexedY => Some(ZeroPageIndexedX),
            AbsoluteIndexedX => Some(AbsoluteIndexedY),
            AbsoluteIndexedY => Some(AbsoluteIndexedX),
            _ => None,
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressingMode::Accumulator => "accumulator",
            AddressingMode::Implied => "implied",
            AddressingMode::Immediate => "immediate",
            AddressingMode::Absolute => "absolute",
            AddressingMode::ZeroPage => "zero page",
            AddressingMode::Relative => "relative",
            AddressingMode::AbsoluteIndexedX => "absolute,X",
            AddressingMode::AbsoluteIndexedY => "absolute,Y",
            AddressingMode::ZeroPageIndexedX => "zero page,X",
            AddressingMode::ZeroPageIndexedY => "zero page,Y",
            AddressingMode::IndexedIndirectX => "(indirect,X)",
            AddressingMode::IndirectIndexedY => "(indirect),Y",
            AddressingMode::Indirect => "indirect",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    X,
    Y,
}

impl Register {
    /// Case-insensitive register name.
    pub fn from_char(c: char) -> Option<Register> {
        match c.to_ascii_uppercase() {
            'A' => Some(Register::A),
            'X' => Some(Register::X),
            'Y' => Some(Register::Y),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Register::A => 'A',
            Register::X => 'X',
            Register::Y => 'Y',
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
