//! The 56 official 6502 mnemonics

use std::fmt;
use std::str::FromStr;

macro_rules! mnemonics {
    ($($name:ident),+ $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Mnemonic {
            $($name),+
        }

        impl Mnemonic {
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$name),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Mnemonic::$name => stringify!($name)),+
                }
            }
        }

        impl FromStr for Mnemonic {
            type Err = ();

            /// Case-insensitive lookup of a 3-letter mnemonic.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.len() != 3 {
                    return Err(());
                }
                let upper = s.to_ascii_uppercase();
                match upper.as_str() {
                    $(stringify!($name) => Ok(Mnemonic::$name),)+
                    _ => Err(()),
                }
            }
        }
    };
}

mnemonics! {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
}

/// Operand grammar a mnemonic is parsed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Grammar {
    /// No operand.
    Implied,
    /// `$target`, encoded as a signed displacement.
    Relative,
    /// Bare, `A`, or a memory operand.
    Shift,
    /// Immediate, zero page, absolute, indexed and indirect forms, filtered
    /// by what the opcode table defines for the mnemonic.
    Memory,
}

impl Mnemonic {
    pub fn grammar(self) -> Grammar {
        use Mnemonic::*;
        match self {
            BRK | CLC | CLD | CLI | CLV | DEX | DEY | INX | INY | NOP | PHA | PHP | PLA | PLP
            | RTI | RTS | SEC | SED | SEI | TAX | TAY | TSX | TXA | TXS | TYA => Grammar::Implied,
            BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS => Grammar::Relative,
            ASL | LSR | ROL | ROR => Grammar::Shift,
            ADC | AND | BIT | CMP | CPX | CPY | DEC | EOR | INC | JMP | JSR | LDA | LDX | LDY
            | ORA | SBC | STA | STX | STY => Grammar::Memory,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_set_size() {
        assert_eq!(Mnemonic::ALL.len(), 56);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("lda".parse::<Mnemonic>(), Ok(Mnemonic::LDA));
        assert_eq!("Jmp".parse::<Mnemonic>(), Ok(Mnemonic::JMP));
        assert_eq!("LDZ".parse::<Mnemonic>(), Err(()));
        assert_eq!("LDAX".parse::<Mnemonic>(), Err(()));
    }

    #[test]
    fn names_round_trip() {
        for &m in Mnemonic::ALL {
            assert_eq!(m.as_str().parse::<Mnemonic>(), Ok(m));
        }
    }

    #[test]
    fn grammar_families() {
        let count = |g: Grammar| Mnemonic::ALL.iter().filter(|m| m.grammar() == g).count();
        assert_eq!(count(Grammar::Implied), 25);
        assert_eq!(count(Grammar::Relative), 8);
        assert_eq!(count(Grammar::Shift), 4);
        assert_eq!(count(Grammar::Memory), 19);
    }
}
