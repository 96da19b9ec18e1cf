//! Main assembler implementation

#[cfg(feature = "listing")]
use std::fs::File;
use std::io::{self, Write};

use tracing::info;

use crate::encoder::{EncodedInstruction, Encoder, ProgramCounter};
use crate::error::AsmError;
use crate::instruction::Instruction;
use crate::parser::Parser;

/// One assembled instruction and where it was placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub address: u16,
    pub instruction: Instruction,
    pub encoded: EncodedInstruction,
}

/// Single-pass driver: pulls instructions from the parser and encodes each
/// one at the running program counter.
pub struct Assembler {
    encoder: Encoder,
    origin: u16,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            encoder: Encoder::new(),
            origin: 0x0000,
        }
    }

    pub fn with_origin(origin: u16) -> Self {
        Self {
            origin,
            ..Self::new()
        }
    }

    // ===== Public API =====

    pub fn set_origin(&mut self, addr: u16) {
        self.origin = addr;
    }

    pub fn origin(&self) -> u16 {
        self.origin
    }

    /// Encoded instructions in source order.
    pub fn assemble(&self, src: &str) -> Result<Vec<EncodedInstruction>, AsmError> {
        Ok(self
            .assemble_full(src)?
            .into_iter()
            .map(|item| item.encoded)
            .collect())
    }

    /// The flat output image.
    pub fn assemble_bytes(&self, src: &str) -> Result<Vec<u8>, AsmError> {
        let mut out = Vec::new();
        self.assemble_into(src, &mut out)?;
        Ok(out)
    }

    /// Replace the contents of `out` with the output image. `out` is left
    /// empty on error.
    pub fn assemble_into(&self, src: &str, out: &mut Vec<u8>) -> Result<(), AsmError> {
        out.clear();
        for encoded in self.assemble(src)? {
            out.extend_from_slice(encoded.as_bytes());
        }
        Ok(())
    }

    pub fn assemble_full(&self, src: &str) -> Result<Vec<Item>, AsmError> {
        let mut pc = ProgramCounter::new(self.origin);
        let mut items = Vec::new();

        for instruction in Parser::new(src) {
            let instruction = instruction?;
            let encoded = self.encoder.encode_at(&instruction, &pc)?;
            items.push(Item {
                address: pc.address(),
                instruction,
                encoded,
            });
            pc.advance(&encoded);
        }

        let bytes: usize = items.iter().map(|item| item.encoded.len()).sum();
        info!(
            instructions = items.len(),
            bytes,
            origin = self.origin,
            "assembled"
        );
        Ok(items)
    }

    pub fn write_bin<W: Write>(bytes: &[u8], mut w: W) -> io::Result<()> {
        w.write_all(bytes)
    }

    // ===== Listing (feature-gated) =====

    #[cfg(feature = "listing")]
    pub fn print_assembly_listing(&self, items: &[Item]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        Self::write_listing(items, &mut out)?;
        out.flush()
    }

    #[cfg(feature = "listing")]
    pub fn save_listing<P: AsRef<std::path::Path>>(&self, items: &[Item], filename: P) -> io::Result<()> {
        let f = File::create(filename)?;
        let mut w = io::BufWriter::new(f);
        Self::write_listing(items, &mut w)?;
        w.flush()
    }

    #[cfg(feature = "listing")]
    pub fn write_listing<W: Write>(items: &[Item], w: &mut W) -> io::Result<()> {
        writeln!(w, "Assembly Listing:")?;
        writeln!(w, "Address:  Machine Code  Assembly")?;
        writeln!(w, "{}", "-".repeat(50))?;
        for item in items {
            let hex_bytes = item
                .encoded
                .as_bytes()
                .iter()
                .map(|b| format!("${:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(w, "${:04X}: {:<12}  {}", item.address, hex_bytes, item.instruction)?;
        }
        Ok(())
    }
}
