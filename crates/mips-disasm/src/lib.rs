//! A table-driven disassembler for MIPS32 instruction words.
//!
//! ```
//! let instr = mips_disasm::decode(0x012A_4020, 0).unwrap();
//! assert_eq!(instr.to_string(), "add $t0, $t1, $t2");
//! ```

#![warn(clippy::all)]

pub mod bits;
mod disassembler;
mod error;
pub mod format;
pub mod instruction;
pub mod register;

pub use crate::{
    disassembler::{decode_parallel, Disassembler},
    error::{Error, Result},
    instruction::{decode, DecodedInstruction, InstructionFormat, InstructionWord, Mnemonic},
};

pub const INSTRUCTION_SIZE: usize = 4;
