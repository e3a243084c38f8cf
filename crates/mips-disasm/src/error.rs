use crate::INSTRUCTION_SIZE;
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The opcode table has no entry for this word. Recoverable, decoding can continue with the next word.
    #[error(
        "unrecognized instruction {word:#010x} at {address:#x} (opcode {opcode:#04x}{})",
        describe_sub_field(.function)
    )]
    UnrecognizedInstruction {
        address: u32,
        word: u32,
        opcode: u8,
        /// The secondary field the opcode family dispatched on, if any.
        function: Option<u8>,
    },

    /// The input ended in the middle of an instruction.
    #[error(
        "truncated instruction at {address:#x}: expected {size} bytes, found {available}",
        size = INSTRUCTION_SIZE
    )]
    TruncatedInstruction { address: u32, available: usize },

    #[error("failed to read instruction stream: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether decoding can continue past this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnrecognizedInstruction { .. })
    }
}

fn describe_sub_field(function: &Option<u8>) -> String {
    function
        .map(|function| format!(", function {function:#04x}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
