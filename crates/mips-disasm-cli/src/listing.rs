//! Writing decoded instructions out as an assembly listing.

use log::warn;
use mips_disasm::{DecodedInstruction, Error};
use std::io::{self, Write};

#[derive(thiserror::Error, Debug)]
pub enum ListingError {
    #[error(transparent)]
    Decode(#[from] Error),

    #[error("failed to write listing: {0}")]
    Write(#[from] io::Error),
}

/// Directives written around the decoded instructions, so the listing can be assembled again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framing {
    pub prologue: Vec<String>,
    pub epilogue: Vec<String>,
}

impl Framing {
    /// No directives at all, only the instructions.
    pub fn none() -> Self {
        Self {
            prologue: Vec::new(),
            epilogue: Vec::new(),
        }
    }
}

impl Default for Framing {
    /// A `main` entry point, followed by an exit syscall.
    fn default() -> Self {
        Self {
            prologue: vec![".text".into(), ".globl main".into(), "main:".into()],
            epilogue: vec!["li $v0, 10".into(), "syscall".into()],
        }
    }
}

/// What to do when a word does not decode to any instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnrecognizedPolicy {
    /// Stop writing and report the error.
    #[default]
    Abort,
    /// Write a comment line in place of the instruction and continue.
    Comment,
}

/// Statistics about a written listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub instructions: usize,
    pub unrecognized: usize,
}

pub struct Listing<W> {
    writer: W,
    framing: Framing,
    policy: UnrecognizedPolicy,
}

impl<W: Write> Listing<W> {
    pub fn new(writer: W, framing: Framing, policy: UnrecognizedPolicy) -> Self {
        Self {
            writer,
            framing,
            policy,
        }
    }

    /// Writes the framed listing, one line per instruction.
    ///
    /// # Errors
    /// Fails with [`ListingError::Write`] if the writer fails. Truncated or unreadable input, and
    /// unrecognized words unless the policy is [`UnrecognizedPolicy::Comment`], fail with
    /// [`ListingError::Decode`].
    pub fn write(
        mut self,
        instructions: impl IntoIterator<Item = mips_disasm::Result<DecodedInstruction>>,
    ) -> Result<Summary, ListingError> {
        let mut summary = Summary::default();

        for line in &self.framing.prologue {
            writeln!(self.writer, "{line}")?;
        }

        for result in instructions {
            match result {
                Ok(instr) => {
                    writeln!(self.writer, "{instr}")?;
                    summary.instructions += 1;
                }
                Err(e) if e.is_recoverable() && self.policy == UnrecognizedPolicy::Comment => {
                    warn!("{e}");
                    writeln!(self.writer, "# {e}")?;
                    summary.unrecognized += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        for line in &self.framing.epilogue {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;

        Ok(summary)
    }
}
