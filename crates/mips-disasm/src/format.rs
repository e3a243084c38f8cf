//! Rendering of instruction operands in assembler syntax.

use crate::instruction::InstructionWord;
use core::fmt;

/// The operand list of an instruction, determines which fields are rendered and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandShape {
    /// No operands at all.
    None,
    /// `rd, rt, sa`
    Shift,
    /// `rd, rt, rs`
    ShiftVariable,
    /// `rs`
    JumpRegister,
    /// `rd, rs`
    JumpLinkRegister,
    /// `rd`
    MoveFrom,
    /// `rs`
    MoveTo,
    /// `rs, rt`, for the multiply and divide families which write to `hi`/`lo`.
    SourceTarget,
    /// `rd, rs, rt`
    DestinationSourceTarget,
    /// `rd, rs`
    DestinationSource,
    /// The 20-bit `syscall`/`break` code, omitted when zero.
    Code,
    /// `rs, rt, offset`
    Branch,
    /// `rs, offset`
    BranchZero,
    /// `rs, immediate`
    TrapImmediate,
    /// `rt, rs, immediate`, with a signed immediate.
    ArithmeticImmediate,
    /// `rt, rs, immediate`, with an unsigned immediate.
    LogicalImmediate,
    /// `rt, immediate`, with an unsigned immediate.
    LoadImmediate,
    /// `rt, offset(rs)`
    Memory,
    /// The sign adjusted 26-bit target, in decimal.
    Jump,
    /// The 26-bit trap code.
    TrapCode,
}

/// A signed number in hexadecimal, with the sign in front of the prefix (`-0x2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedHex(pub i32);

impl fmt::Display for SignedHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:#x}", self.0.unsigned_abs())
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

/// The operands of an instruction word, rendered according to an [`OperandShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    shape: OperandShape,
    word: InstructionWord,
}

impl Operands {
    #[must_use]
    pub const fn new(shape: OperandShape, word: InstructionWord) -> Self {
        Self { shape, word }
    }
}

impl fmt::Display for Operands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = self.word;
        let (rs, rt, rd) = (word.source(), word.target(), word.destination());

        match self.shape {
            OperandShape::None => Ok(()),
            OperandShape::Shift => write!(f, "{rd}, {rt}, {}", word.sa()),
            OperandShape::ShiftVariable => write!(f, "{rd}, {rt}, {rs}"),
            OperandShape::JumpRegister | OperandShape::MoveTo => write!(f, "{rs}"),
            OperandShape::JumpLinkRegister | OperandShape::DestinationSource => {
                write!(f, "{rd}, {rs}")
            }
            OperandShape::MoveFrom => write!(f, "{rd}"),
            OperandShape::SourceTarget => write!(f, "{rs}, {rt}"),
            OperandShape::DestinationSourceTarget => write!(f, "{rd}, {rs}, {rt}"),
            OperandShape::Code => match word.code() {
                0 => Ok(()),
                code => write!(f, "{code:#x}"),
            },
            OperandShape::Branch => {
                write!(f, "{rs}, {rt}, {}", SignedHex(word.signed_immediate()))
            }
            OperandShape::BranchZero | OperandShape::TrapImmediate => {
                write!(f, "{rs}, {}", SignedHex(word.signed_immediate()))
            }
            OperandShape::ArithmeticImmediate => {
                write!(f, "{rt}, {rs}, {}", SignedHex(word.signed_immediate()))
            }
            OperandShape::LogicalImmediate => write!(f, "{rt}, {rs}, {:#x}", word.immediate()),
            OperandShape::LoadImmediate => write!(f, "{rt}, {:#x}", word.immediate()),
            OperandShape::Memory => {
                write!(f, "{rt}, {}({rs})", SignedHex(word.signed_immediate()))
            }
            OperandShape::Jump => write!(f, "{}", word.jump_target()),
            OperandShape::TrapCode => write!(f, "{:#x}", word.jump_field()),
        }
    }
}
