//! The opcode tables. Every family is a dense array indexed by the field it dispatches on,
//! reserved encodings are the empty slots.

use super::{InstructionFormat, InstructionWord, Mnemonic};
use crate::format::OperandShape;

/// An immutable opcode table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDescriptor {
    pub mnemonic: Mnemonic,
    pub format: InstructionFormat,
    pub shape: OperandShape,
}

type Table<const N: usize> = [Option<InstructionDescriptor>; N];

const fn build<const N: usize>(entries: &[(u8, InstructionDescriptor)]) -> Table<N> {
    let mut table = [None; N];
    let mut i = 0;
    while i < entries.len() {
        let (slot, descriptor) = entries[i];
        assert!((slot as usize) < N, "slot does not fit in the table");
        assert!(table[slot as usize].is_none(), "slot is defined twice");
        table[slot as usize] = Some(descriptor);
        i += 1;
    }
    table
}

macro_rules! entry {
    ($slot:expr, $mnemonic:ident, $format:ident, $shape:ident) => {
        (
            $slot,
            InstructionDescriptor {
                mnemonic: Mnemonic::$mnemonic,
                format: InstructionFormat::$format,
                shape: OperandShape::$shape,
            },
        )
    };
}

static NOP: InstructionDescriptor = InstructionDescriptor {
    mnemonic: Mnemonic::Nop,
    format: InstructionFormat::Register,
    shape: OperandShape::None,
};

/// Opcode 0, indexed by the function code.
#[rustfmt::skip]
static SPECIAL: Table<64> = build(&[
    entry!(0x00, Sll,     Register, Shift),
    entry!(0x02, Srl,     Register, Shift),
    entry!(0x03, Sra,     Register, Shift),
    entry!(0x04, Sllv,    Register, ShiftVariable),
    entry!(0x06, Srlv,    Register, ShiftVariable),
    entry!(0x07, Srav,    Register, ShiftVariable),
    entry!(0x08, Jr,      Register, JumpRegister),
    entry!(0x09, Jalr,    Register, JumpLinkRegister),
    entry!(0x0C, Syscall, Register, Code),
    entry!(0x0D, Break,   Register, Code),
    entry!(0x10, Mfhi,    Register, MoveFrom),
    entry!(0x11, Mthi,    Register, MoveTo),
    entry!(0x12, Mflo,    Register, MoveFrom),
    entry!(0x13, Mtlo,    Register, MoveTo),
    entry!(0x18, Mult,    Register, SourceTarget),
    entry!(0x19, Multu,   Register, SourceTarget),
    entry!(0x1A, Div,     Register, SourceTarget),
    entry!(0x1B, Divu,    Register, SourceTarget),
    entry!(0x20, Add,     Register, DestinationSourceTarget),
    entry!(0x21, Addu,    Register, DestinationSourceTarget),
    entry!(0x22, Sub,     Register, DestinationSourceTarget),
    entry!(0x23, Subu,    Register, DestinationSourceTarget),
    entry!(0x24, And,     Register, DestinationSourceTarget),
    entry!(0x25, Or,      Register, DestinationSourceTarget),
    entry!(0x26, Xor,     Register, DestinationSourceTarget),
    entry!(0x27, Nor,     Register, DestinationSourceTarget),
    entry!(0x2A, Slt,     Register, DestinationSourceTarget),
    entry!(0x2B, Sltu,    Register, DestinationSourceTarget),
]);

/// Opcode 1, indexed by the `rt` field.
#[rustfmt::skip]
static REGIMM: Table<32> = build(&[
    entry!(0x00, Bltz,   Immediate, BranchZero),
    entry!(0x01, Bgez,   Immediate, BranchZero),
    entry!(0x08, Tgei,   Immediate, TrapImmediate),
    entry!(0x09, Tgeiu,  Immediate, TrapImmediate),
    entry!(0x0A, Tlti,   Immediate, TrapImmediate),
    entry!(0x0B, Tltiu,  Immediate, TrapImmediate),
    entry!(0x0C, Teqi,   Immediate, TrapImmediate),
    entry!(0x0E, Tnei,   Immediate, TrapImmediate),
    entry!(0x10, Bltzal, Immediate, BranchZero),
    entry!(0x11, Bgezal, Immediate, BranchZero),
]);

/// Opcode 0x1C, indexed by the function code.
#[rustfmt::skip]
static SPECIAL2: Table<64> = build(&[
    entry!(0x00, Madd,  Register, SourceTarget),
    entry!(0x01, Maddu, Register, SourceTarget),
    entry!(0x02, Mul,   Register, DestinationSourceTarget),
    entry!(0x04, Msub,  Register, SourceTarget),
    entry!(0x05, Msubu, Register, SourceTarget),
    entry!(0x20, Clz,   Register, DestinationSource),
    entry!(0x21, Clo,   Register, DestinationSource),
]);

/// Every other opcode, indexed by the opcode itself.
#[rustfmt::skip]
static PRIMARY: Table<64> = build(&[
    entry!(0x02, J,     Jump,      Jump),
    entry!(0x03, Jal,   Jump,      Jump),
    entry!(0x04, Beq,   Immediate, Branch),
    entry!(0x05, Bne,   Immediate, Branch),
    entry!(0x06, Blez,  Immediate, BranchZero),
    entry!(0x07, Bgtz,  Immediate, BranchZero),
    entry!(0x08, Addi,  Immediate, ArithmeticImmediate),
    entry!(0x09, Addiu, Immediate, ArithmeticImmediate),
    entry!(0x0A, Slti,  Immediate, ArithmeticImmediate),
    entry!(0x0B, Sltiu, Immediate, ArithmeticImmediate),
    entry!(0x0C, Andi,  Immediate, LogicalImmediate),
    entry!(0x0D, Ori,   Immediate, LogicalImmediate),
    entry!(0x0E, Xori,  Immediate, LogicalImmediate),
    entry!(0x0F, Lui,   Immediate, LoadImmediate),
    entry!(0x18, Llo,   Immediate, LoadImmediate),
    entry!(0x19, Lhi,   Immediate, LoadImmediate),
    entry!(0x1A, Trap,  Jump,      TrapCode),
    entry!(0x20, Lb,    Immediate, Memory),
    entry!(0x21, Lh,    Immediate, Memory),
    entry!(0x22, Lwl,   Immediate, Memory),
    entry!(0x23, Lw,    Immediate, Memory),
    entry!(0x24, Lbu,   Immediate, Memory),
    entry!(0x25, Lhu,   Immediate, Memory),
    entry!(0x26, Lwr,   Immediate, Memory),
    entry!(0x28, Sb,    Immediate, Memory),
    entry!(0x29, Sh,    Immediate, Memory),
    entry!(0x2A, Swl,   Immediate, Memory),
    entry!(0x2B, Sw,    Immediate, Memory),
    entry!(0x2E, Swr,   Immediate, Memory),
    entry!(0x30, Ll,    Immediate, Memory),
    entry!(0x38, Sc,    Immediate, Memory),
]);

/// The table an instruction word is looked up in, selected by its primary opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Special,
    RegImm,
    Special2,
    Primary,
}

impl Family {
    pub const SPECIAL_OPCODE: u8 = 0x00;
    pub const REGIMM_OPCODE: u8 = 0x01;
    pub const SPECIAL2_OPCODE: u8 = 0x1C;

    pub const ALL: [Self; 4] = [Self::Special, Self::RegImm, Self::Special2, Self::Primary];

    #[must_use]
    pub fn of(word: InstructionWord) -> Self {
        match word.opcode() {
            Self::SPECIAL_OPCODE => Self::Special,
            Self::REGIMM_OPCODE => Self::RegImm,
            Self::SPECIAL2_OPCODE => Self::Special2,
            _ => Self::Primary,
        }
    }

    /// The value of the field this family's table is indexed by.
    #[must_use]
    pub fn selector(self, word: InstructionWord) -> u8 {
        match self {
            Self::Special | Self::Special2 => word.funct(),
            Self::RegImm => word.rt(),
            Self::Primary => word.opcode(),
        }
    }

    /// The secondary field used for dispatch, `None` for instructions identified by their opcode alone.
    #[must_use]
    pub fn sub_field(self, word: InstructionWord) -> Option<u8> {
        match self {
            Self::Primary => None,
            _ => Some(self.selector(word)),
        }
    }

    fn table(self) -> &'static [Option<InstructionDescriptor>] {
        match self {
            Self::Special => &SPECIAL,
            Self::RegImm => &REGIMM,
            Self::Special2 => &SPECIAL2,
            Self::Primary => &PRIMARY,
        }
    }

    /// Iterates over the defined slots of this family's table.
    pub fn entries(self) -> impl Iterator<Item = (u8, &'static InstructionDescriptor)> {
        self.table()
            .iter()
            .enumerate()
            .filter_map(|(slot, descriptor)| Some((slot as u8, descriptor.as_ref()?)))
    }
}

/// Looks up the descriptor for an instruction word, or `None` if the encoding is reserved.
#[must_use]
pub fn lookup(word: InstructionWord) -> Option<&'static InstructionDescriptor> {
    if word.raw() == 0 {
        return Some(&NOP);
    }

    let family = Family::of(word);
    family
        .table()
        .get(usize::from(family.selector(word)))?
        .as_ref()
}
