//! Decoding of single MIPS32 instruction words.
//!
//! All instructions are 32 bits wide and use one of three layouts:
//!
//! ```text
//! R-type: [opcode:6][rs:5][rt:5][rd:5][sa:5][funct:6]
//! I-type: [opcode:6][rs:5][rt:5][immediate:16]
//! J-type: [opcode:6][target:26]
//! ```

use crate::{
    bits::BitRange,
    error::{Error, Result},
    format::Operands,
    register::GeneralPurpose,
};
use std::fmt;
use tartan_bitfield::bitfield;

mod mnemonic;
pub mod table;

pub use self::{
    mnemonic::Mnemonic,
    table::{Family, InstructionDescriptor},
};

bitfield! {
    /// A raw instruction word. The named fields follow the R-type layout,
    /// the I-type and J-type payloads overlap them and are read through the accessors below.
    #[derive(Hash)]
    pub struct InstructionWord(u32) {
        /// Function code, selects the operation within the SPECIAL and SPECIAL2 families.
        [0..=5] pub funct: u8,
        /// Shift amount.
        [6..=10] pub sa: u8,
        /// Destination register index.
        [11..=15] pub rd: u8,
        /// Target register index, also the sub-opcode of the REGIMM family.
        [16..=20] pub rt: u8,
        /// Source register index, the base register for memory accesses.
        [21..=25] pub rs: u8,
        /// Primary opcode.
        [26..=31] pub opcode: u8,
    }
}

impl InstructionWord {
    const IMMEDIATE_RANGE: BitRange<0, 16> = BitRange::new();
    const JUMP_RANGE: BitRange<0, 26> = BitRange::new();
    const CODE_RANGE: BitRange<6, 20> = BitRange::new();

    #[must_use]
    pub fn raw(self) -> u32 {
        self.into()
    }

    #[must_use]
    pub fn source(self) -> GeneralPurpose {
        GeneralPurpose::from_field(self.rs().into())
    }

    #[must_use]
    pub fn target(self) -> GeneralPurpose {
        GeneralPurpose::from_field(self.rt().into())
    }

    #[must_use]
    pub fn destination(self) -> GeneralPurpose {
        GeneralPurpose::from_field(self.rd().into())
    }

    /// The raw 16-bit immediate.
    #[must_use]
    pub fn immediate(self) -> u16 {
        Self::IMMEDIATE_RANGE.extract_from(self.raw()) as u16
    }

    /// The 16-bit immediate, sign extended. Used by arithmetic, branch and load/store instructions.
    #[must_use]
    pub fn signed_immediate(self) -> i32 {
        Self::IMMEDIATE_RANGE.sign_extend_from(self.raw())
    }

    /// The raw 26-bit jump field.
    #[must_use]
    pub fn jump_field(self) -> u32 {
        Self::JUMP_RANGE.extract_from(self.raw())
    }

    /// The jump target, where bit 25 of the unshifted field acts as a sign bit.
    /// A negative target has the upper six bits set, i.e. `field | 0xFC00_0000`.
    #[must_use]
    pub fn jump_target(self) -> u32 {
        Self::JUMP_RANGE.sign_extend_from(self.raw()) as u32
    }

    /// The 20-bit code carried by `syscall` and `break`.
    #[must_use]
    pub fn code(self) -> u32 {
        Self::CODE_RANGE.extract_from(self.raw())
    }
}

impl fmt::Display for InstructionWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.raw())
    }
}

/// The layout of an instruction word, which determines the meaningful fields.
#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionFormat {
    #[strum(serialize = "R-type")]
    Register,
    #[strum(serialize = "I-type")]
    Immediate,
    #[strum(serialize = "J-type")]
    Jump,
}

/// A fully decoded instruction, ready to be written to a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u32,
    pub word: InstructionWord,
    pub mnemonic: Mnemonic,
    pub format: InstructionFormat,
    /// The rendered operands, empty for instructions without any.
    pub operands: String,
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}

/// Decodes a single instruction word located at `address`.
///
/// # Errors
/// Returns [`Error::UnrecognizedInstruction`] if the opcode table has no entry for the word.
pub fn decode(raw: u32, address: u32) -> Result<DecodedInstruction> {
    let word = InstructionWord::from(raw);
    let descriptor = table::lookup(word).ok_or_else(|| {
        let family = Family::of(word);
        Error::UnrecognizedInstruction {
            address,
            word: raw,
            opcode: word.opcode(),
            function: family.sub_field(word),
        }
    })?;

    Ok(DecodedInstruction {
        address,
        word,
        mnemonic: descriptor.mnemonic,
        format: descriptor.format,
        operands: Operands::new(descriptor.shape, word).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an R-type word.
    fn r_type(opcode: u32, rs: u32, rt: u32, rd: u32, sa: u32, funct: u32) -> u32 {
        (opcode << 26) | (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
    }

    /// Builds an I-type word.
    fn i_type(opcode: u32, rs: u32, rt: u32, immediate: u16) -> u32 {
        (opcode << 26) | (rs << 21) | (rt << 16) | u32::from(immediate)
    }

    fn disasm(raw: u32) -> String {
        decode(raw, 0).unwrap().to_string()
    }

    #[test]
    fn fields() {
        let word = InstructionWord::from(r_type(0x1C, 3, 4, 5, 6, 0x21));
        assert_eq!(word.opcode(), 0x1C);
        assert_eq!(word.rs(), 3);
        assert_eq!(word.rt(), 4);
        assert_eq!(word.rd(), 5);
        assert_eq!(word.sa(), 6);
        assert_eq!(word.funct(), 0x21);
        assert_eq!(word.source(), GeneralPurpose::V1);
        assert_eq!(word.target(), GeneralPurpose::A0);
        assert_eq!(word.destination(), GeneralPurpose::A1);
    }

    #[test]
    fn immediates() {
        let word = InstructionWord::from(i_type(0x08, 0, 0, 0x8000));
        assert_eq!(word.immediate(), 0x8000);
        assert_eq!(word.signed_immediate(), -32768);

        let word = InstructionWord::from(i_type(0x08, 0, 0, 0x7FFF));
        assert_eq!(word.signed_immediate(), 32767);
    }

    #[test]
    fn jump_targets() {
        for field in [0, 4, 0x1FF_FFFF, 0x200_0000, 0x2AB_CDEF, 0x3FF_FFFF] {
            let word = InstructionWord::from((2 << 26) | field);
            assert_eq!(word.jump_field(), field);
            let expected = if field & (1 << 25) != 0 {
                field | 0xFC00_0000
            } else {
                field
            };
            assert_eq!(word.jump_target(), expected);
        }
    }

    #[test]
    fn nop() {
        let decoded = decode(0, 0x40).unwrap();
        assert_eq!(decoded.mnemonic, Mnemonic::Nop);
        assert_eq!(decoded.address, 0x40);
        assert!(decoded.operands.is_empty());
        assert_eq!(decoded.to_string(), "nop");
    }

    #[test]
    fn shifts() {
        // sll with a zero destination but a non-zero shift is not a nop
        assert_eq!(disasm(r_type(0, 0, 0, 0, 1, 0x00)), "sll $zero, $zero, 1");
        assert_eq!(disasm(r_type(0, 0, 9, 8, 4, 0x00)), "sll $t0, $t1, 4");
        assert_eq!(disasm(r_type(0, 0, 9, 8, 31, 0x02)), "srl $t0, $t1, 31");
        assert_eq!(disasm(r_type(0, 0, 9, 8, 2, 0x03)), "sra $t0, $t1, 2");
        assert_eq!(disasm(r_type(0, 10, 9, 8, 0, 0x04)), "sllv $t0, $t1, $t2");
        assert_eq!(disasm(r_type(0, 10, 9, 8, 0, 0x06)), "srlv $t0, $t1, $t2");
        assert_eq!(disasm(r_type(0, 10, 9, 8, 0, 0x07)), "srav $t0, $t1, $t2");
    }

    #[test]
    fn special() {
        assert_eq!(disasm(r_type(0, 9, 10, 8, 0, 0x20)), "add $t0, $t1, $t2");
        assert_eq!(disasm(r_type(0, 17, 18, 16, 0, 0x23)), "subu $s0, $s1, $s2");
        assert_eq!(disasm(r_type(0, 4, 5, 2, 0, 0x27)), "nor $v0, $a0, $a1");
        assert_eq!(disasm(r_type(0, 4, 5, 2, 0, 0x2A)), "slt $v0, $a0, $a1");
        assert_eq!(disasm(r_type(0, 4, 5, 2, 0, 0x2B)), "sltu $v0, $a0, $a1");
        assert_eq!(disasm(r_type(0, 31, 0, 0, 0, 0x08)), "jr $ra");
        assert_eq!(disasm(r_type(0, 25, 0, 31, 0, 0x09)), "jalr $ra, $t9");
        assert_eq!(disasm(r_type(0, 0, 0, 2, 0, 0x10)), "mfhi $v0");
        assert_eq!(disasm(r_type(0, 2, 0, 0, 0, 0x11)), "mthi $v0");
        assert_eq!(disasm(r_type(0, 0, 0, 3, 0, 0x12)), "mflo $v1");
        assert_eq!(disasm(r_type(0, 3, 0, 0, 0, 0x13)), "mtlo $v1");
        assert_eq!(disasm(r_type(0, 4, 5, 0, 0, 0x18)), "mult $a0, $a1");
        assert_eq!(disasm(r_type(0, 4, 5, 0, 0, 0x1B)), "divu $a0, $a1");
        assert_eq!(disasm(r_type(0, 0, 0, 0, 0, 0x0C)), "syscall");
        assert_eq!(disasm((0x7 << 6) | 0x0D), "break 0x7");
    }

    #[test]
    fn regimm() {
        assert_eq!(disasm(i_type(1, 4, 0x00, 0xFFFF)), "bltz $a0, -0x1");
        assert_eq!(disasm(i_type(1, 4, 0x01, 0x0010)), "bgez $a0, 0x10");
        assert_eq!(disasm(i_type(1, 4, 0x10, 0x0003)), "bltzal $a0, 0x3");
        assert_eq!(disasm(i_type(1, 4, 0x11, 0xFFF0)), "bgezal $a0, -0x10");
        assert_eq!(disasm(i_type(1, 8, 0x08, 0x0005)), "tgei $t0, 0x5");
        assert_eq!(disasm(i_type(1, 8, 0x0E, 0x8000)), "tnei $t0, -0x8000");
    }

    #[test]
    fn special2() {
        assert_eq!(disasm(r_type(0x1C, 4, 5, 0, 0, 0x00)), "madd $a0, $a1");
        assert_eq!(disasm(r_type(0x1C, 4, 5, 0, 0, 0x05)), "msubu $a0, $a1");
        assert_eq!(disasm(r_type(0x1C, 4, 5, 2, 0, 0x02)), "mul $v0, $a0, $a1");
        assert_eq!(disasm(r_type(0x1C, 4, 0, 2, 0, 0x20)), "clz $v0, $a0");
        assert_eq!(disasm(r_type(0x1C, 4, 0, 2, 0, 0x21)), "clo $v0, $a0");
    }

    #[test]
    fn immediate_type() {
        assert_eq!(disasm((2 << 26) | 4), "j 4");
        assert_eq!(disasm((3 << 26) | 0x200_0000), "jal 4261412864");
        assert_eq!(disasm(i_type(4, 0, 0, 0xFFFE)), "beq $zero, $zero, -0x2");
        assert_eq!(disasm(i_type(5, 8, 9, 0x0004)), "bne $t0, $t1, 0x4");
        assert_eq!(disasm(i_type(6, 8, 0, 0x0004)), "blez $t0, 0x4");
        assert_eq!(disasm(i_type(7, 8, 0, 0xFFFC)), "bgtz $t0, -0x4");
        assert_eq!(disasm(i_type(8, 29, 29, 0xFFE8)), "addi $sp, $sp, -0x18");
        assert_eq!(disasm(i_type(9, 0, 2, 0x000A)), "addiu $v0, $zero, 0xa");
        assert_eq!(disasm(i_type(0xA, 4, 2, 0x8000)), "slti $v0, $a0, -0x8000");
        assert_eq!(disasm(i_type(0xC, 4, 2, 0xFFFF)), "andi $v0, $a0, 0xffff");
        assert_eq!(disasm(i_type(0xD, 0, 8, 0x00FF)), "ori $t0, $zero, 0xff");
        assert_eq!(disasm(i_type(0xF, 0, 1, 0x8000)), "lui $at, 0x8000");
        assert_eq!(disasm(i_type(0x18, 0, 8, 0x1234)), "llo $t0, 0x1234");
        assert_eq!(disasm(i_type(0x19, 0, 8, 0xABCD)), "lhi $t0, 0xabcd");
        assert_eq!(disasm((0x1A << 26) | 0x2A), "trap 0x2a");
    }

    #[test]
    fn memory() {
        assert_eq!(disasm(i_type(0x23, 29, 31, 0x0014)), "lw $ra, 0x14($sp)");
        assert_eq!(disasm(i_type(0x2B, 29, 16, 0xFFFC)), "sw $s0, -0x4($sp)");
        assert_eq!(disasm(i_type(0x20, 4, 2, 0x0000)), "lb $v0, 0x0($a0)");
        assert_eq!(disasm(i_type(0x26, 4, 2, 0x0003)), "lwr $v0, 0x3($a0)");
        assert_eq!(disasm(i_type(0x2E, 4, 2, 0x0003)), "swr $v0, 0x3($a0)");
        assert_eq!(disasm(i_type(0x30, 4, 8, 0x0000)), "ll $t0, 0x0($a0)");
        assert_eq!(disasm(i_type(0x38, 4, 8, 0x0000)), "sc $t0, 0x0($a0)");
    }

    #[test]
    fn formats() {
        let format = |raw| decode(raw, 0).unwrap().format;
        assert_eq!(format(r_type(0, 9, 10, 8, 0, 0x20)), InstructionFormat::Register);
        assert_eq!(format(r_type(0x1C, 4, 5, 2, 0, 0x02)), InstructionFormat::Register);
        assert_eq!(format(i_type(1, 4, 0, 1)), InstructionFormat::Immediate);
        assert_eq!(format(i_type(0x23, 29, 31, 0)), InstructionFormat::Immediate);
        assert_eq!(format(2 << 26), InstructionFormat::Jump);
        assert_eq!(InstructionFormat::Jump.to_string(), "J-type");
    }

    #[test]
    fn unrecognized() {
        // SPECIAL2 funct 3 is a reserved slot
        let raw = r_type(0x1C, 4, 5, 2, 0, 0x03);
        assert!(matches!(
            decode(raw, 0x100),
            Err(Error::UnrecognizedInstruction {
                address: 0x100,
                opcode: 0x1C,
                function: Some(0x03),
                ..
            })
        ));

        assert!(matches!(
            decode(r_type(0, 0, 0, 0, 0, 0x01), 0),
            Err(Error::UnrecognizedInstruction {
                opcode: 0,
                function: Some(0x01),
                ..
            })
        ));

        // REGIMM dispatches on rt
        assert!(matches!(
            decode(i_type(1, 0, 0x0D, 0), 0),
            Err(Error::UnrecognizedInstruction {
                opcode: 1,
                function: Some(0x0D),
                ..
            })
        ));

        // Coprocessor instructions are not part of the table
        assert!(matches!(
            decode(0x4200_0018, 0),
            Err(Error::UnrecognizedInstruction {
                opcode: 0x10,
                function: None,
                ..
            })
        ));
    }
}
