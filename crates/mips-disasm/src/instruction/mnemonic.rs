use std::fmt;
use strum::VariantNames;

/// An instruction mnemonic.
#[derive(VariantNames, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    /// Pseudo instruction for the all-zero word, which would otherwise be `sll $zero, $zero, 0`.
    Nop,

    // SPECIAL
    Sll,
    Srl,
    Sra,
    Sllv,
    Srlv,
    Srav,
    Jr,
    Jalr,
    Syscall,
    Break,
    Mfhi,
    Mthi,
    Mflo,
    Mtlo,
    Mult,
    Multu,
    Div,
    Divu,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,

    // REGIMM
    Bltz,
    Bgez,
    Tgei,
    Tgeiu,
    Tlti,
    Tltiu,
    Teqi,
    Tnei,
    Bltzal,
    Bgezal,

    // SPECIAL2
    Madd,
    Maddu,
    Mul,
    Msub,
    Msubu,
    Clz,
    Clo,

    J,
    Jal,
    Beq,
    Bne,
    Blez,
    Bgtz,
    Addi,
    Addiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Lui,
    Llo,
    Lhi,
    Trap,
    Lb,
    Lh,
    Lwl,
    Lw,
    Lbu,
    Lhu,
    Lwr,
    Sb,
    Sh,
    Swl,
    Sw,
    Swr,
    Ll,
    Sc,
}

impl Mnemonic {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        Self::VARIANTS[*self as usize]
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
