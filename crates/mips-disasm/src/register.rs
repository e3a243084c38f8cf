//! Register definitions for the MIPS32 CPU.

use strum::{EnumCount, EnumIter, FromRepr, VariantNames};

/// A general purpose MIPS32 register, also known as a `gpr`.
#[derive(EnumCount, EnumIter, VariantNames, FromRepr, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum GeneralPurpose {
    /// Hardwired to zero.
    Zero,
    /// Reserved for the assembler.
    At,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    /// Reserved for the kernel.
    K0,
    /// Reserved for the kernel.
    K1,
    Gp,
    Sp,
    Fp,
    Ra,
}

impl GeneralPurpose {
    /// Returns the register encoded in a 5-bit register field.
    /// Every 5-bit value names a register, only the low five bits of `field` are used.
    #[must_use]
    pub const fn from_field(field: u32) -> Self {
        match Self::from_repr((field & 0b1_1111) as u8) {
            Some(reg) => reg,
            None => unreachable!(),
        }
    }

    /// The index this register has in the register file.
    #[must_use]
    pub const fn to_repr(self) -> usize {
        self as usize
    }

    /// The name of this register, without the `$` sigil.
    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::name_from_index(self.to_repr())
    }

    /// Returns the name of the register at the given index, or panics if the index is out of bounds.
    #[must_use]
    pub const fn name_from_index(index: usize) -> &'static str {
        <Self as VariantNames>::VARIANTS[index]
    }

    /// The total number of registers.
    #[must_use]
    pub const fn count() -> usize {
        <Self as EnumCount>::COUNT
    }

    /// Returns an iterator over all registers.
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

impl ::std::fmt::Display for GeneralPurpose {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        write!(f, "${}", self.name())
    }
}
