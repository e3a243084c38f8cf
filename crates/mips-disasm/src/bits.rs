//! Helpers for slicing fixed bit ranges out of 32-bit instruction words.

/// Extracts `width` bits starting at bit `offset` from `word`.
///
/// # Panics
/// Panics if the range is empty or does not fit in 32 bits. Field offsets are constants,
/// so hitting this is a bug in the caller and not a property of the input data.
#[inline]
#[must_use]
pub const fn extract(word: u32, offset: u32, width: u32) -> u32 {
    assert!(
        width > 0 && width <= u32::BITS,
        "field width must be between 1 and 32 bits"
    );
    assert!(offset <= u32::BITS - width, "field must fit in 32 bits");

    let mask = if width == u32::BITS {
        u32::MAX
    } else {
        (1 << width) - 1
    };
    (word >> offset) & mask
}

/// Interprets the lowest `width` bits of `value` as a two's complement number.
///
/// # Panics
/// Panics if `width` is zero or larger than 32.
#[inline]
#[must_use]
pub const fn sign_extend(value: u32, width: u32) -> i32 {
    assert!(
        width > 0 && width <= u32::BITS,
        "sign bit must lie within 32 bits"
    );
    let unused = u32::BITS - width;
    ((value << unused) as i32) >> unused
}

/// A range of `WIDTH` bits starting at bit `OFFSET` of a 32-bit word.
/// Both parameters are checked when the range is constructed, which happens at compile time for constants.
pub(crate) struct BitRange<const OFFSET: u32, const WIDTH: u32> {
    // Manual construction circumvents the asserts
    _please_use_new: (),
}

impl<const OFFSET: u32, const WIDTH: u32> BitRange<OFFSET, WIDTH> {
    const ASSERT_NOT_EMPTY: () = assert!(WIDTH > 0, "range must contain at least one bit");
    const ASSERT_FITS_IN_32_BITS: () =
        assert!(OFFSET + WIDTH <= u32::BITS, "range must fit in 32 bits");

    pub(crate) const fn new() -> Self {
        // Referencing the associated constants forces them to be evaluated for every instantiation.
        #[allow(path_statements)]
        #[allow(clippy::no_effect)]
        {
            Self::ASSERT_NOT_EMPTY;
            Self::ASSERT_FITS_IN_32_BITS;
        }

        Self { _please_use_new: () }
    }

    #[inline]
    pub(crate) const fn extract_from(&self, word: u32) -> u32 {
        extract(word, OFFSET, WIDTH)
    }

    #[inline]
    pub(crate) const fn sign_extend_from(&self, word: u32) -> i32 {
        sign_extend(self.extract_from(word), WIDTH)
    }
}
