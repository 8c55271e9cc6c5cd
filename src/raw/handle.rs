use core::num::NonZero;

/// Index of a node slot in the [`Arena`](super::arena::Arena).
///
/// Stored shifted by one inside a [`NonZero`] so that `Option<Handle>` is the
/// same size as `Handle` and every tree link costs one word, never two.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<u32>);

impl Handle {
    /// Largest representable slot index.
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` is nonzero and fits in `u32` after the assert.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as u32).unwrap())
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // The niche optimization is what keeps `Option<Handle>` links one word wide.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, u32);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn out_of_range_index() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    proptest! {
        #[test]
        fn index_round_trip(index in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::from_index(index).index(), index);
        }
    }
}
