//! Bounded random numbers over a native random-bit source.
//!
//! The source is any [`RngCore`]; [`BoundedRandom::from_entropy`] uses the
//! operating system's generator. All state lives in the source.
//!
//! Folding a signed draw to non-negative maps `MIN` to `0`. With that rule
//! every value in `0..=MAX` has exactly two preimages (`v` and `-v`, or `0`
//! and `MIN`), so [`BoundedRandom::next_non_negative_int`] is uniform over
//! its range.
//!
//! [`BoundedRandom::next_bounded`] reduces with `%` and is therefore
//! modulo-biased towards small results whenever `bound` does not divide
//! `2^31`. Use [`BoundedRandom::next_bounded_unbiased`] when uniformity
//! matters.
use rand::{RngCore, rngs::OsRng};

use crate::{
    error::BoundsError,
    identity::{Identity, RuntimeObject},
};

const NON_NEGATIVE_INTS: i64 = 1 << 31;

#[derive(Debug)]
pub struct BoundedRandom<R = OsRng> {
    identity: Identity,
    source: R,
}

impl BoundedRandom<OsRng> {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore> BoundedRandom<R> {
    pub fn new(source: R) -> Self {
        Self {
            identity: Identity::next(),
            source,
        }
    }

    /// One raw 64-bit draw, reinterpreted as signed.
    #[expect(clippy::cast_possible_wrap, reason = "raw bits are reinterpreted")]
    pub fn next_raw(&mut self) -> i64 {
        self.source.next_u64() as i64
    }

    /// The low 32 bits of a raw draw, folded to `0..=i32::MAX`.
    #[expect(clippy::cast_possible_truncation, reason = "keeps the low bits")]
    pub fn next_non_negative_int(&mut self) -> i32 {
        let low = self.next_raw() as i32;
        low.checked_abs().unwrap_or(0)
    }

    /// A raw draw folded to `0..=i64::MAX`.
    pub fn next_non_negative_long(&mut self) -> i64 {
        self.next_raw().checked_abs().unwrap_or(0)
    }

    /// `next_non_negative_int() % bound`, in `0..bound`. Modulo-biased.
    ///
    /// # Errors
    ///
    /// [`BoundsError::NonPositiveBound`] when `bound <= 0`.
    pub fn next_bounded(&mut self, bound: i32) -> Result<i32, BoundsError> {
        check_bound(i64::from(bound))?;
        Ok(self.next_non_negative_int() % bound)
    }

    /// `next_non_negative_long() % bound`, in `0..bound`. Modulo-biased.
    ///
    /// # Errors
    ///
    /// [`BoundsError::NonPositiveBound`] when `bound <= 0`.
    pub fn next_long_bounded(&mut self, bound: i64) -> Result<i64, BoundsError> {
        check_bound(bound)?;
        Ok(self.next_non_negative_long() % bound)
    }

    /// A uniform value in `0..bound`, drawing again whenever the draw falls
    /// in the incomplete last block of `bound`-sized residues.
    ///
    /// # Errors
    ///
    /// [`BoundsError::NonPositiveBound`] when `bound <= 0`.
    pub fn next_bounded_unbiased(&mut self, bound: i32) -> Result<i32, BoundsError> {
        check_bound(i64::from(bound))?;
        let accept_below = NON_NEGATIVE_INTS - NON_NEGATIVE_INTS % i64::from(bound);
        loop {
            let draw = self.next_non_negative_int();
            if i64::from(draw) < accept_below {
                return Ok(draw % bound);
            }
        }
    }

    /// Picks an element with [`next_long_bounded`](Self::next_long_bounded),
    /// so the pick carries the same modulo bias. `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let len = i64::try_from(items.len()).ok()?;
        let index = self.next_long_bounded(len).ok()?;
        items.get(usize::try_from(index).ok()?)
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

fn check_bound(bound: i64) -> Result<(), BoundsError> {
    if bound > 0 {
        Ok(())
    } else {
        Err(BoundsError::NonPositiveBound { bound })
    }
}

impl<R> RuntimeObject for BoundedRandom<R> {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "Random"
    }
}
