//! # Bounded Integers
//!
//! Integers constrained to a compile-time interval `[LO, HI]`.
//!
//! Two strategies are injected as type parameters:
//! - a [`Resolver`] decides what happens to values outside the interval
//!   (wrap around, become the invalid sentinel, or fail);
//! - a [`Converter`] maps a value of one bounded range onto another
//!   (affine scaling or circular scaling).
//!
//! The bounds are `i128` const parameters so that every primitive integer
//! up to 64 bits fits without loss. Each instantiation reserves an
//! `invalid` sentinel: `T::MIN` unless `LO == T::MIN`, in which case `T::MAX`.

use crate::error::{ProbNetError, Result};
use num_traits::{NumCast, PrimInt};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// =============================================================================
// RESOLVERS
// =============================================================================

/// Out-of-range resolution strategy.
pub trait Resolver {
    /// Map `value` into `[lo, hi]`.
    ///
    /// `Ok(None)` stands for the invalid sentinel.
    fn resolve(value: i128, lo: i128, hi: i128) -> Result<Option<i128>>;
}

/// Wraps out-of-range values around the interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modulo;

/// Turns out-of-range values into the invalid sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkInvalid;

/// Fails with [`ProbNetError::OutOfRange`] on out-of-range values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reject;

impl Resolver for Modulo {
    fn resolve(value: i128, lo: i128, hi: i128) -> Result<Option<i128>> {
        let span = hi - lo + 1;
        Ok(Some((value - lo).rem_euclid(span) + lo))
    }
}

impl Resolver for MarkInvalid {
    fn resolve(value: i128, lo: i128, hi: i128) -> Result<Option<i128>> {
        Ok((lo..=hi).contains(&value).then_some(value))
    }
}

impl Resolver for Reject {
    fn resolve(value: i128, lo: i128, hi: i128) -> Result<Option<i128>> {
        if (lo..=hi).contains(&value) {
            Ok(Some(value))
        } else {
            Err(ProbNetError::OutOfRange { lo, hi, value })
        }
    }
}

// =============================================================================
// CONVERTERS
// =============================================================================

/// Cross-range conversion strategy.
pub trait Converter {
    /// Map `value` from the `from` interval onto the `to` interval.
    ///
    /// The result is handed to the target's resolver afterwards.
    fn convert(value: i128, from: (i128, i128), to: (i128, i128)) -> Result<i128>;
}

/// Affine map from `[lo1, hi1]` onto `[lo2, hi2]`; endpoints map exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scale;

/// Periodic map between ranges of the form `[0, n]` or symmetric around 0.
///
/// Values are scaled by the ratio of the periods and wrapped into the
/// target range, so `270` in `[0, 359]` becomes `-90` in `[-179, 180]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircularScale;

/// Integer division rounding half away from the floor; `d` must be positive.
fn div_round(n: i128, d: i128) -> i128 {
    let q = n.div_euclid(d);
    let r = n.rem_euclid(d);
    if r.saturating_mul(2) >= d { q + 1 } else { q }
}

impl Converter for Scale {
    fn convert(value: i128, from: (i128, i128), to: (i128, i128)) -> Result<i128> {
        let (flo, fhi) = from;
        let (tlo, thi) = to;
        let offset = value - flo;
        let denominator = fhi - flo;
        match offset.checked_mul(thi - tlo) {
            Some(numerator) => Ok(tlo + div_round(numerator, denominator)),
            None => {
                // Full 64-bit spans overflow the exact product.
                let ratio = (thi - tlo) as f64 / denominator as f64;
                Ok(tlo + (offset as f64 * ratio).round() as i128)
            }
        }
    }
}

fn is_circular(lo: i128, hi: i128) -> bool {
    lo == 0 || (lo < 0 && (lo + hi).abs() <= 1)
}

impl Converter for CircularScale {
    fn convert(value: i128, from: (i128, i128), to: (i128, i128)) -> Result<i128> {
        let (flo, fhi) = from;
        let (tlo, thi) = to;
        if !is_circular(flo, fhi) {
            return Err(ProbNetError::OutOfRange {
                lo: flo,
                hi: fhi,
                value,
            });
        }
        if !is_circular(tlo, thi) {
            return Err(ProbNetError::OutOfRange {
                lo: tlo,
                hi: thi,
                value,
            });
        }
        let from_period = fhi - flo + 1;
        let to_period = thi - tlo + 1;
        let scaled = value
            .checked_mul(to_period)
            .map(|n| div_round(n, from_period))
            .ok_or(ProbNetError::OutOfRange {
                lo: tlo,
                hi: thi,
                value,
            })?;
        Ok((scaled - tlo).rem_euclid(to_period) + tlo)
    }
}

// =============================================================================
// BOUNDED INTEGER
// =============================================================================

/// An integer of type `T` constrained to `[LO, HI]`.
///
/// ```
/// use probnet_core::bounded::{BoundedInt, CircularScale, Modulo};
///
/// type Degrees = BoundedInt<i64, 0, 359, Modulo, CircularScale>;
/// assert_eq!(Degrees::new(720).map(|d| d.get()), Ok(0));
/// assert_eq!(Degrees::new(-1).map(|d| d.get()), Ok(359));
/// ```
pub struct BoundedInt<T, const LO: i128, const HI: i128, R = Modulo, C = Scale> {
    value: T,
    _strategy: PhantomData<fn() -> (R, C)>,
}

/// Degrees on the full circle, wrapping.
pub type Degrees = BoundedInt<i64, 0, 359, Modulo, CircularScale>;

/// Degrees centred on zero, wrapping.
pub type SignedDegrees = BoundedInt<i64, -179, 180, Modulo, CircularScale>;

fn widen<T: PrimInt>(value: T) -> Option<i128> {
    value.to_i128()
}

impl<T, const LO: i128, const HI: i128, R, C> BoundedInt<T, LO, HI, R, C>
where
    T: PrimInt,
    R: Resolver,
    C: Converter,
{
    const ORDERED_BOUNDS: () = assert!(LO < HI, "bounded range requires LO < HI");

    /// Construct from a raw value, applying the resolver.
    pub fn new(value: T) -> Result<Self> {
        let raw = widen(value).ok_or(ProbNetError::OutOfRange {
            lo: LO,
            hi: HI,
            value: i128::MAX,
        })?;
        Self::from_i128(raw)
    }

    fn from_i128(raw: i128) -> Result<Self> {
        let () = Self::ORDERED_BOUNDS;
        Self::check_representable()?;
        match R::resolve(raw, LO, HI)? {
            Some(resolved) => Ok(Self::from_raw(Self::narrow(resolved)?)),
            None => Ok(Self::invalid()),
        }
    }

    fn from_raw(value: T) -> Self {
        Self {
            value,
            _strategy: PhantomData,
        }
    }

    fn narrow(value: i128) -> Result<T> {
        <T as NumCast>::from(value).ok_or(ProbNetError::OutOfRange {
            lo: LO,
            hi: HI,
            value,
        })
    }

    fn check_representable() -> Result<()> {
        let fits = |bound: i128| Self::narrow(bound).is_ok();
        if fits(LO) && fits(HI) {
            Ok(())
        } else {
            Err(ProbNetError::OutOfRange {
                lo: LO,
                hi: HI,
                value: if fits(LO) { HI } else { LO },
            })
        }
    }

    /// The reserved invalid sentinel for this instantiation.
    pub fn sentinel() -> T {
        if widen(T::min_value()) != Some(LO) {
            T::min_value()
        } else {
            T::max_value()
        }
    }

    /// A value holding the invalid sentinel.
    pub fn invalid() -> Self {
        Self::from_raw(Self::sentinel())
    }

    /// Lower bound of the range.
    pub const fn lo() -> i128 {
        LO
    }

    /// Upper bound of the range.
    pub const fn hi() -> i128 {
        HI
    }

    /// Smallest valid value.
    pub fn min() -> Result<Self> {
        Self::from_i128(LO)
    }

    /// Largest valid value.
    pub fn max() -> Result<Self> {
        Self::from_i128(HI)
    }

    /// Raw stored integer (the sentinel when invalid).
    pub fn get(&self) -> T {
        self.value
    }

    /// Stored integer, or `None` when invalid.
    pub fn value(&self) -> Option<T> {
        self.is_valid().then_some(self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.value != Self::sentinel()
    }

    fn raw(&self) -> i128 {
        // Stored values always fit: they are either in [LO, HI] or a T bound.
        widen(self.value).unwrap_or(i128::MAX)
    }

    /// Step `n` positions (negative steps go backwards), honouring the resolver.
    ///
    /// Invalid values stay invalid.
    pub fn nth_next(self, n: i128) -> Result<Self> {
        if !self.is_valid() {
            return Ok(self);
        }
        let raw = self.raw().checked_add(n).ok_or(ProbNetError::OutOfRange {
            lo: LO,
            hi: HI,
            value: self.raw(),
        })?;
        Self::from_i128(raw)
    }

    /// Sum of two bounded values, resolved into the range.
    pub fn try_add(self, rhs: Self) -> Result<Self> {
        if !self.is_valid() || !rhs.is_valid() {
            return Ok(Self::invalid());
        }
        Self::from_i128(self.raw() + rhs.raw())
    }

    /// Difference of two bounded values, resolved into the range.
    pub fn try_sub(self, rhs: Self) -> Result<Self> {
        if !self.is_valid() || !rhs.is_valid() {
            return Ok(Self::invalid());
        }
        Self::from_i128(self.raw() - rhs.raw())
    }

    /// Convert into another bounded range using the target's converter.
    ///
    /// ```
    /// use probnet_core::bounded::{Degrees, SignedDegrees};
    ///
    /// # fn main() -> probnet_core::Result<()> {
    /// let east: SignedDegrees = Degrees::new(270)?.convert()?;
    /// assert_eq!(east.get(), -90);
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<U, const LO2: i128, const HI2: i128, R2, C2>(
        self,
    ) -> Result<BoundedInt<U, LO2, HI2, R2, C2>>
    where
        U: PrimInt,
        R2: Resolver,
        C2: Converter,
    {
        if !self.is_valid() {
            return Ok(BoundedInt::invalid());
        }
        let mapped = C2::convert(self.raw(), (LO, HI), (LO2, HI2))?;
        BoundedInt::<U, LO2, HI2, R2, C2>::from_i128(mapped)
    }

    /// Forward iterator starting at `LO`.
    pub fn begin() -> Result<BoundedIter<T, LO, HI, R, C, Forward>> {
        Ok(BoundedIter::new(Self::min()?))
    }

    /// Backward iterator starting at `HI`.
    pub fn rbegin() -> Result<BoundedIter<T, LO, HI, R, C, Backward>> {
        Ok(BoundedIter::new(Self::max()?))
    }

    /// Past-the-end forward iterator.
    pub fn end() -> BoundedIter<T, LO, HI, R, C, Forward> {
        BoundedIter::end()
    }
}

impl<T: Copy, const LO: i128, const HI: i128, R, C> Clone for BoundedInt<T, LO, HI, R, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, const LO: i128, const HI: i128, R, C> Copy for BoundedInt<T, LO, HI, R, C> {}

impl<T: PartialEq, const LO: i128, const HI: i128, R, C> PartialEq for BoundedInt<T, LO, HI, R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, const LO: i128, const HI: i128, R, C> Eq for BoundedInt<T, LO, HI, R, C> {}

impl<T: Ord, const LO: i128, const HI: i128, R, C> PartialOrd for BoundedInt<T, LO, HI, R, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord, const LO: i128, const HI: i128, R, C> Ord for BoundedInt<T, LO, HI, R, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Hash, const LO: i128, const HI: i128, R, C> Hash for BoundedInt<T, LO, HI, R, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Debug, const LO: i128, const HI: i128, R, C> fmt::Debug
    for BoundedInt<T, LO, HI, R, C>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedInt<{LO}, {HI}>({:?})", self.value)
    }
}

impl<T, const LO: i128, const HI: i128, R, C> fmt::Display for BoundedInt<T, LO, HI, R, C>
where
    T: PrimInt + fmt::Display,
    R: Resolver,
    C: Converter,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.value)
        } else {
            f.write_str("invalid")
        }
    }
}

// =============================================================================
// ITERATION
// =============================================================================

/// Iteration direction of a [`BoundedIter`].
pub trait Direction {
    /// Signed distance of one step.
    const STEP: i128;
}

/// Ascending iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Forward;

/// Descending iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Backward;

impl Direction for Forward {
    const STEP: i128 = 1;
}

impl Direction for Backward {
    const STEP: i128 = -1;
}

/// Random-access cursor over the values of a bounded range.
///
/// Steps go through [`BoundedInt::nth_next`], so the resolver decides the
/// behaviour at the edges: `Modulo` wraps (the iterator never ends on its
/// own), `MarkInvalid` reaches the past-the-end position, and `Reject`
/// makes [`BoundedIter::advance`] fail while plain iteration stops.
pub struct BoundedIter<T, const LO: i128, const HI: i128, R, C, D> {
    position: BoundedInt<T, LO, HI, R, C>,
    _direction: PhantomData<D>,
}

impl<T, const LO: i128, const HI: i128, R, C, D> BoundedIter<T, LO, HI, R, C, D>
where
    T: PrimInt,
    R: Resolver,
    C: Converter,
    D: Direction,
{
    pub fn new(start: BoundedInt<T, LO, HI, R, C>) -> Self {
        Self {
            position: start,
            _direction: PhantomData,
        }
    }

    /// The past-the-end position.
    pub fn end() -> Self {
        Self::new(BoundedInt::invalid())
    }

    pub fn is_end(&self) -> bool {
        !self.position.is_valid()
    }

    /// Current value, `None` at the end.
    pub fn get(&self) -> Option<BoundedInt<T, LO, HI, R, C>> {
        self.position.is_valid().then_some(self.position)
    }

    /// Move `n` steps in the iterator's direction.
    pub fn advance(&mut self, n: i128) -> Result<()> {
        let step = n.checked_mul(D::STEP).ok_or(ProbNetError::OutOfRange {
            lo: LO,
            hi: HI,
            value: n,
        })?;
        self.position = self.position.nth_next(step)?;
        Ok(())
    }

    /// Signed number of steps from `self` to `other`, if both are valid.
    pub fn distance_to(&self, other: &Self) -> Option<i128> {
        if self.is_end() || other.is_end() {
            return None;
        }
        Some((other.position.raw() - self.position.raw()) * D::STEP)
    }
}

impl<T, const LO: i128, const HI: i128, R, C, D> Iterator for BoundedIter<T, LO, HI, R, C, D>
where
    T: PrimInt,
    R: Resolver,
    C: Converter,
    D: Direction,
{
    type Item = BoundedInt<T, LO, HI, R, C>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.get()?;
        if self.advance(1).is_err() {
            self.position = BoundedInt::invalid();
        }
        Some(current)
    }
}

impl<T: PartialEq, const LO: i128, const HI: i128, R, C, D> PartialEq
    for BoundedIter<T, LO, HI, R, C, D>
{
    fn eq(&self, other: &Self) -> bool {
        self.position.value == other.position.value
    }
}

// =============================================================================
// TESTS
// =============================================================================
