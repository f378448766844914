//! Rational time points and half-open time ranges.
//!
//! A [`TimePoint`] is `value / timescale`, always stored in lowest terms so
//! that derived equality and hashing are exact: `1/2` and `300/600` are the
//! same value. Addition, subtraction, and comparison never round. Scaling by
//! a float speed factor is the only rounding operation and it is
//! deterministic (nearest tick on a timescale of at least
//! [`PREFERRED_TIMESCALE`]).

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Tick resolution used when a float factor has to be applied to a time.
pub const PREFERRED_TIMESCALE: u32 = 600;

/// Errors raised by time primitives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("Timescale must be greater than zero")]
    ZeroTimescale,

    #[error("Time value is not finite: {value}")]
    NonFinite { value: f64 },

    #[error("Time range duration must not be negative (got {duration})")]
    NegativeDuration { duration: TimePoint },

    #[error("Cannot union disjoint ranges {a} and {b}")]
    DisjointUnion { a: TimeRange, b: TimeRange },

    #[error("Time arithmetic overflow")]
    Overflow,
}

/// An exact rational point (or span) on a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimePoint")]
pub struct TimePoint {
    value: i64,
    timescale: u32,
}

#[derive(Deserialize)]
struct RawTimePoint {
    value: i64,
    timescale: u32,
}

impl TryFrom<RawTimePoint> for TimePoint {
    type Error = TimeError;

    fn try_from(raw: RawTimePoint) -> Result<Self, Self::Error> {
        TimePoint::new(raw.value, raw.timescale)
    }
}

impl TimePoint {
    /// Time zero.
    pub const ZERO: TimePoint = TimePoint {
        value: 0,
        timescale: 1,
    };

    /// Create a time point of `value / timescale`.
    pub fn new(value: i64, timescale: u32) -> Result<Self, TimeError> {
        if timescale == 0 {
            return Err(TimeError::ZeroTimescale);
        }
        Ok(Self::reduce(value, timescale))
    }

    /// Whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            value: secs,
            timescale: 1,
        }
    }

    /// Milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self::reduce(millis, 1000)
    }

    /// Convert float seconds by rounding to the nearest tick of `timescale`.
    pub fn from_secs_f64(secs: f64, timescale: u32) -> Result<Self, TimeError> {
        if timescale == 0 {
            return Err(TimeError::ZeroTimescale);
        }
        if !secs.is_finite() {
            return Err(TimeError::NonFinite { value: secs });
        }
        let ticks = (secs * timescale as f64).round();
        if ticks.abs() >= i64::MAX as f64 {
            return Err(TimeError::Overflow);
        }
        Ok(Self::reduce(ticks as i64, timescale))
    }

    /// Numerator in lowest terms.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Denominator in lowest terms (always > 0).
    pub fn timescale(&self) -> u32 {
        self.timescale
    }

    /// Approximate value in seconds, for display and sampling only.
    pub fn as_secs_f64(&self) -> f64 {
        self.value as f64 / self.timescale as f64
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    /// Exact addition; `None` on overflow.
    pub fn checked_add(self, rhs: TimePoint) -> Option<TimePoint> {
        let den = self.timescale as i128 * rhs.timescale as i128;
        let num = self.value as i128 * rhs.timescale as i128 + rhs.value as i128 * self.timescale as i128;
        Self::from_ratio(num, den)
    }

    /// Exact subtraction; `None` on overflow.
    pub fn checked_sub(self, rhs: TimePoint) -> Option<TimePoint> {
        let den = self.timescale as i128 * rhs.timescale as i128;
        let num = self.value as i128 * rhs.timescale as i128 - rhs.value as i128 * self.timescale as i128;
        Self::from_ratio(num, den)
    }

    /// Exact division by a positive integer; `None` on a zero divisor or
    /// overflow.
    pub fn checked_div(self, divisor: u32) -> Option<TimePoint> {
        if divisor == 0 {
            return None;
        }
        Self::from_ratio(self.value as i128, self.timescale as i128 * divisor as i128)
    }

    /// Multiply by a float factor, rounding to the nearest tick on
    /// `lcm(timescale, PREFERRED_TIMESCALE)`. A factor of exactly 1.0 is
    /// returned unchanged. `None` if the factor is not finite or the result
    /// overflows.
    pub fn checked_scale(self, factor: f64) -> Option<TimePoint> {
        if !factor.is_finite() {
            return None;
        }
        if factor == 1.0 {
            return Some(self);
        }
        let timescale = self.timescale as u128;
        let target = timescale / gcd(timescale, PREFERRED_TIMESCALE as u128)
            * PREFERRED_TIMESCALE as u128;
        let ticks = self.value as i128 * (target / timescale) as i128;
        let scaled = (ticks as f64 * factor).round();
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Self::from_ratio(scaled as i128, target as i128)
    }

    /// Multiply by a float factor. See [`TimePoint::checked_scale`].
    ///
    /// # Panics
    ///
    /// Panics if the factor is not finite or the result overflows.
    pub fn scale(self, factor: f64) -> TimePoint {
        self.checked_scale(factor)
            .unwrap_or_else(|| panic!("cannot scale {self} by {factor}"))
    }

    fn reduce(value: i64, timescale: u32) -> Self {
        let g = gcd(value.unsigned_abs() as u128, timescale as u128);
        if g <= 1 {
            return Self { value, timescale };
        }
        Self {
            value: value / g as i64,
            timescale: timescale / g as u32,
        }
    }

    fn from_ratio(num: i128, den: i128) -> Option<Self> {
        debug_assert!(den > 0);
        let g = gcd(num.unsigned_abs(), den as u128).max(1) as i128;
        let value = i64::try_from(num / g).ok()?;
        let timescale = u32::try_from(den / g).ok()?;
        Some(Self { value, timescale })
    }
}

/// Least common multiple of `timescales`, or `None` when it does not fit
/// in a `u32` (or a timescale is zero).
///
/// Times whose timescales all divide a representable common timescale can
/// be added and subtracted among themselves without the result's
/// denominator overflowing.
pub fn common_timescale(timescales: impl IntoIterator<Item = u32>) -> Option<u32> {
    timescales.into_iter().try_fold(1u32, |acc, ts| {
        if ts == 0 {
            return None;
        }
        let lcm = acc as u128 / gcd(acc as u128, ts as u128) * ts as u128;
        u32::try_from(lcm).ok()
    })
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Default for TimePoint {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for TimePoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.value as i128 * other.timescale as i128;
        let rhs = other.value as i128 * self.timescale as i128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for TimePoint {
    type Output = TimePoint;

    fn add(self, rhs: TimePoint) -> TimePoint {
        self.checked_add(rhs)
            .unwrap_or_else(|| panic!("time arithmetic overflow: {self} + {rhs}"))
    }
}

impl Sub for TimePoint {
    type Output = TimePoint;

    fn sub(self, rhs: TimePoint) -> TimePoint {
        self.checked_sub(rhs)
            .unwrap_or_else(|| panic!("time arithmetic overflow: {self} - {rhs}"))
    }
}

impl AddAssign for TimePoint {
    fn add_assign(&mut self, rhs: TimePoint) {
        *self = *self + rhs;
    }
}

impl SubAssign for TimePoint {
    fn sub_assign(&mut self, rhs: TimePoint) {
        *self = *self - rhs;
    }
}

impl Sum for TimePoint {
    fn sum<I: Iterator<Item = TimePoint>>(iter: I) -> Self {
        iter.fold(TimePoint::ZERO, |acc, t| acc + t)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// A half-open range `[start, start + duration)` with `duration >= 0`.
///
/// Zero-duration ranges are meaningful: "no transition here" is a
/// zero-length range anchored at the clip boundary, not an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: TimePoint,
    duration: TimePoint,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: TimePoint,
    duration: TimePoint,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = TimeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.duration)
    }
}

impl TimeRange {
    /// The empty sentinel returned for disjoint intersections.
    pub const EMPTY: TimeRange = TimeRange {
        start: TimePoint::ZERO,
        duration: TimePoint::ZERO,
    };

    /// Fails on a negative duration or when the end is not representable.
    pub fn new(start: TimePoint, duration: TimePoint) -> Result<Self, TimeError> {
        if duration.is_negative() {
            return Err(TimeError::NegativeDuration { duration });
        }
        start.checked_add(duration).ok_or(TimeError::Overflow)?;
        Ok(Self { start, duration })
    }

    /// A zero-length range anchored at `start`.
    pub fn empty_at(start: TimePoint) -> Self {
        Self {
            start,
            duration: TimePoint::ZERO,
        }
    }

    pub fn from_start_end(start: TimePoint, end: TimePoint) -> Result<Self, TimeError> {
        Self::new(start, end.checked_sub(start).ok_or(TimeError::Overflow)?)
    }

    /// Whole-second range.
    pub fn from_secs(start: i64, duration: u32) -> Self {
        Self {
            start: TimePoint::from_secs(start),
            duration: TimePoint::from_secs(duration as i64),
        }
    }

    pub fn start(&self) -> TimePoint {
        self.start
    }

    pub fn duration(&self) -> TimePoint {
        self.duration
    }

    pub fn end(&self) -> TimePoint {
        self.start + self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.duration.is_zero()
    }

    /// Whether `time` lies in `[start, end)`.
    pub fn contains_time(&self, time: TimePoint) -> bool {
        self.start <= time && time < self.end()
    }

    pub fn contains_range(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    /// The common part of two ranges. Touching ranges yield a zero-length
    /// range at the shared boundary; disjoint ranges yield [`TimeRange::EMPTY`].
    ///
    /// # Panics
    ///
    /// Panics if the ranges' timescales are too far apart for the common
    /// part's duration to be represented.
    pub fn intersection(&self, other: &TimeRange) -> TimeRange {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        if end < start {
            return TimeRange::EMPTY;
        }
        TimeRange {
            start,
            duration: end - start,
        }
    }

    /// True only when the ranges share a positive-length span.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start.max(other.start) < self.end().min(other.end())
    }

    /// Smallest range covering both. Only defined for ranges that touch or
    /// overlap.
    pub fn union(&self, other: &TimeRange) -> Result<TimeRange, TimeError> {
        if other.start > self.end() || self.start > other.end() {
            return Err(TimeError::DisjointUnion {
                a: *self,
                b: *other,
            });
        }
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TimeRange::from_start_end(start, end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
