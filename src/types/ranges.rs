// Copyright (c) 2024 Mike Tsao

use core::{
    fmt::Display,
    ops::{Add, Sub},
};
use serde::{Deserialize, Serialize};

/// [RangedF64] enforces the given range limits while not becoming too expensive
/// to use compared to a plain f64. It enforces the value at creation and when
/// converting from an f64. Math operations
/// (Add, Sub) are not checked, so intermediate results can leave the range.
///
/// [RangedF64] doesn't tell you when clamping happens. It just does it,
/// silently.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;

    pub fn new(value: f64) -> Self {
        Self(Self::clamped(value))
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }

    // NaN has no place on a pad; treat it as the bottom of the range.
    fn clamped(value: f64) -> f64 {
        if value.is_nan() {
            Self::MIN
        } else {
            value.clamp(Self::MIN, Self::MAX)
        }
    }
}
impl<const LOWER: i8, const UPPER: i8> Display for RangedF64<LOWER, UPPER> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}
impl<const LOWER: i8, const UPPER: i8> Add for RangedF64<LOWER, UPPER> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl<const LOWER: i8, const UPPER: i8> Sub for RangedF64<LOWER, UPPER> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f32> for RangedF64<LOWER, UPPER> {
    fn from(value: f32) -> Self {
        Self::new(value as f64)
    }
}

/// A [Normal] is a RangedF64 whose range is [0.0, 1.0]. Pad coordinates and
/// curve points are all [Normal]s.
pub type Normal = RangedF64<0, 1>;
#[allow(missing_docs)]
impl Normal {
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }
    /// Returns the mirror image of this value within the range.
    pub fn inverted(&self) -> Self {
        Self::new(1.0 - self.0)
    }
}
impl Default for Normal {
    // The origin of the pad.
    fn default() -> Self {
        Self(0.0)
    }
}
