// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, FromRepr};

#[allow(missing_docs)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumCount,
    EnumIter,
    Eq,
    FromRepr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Red,
    Vermilion,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Spring,
    Cyan,
    Azure,
    Blue,
    Violet,
    Magenta,
    Rose,
    White,
    #[default]
    Gray,
    Black,
}
impl ColorScheme {
    /// The colors handed out to new curves, in order.
    pub const CURVE_PALETTE: [ColorScheme; 8] = [
        ColorScheme::Amber,
        ColorScheme::Cyan,
        ColorScheme::Magenta,
        ColorScheme::Lime,
        ColorScheme::Vermilion,
        ColorScheme::Azure,
        ColorScheme::Violet,
        ColorScheme::Spring,
    ];

    /// Picks a curve color round-robin. `n` is usually the number of mappings
    /// that existed before the new one.
    pub fn nth_curve_color(n: usize) -> Self {
        Self::CURVE_PALETTE[n % Self::CURVE_PALETTE.len()]
    }
}
