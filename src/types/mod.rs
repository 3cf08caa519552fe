// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Axis, ColorScheme, ControlValue, FxId, FxOrdinal, Normal, ParamIndex, TrackId,
        TrackOrdinal,
    };
}

pub use {
    axis::Axis,
    colors::ColorScheme,
    control::ControlValue,
    ids::{FxId, FxOrdinal, ParamIndex, TrackId, TrackOrdinal},
    ranges::{Normal, RangedF64},
};

mod axis;
mod colors;
mod control;
mod ids;
mod ranges;
