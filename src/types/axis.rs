// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// One of the two dimensions of the pad.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    /// Horizontal. Grows to the right.
    #[default]
    X,
    /// Vertical. Grows upward.
    Y,
}
