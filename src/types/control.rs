// Copyright (c) 2024 Mike Tsao

use super::Normal;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A standardized value range (0..=1.0) for host parameter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ControlValue(pub f64);
impl From<Normal> for ControlValue {
    fn from(value: Normal) -> Self {
        Self(value.0)
    }
}
impl From<ControlValue> for Normal {
    fn from(value: ControlValue) -> Self {
        Self::from(value.0)
    }
}
