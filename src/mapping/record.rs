// Copyright (c) 2024 Mike Tsao

use super::{CurveVisibility, HostParameterRef};
use crate::{curve::Curve, error::PersistError, types::prelude::*};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// The persisted form of a [Mapping](super::Mapping): its target plus the
/// user's settings, without anything derived from the host or from the
/// current interaction.
///
/// The target is required. Every other field has a default, so records
/// written by older versions (or missing newer fields) still load.
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct MappingRecord {
    #[allow(missing_docs)]
    pub track_id: TrackId,
    #[allow(missing_docs)]
    pub fx_id: FxId,
    #[allow(missing_docs)]
    pub param_index: ParamIndex,
    #[allow(missing_docs)]
    #[serde(default)]
    pub invert: bool,
    #[allow(missing_docs)]
    #[serde(default)]
    pub bypass: bool,
    #[allow(missing_docs)]
    #[derivative(Default(value = "true"))]
    #[serde(default = "MappingRecord::default_use_curve")]
    pub use_curve: bool,
    #[allow(missing_docs)]
    #[serde(default)]
    pub curve_visibility: CurveVisibility,
    #[allow(missing_docs)]
    #[serde(default)]
    pub curve: Curve,
    #[allow(missing_docs)]
    #[derivative(Default(value = "ColorScheme::nth_curve_color(0)"))]
    #[serde(default = "MappingRecord::default_curve_color")]
    pub curve_color: ColorScheme,
    #[allow(missing_docs)]
    #[derivative(Default(value = "2.0"))]
    #[serde(default = "MappingRecord::default_curve_thickness")]
    pub curve_thickness: f32,
    #[allow(missing_docs)]
    #[derivative(Default(value = "4.0"))]
    #[serde(default = "MappingRecord::default_point_radius")]
    pub point_radius: f32,
}
impl MappingRecord {
    fn default_use_curve() -> bool {
        true
    }
    fn default_curve_color() -> ColorScheme {
        ColorScheme::nth_curve_color(0)
    }
    fn default_curve_thickness() -> f32 {
        2.0
    }
    fn default_point_radius() -> f32 {
        4.0
    }

    /// The parameter this record points at.
    pub fn target(&self) -> HostParameterRef {
        HostParameterRef::new_with(self.track_id.clone(), self.fx_id.clone(), self.param_index)
    }
}

/// Everything the store persists, as one document: `{"xs": [...], "ys":
/// [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MappingsBlob {
    /// Records for the X axis, in order.
    pub xs: Vec<MappingRecord>,
    /// Records for the Y axis, in order.
    pub ys: Vec<MappingRecord>,
}
impl MappingsBlob {
    /// Serializes to the string stored in the host.
    pub fn encode(&self) -> Result<String, PersistError> {
        serde_json::to_string(self).map_err(PersistError::Encode)
    }

    /// Parses a string previously produced by [MappingsBlob::encode()].
    pub fn decode(s: &str) -> Result<Self, PersistError> {
        serde_json::from_str(s).map_err(PersistError::Decode)
    }

    /// The records for one axis.
    pub fn records(&self, axis: Axis) -> &[MappingRecord] {
        match axis {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        }
    }
}
