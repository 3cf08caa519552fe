// Copyright (c) 2024 Mike Tsao

use super::{HostParameterRef, MappingRecord};
use crate::{
    curve::Curve,
    error::MappingError,
    host::HostSession,
    resolver::{ResolvedParam, Resolver},
    types::prelude::*,
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Which parts of a curve the pad draws. Presentation only.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct CurveVisibility {
    /// The line segments between points.
    #[derivative(Default(value = "true"))]
    pub segments: bool,
    /// The points themselves.
    #[derivative(Default(value = "true"))]
    pub points: bool,
}

/// How a curve looks when drawn.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct CurveStyle {
    #[allow(missing_docs)]
    pub color: ColorScheme,
    /// Line width in pixels.
    #[derivative(Default(value = "2.0"))]
    pub thickness: f32,
    /// Radius of each drawn point in pixels.
    #[derivative(Default(value = "4.0"))]
    pub point_radius: f32,
}

/// Settings for a new mapping. Anything not set takes the usual default.
#[derive(Clone, Debug, Derivative, Builder)]
#[derivative(Default)]
#[builder(default)]
pub struct MappingOptions {
    #[allow(missing_docs)]
    pub invert: bool,
    #[allow(missing_docs)]
    pub bypass: bool,
    #[allow(missing_docs)]
    #[derivative(Default(value = "true"))]
    pub use_curve: bool,
    #[allow(missing_docs)]
    pub curve: Curve,
    #[allow(missing_docs)]
    pub curve_visibility: CurveVisibility,
    /// Line width in pixels.
    #[derivative(Default(value = "2.0"))]
    pub thickness: f32,
    /// Radius of each drawn point in pixels.
    #[derivative(Default(value = "4.0"))]
    pub point_radius: f32,
    /// If [None], the store picks the next color in
    /// [ColorScheme::CURVE_PALETTE].
    #[builder(setter(strip_option))]
    pub color: Option<ColorScheme>,
}

/// Human-readable names for a mapping's target. Resolved when the mapping is
/// hydrated, and never used to identify anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingNames {
    #[allow(missing_docs)]
    pub track: String,
    #[allow(missing_docs)]
    pub fx: String,
    #[allow(missing_docs)]
    pub param: String,
    /// All of the above, composed for display.
    pub mapping: String,
}
impl MappingNames {
    /// Asks the host for names, making some up where the host has none.
    pub fn resolve(host: &dyn HostSession, resolved: &ResolvedParam) -> Self {
        let track = host
            .track_name(resolved.track)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Track {}", resolved.track.0 + 1));
        let fx = host
            .fx_name(resolved.track, resolved.fx)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("FX {}", resolved.fx.0 + 1));
        let param = host
            .param_name(resolved.track, resolved.fx, resolved.param)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Param #{}", resolved.param.0 + 1));
        let mapping = format!("{track}: {fx} - {param}");
        Self {
            track,
            fx,
            param,
            mapping,
        }
    }
}

/// One axis driving one host parameter.
#[derive(Clone, Debug)]
pub struct Mapping {
    axis: Axis,
    target: HostParameterRef,
    invert: bool,
    bypass: bool,
    use_curve: bool,
    curve: Curve,
    curve_visibility: CurveVisibility,
    style: CurveStyle,

    e: MappingEphemerals,
}
#[derive(Clone, Debug, Default)]
struct MappingEphemerals {
    names: MappingNames,
    current_value: Normal,
    is_selected: bool,
    resolved: Option<ResolvedParam>,
    is_missing: bool,
}
impl Mapping {
    /// Builds a live mapping from a persisted record. Fails if the record's
    /// track or effect can't be found in the host right now.
    pub fn hydrate(
        axis: Axis,
        record: &MappingRecord,
        resolver: &Resolver,
        host: &dyn HostSession,
    ) -> Result<Self, MappingError> {
        let target = record.target();
        let Some(resolved) = resolver.resolve(&target) else {
            return Err(MappingError::InvalidReference(target));
        };
        let current_value = host
            .param_value(resolved.track, resolved.fx, resolved.param)
            .map(Normal::from)
            .unwrap_or_default();
        Ok(Self {
            axis,
            target,
            invert: record.invert,
            bypass: record.bypass,
            use_curve: record.use_curve,
            curve: Curve::repaired(record.curve.points().to_vec()),
            curve_visibility: record.curve_visibility,
            style: CurveStyle {
                color: record.curve_color,
                thickness: record.curve_thickness,
                point_radius: record.point_radius,
            },
            e: MappingEphemerals {
                names: MappingNames::resolve(host, &resolved),
                current_value,
                is_selected: false,
                resolved: Some(resolved),
                is_missing: false,
            },
        })
    }

    /// Reduces this mapping to the fields worth persisting.
    pub fn dehydrate(&self) -> MappingRecord {
        MappingRecord {
            track_id: self.target.track_id.clone(),
            fx_id: self.target.fx_id.clone(),
            param_index: self.target.param_index,
            invert: self.invert,
            bypass: self.bypass,
            use_curve: self.use_curve,
            curve_visibility: self.curve_visibility,
            curve: self.curve.clone(),
            curve_color: self.style.color,
            curve_thickness: self.style.thickness,
            point_radius: self.style.point_radius,
        }
    }

    #[allow(missing_docs)]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[allow(missing_docs)]
    pub fn target(&self) -> &HostParameterRef {
        &self.target
    }

    /// Whether the output is flipped (`1 - value`) after the curve.
    pub fn invert(&self) -> bool {
        self.invert
    }

    #[allow(missing_docs)]
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Whether the mapping is evaluated without writing to the host.
    pub fn bypass(&self) -> bool {
        self.bypass
    }

    #[allow(missing_docs)]
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Whether input passes through the curve, or straight through.
    pub fn use_curve(&self) -> bool {
        self.use_curve
    }

    #[allow(missing_docs)]
    pub fn set_use_curve(&mut self, use_curve: bool) {
        self.use_curve = use_curve;
    }

    #[allow(missing_docs)]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    #[allow(missing_docs)]
    pub fn curve_mut(&mut self) -> &mut Curve {
        &mut self.curve
    }

    #[allow(missing_docs)]
    pub fn curve_visibility(&self) -> CurveVisibility {
        self.curve_visibility
    }

    #[allow(missing_docs)]
    pub fn set_curve_visibility(&mut self, curve_visibility: CurveVisibility) {
        self.curve_visibility = curve_visibility;
    }

    #[allow(missing_docs)]
    pub fn style(&self) -> CurveStyle {
        self.style
    }

    #[allow(missing_docs)]
    pub fn set_style(&mut self, style: CurveStyle) {
        self.style = style;
    }

    #[allow(missing_docs)]
    pub fn names(&self) -> &MappingNames {
        &self.e.names
    }

    /// The composed display name.
    pub fn name(&self) -> &str {
        &self.e.names.mapping
    }

    /// The most recently computed output.
    pub fn current_value(&self) -> Normal {
        self.e.current_value
    }

    pub(crate) fn set_current_value(&mut self, value: Normal) {
        self.e.current_value = value;
    }

    #[allow(missing_docs)]
    pub fn is_selected(&self) -> bool {
        self.e.is_selected
    }

    #[allow(missing_docs)]
    pub fn set_is_selected(&mut self, is_selected: bool) {
        self.e.is_selected = is_selected;
    }

    /// Whether the target couldn't be found the last time this mapping was
    /// dispatched.
    pub fn is_missing(&self) -> bool {
        self.e.is_missing
    }

    pub(crate) fn set_is_missing(&mut self, is_missing: bool) {
        self.e.is_missing = is_missing;
    }

    /// Where the target was last found.
    pub fn resolved(&self) -> Option<ResolvedParam> {
        self.e.resolved
    }

    pub(crate) fn set_resolved(&mut self, resolved: Option<ResolvedParam>) {
        self.e.resolved = resolved;
    }

    /// Runs `input` through this mapping's transfer settings: the curve (if
    /// enabled), then inversion (if enabled).
    pub fn transfer(&self, input: Normal) -> Normal {
        let base = if self.use_curve {
            self.curve.evaluate(input)
        } else {
            input
        };
        if self.invert {
            base.inverted()
        } else {
            base
        }
    }
}
