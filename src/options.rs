// Copyright (c) 2024 Mike Tsao

//! Per-project presentation settings for the pad.

use crate::{
    host::HostSession,
    mapping::{CurveVisibility, MappingOptions, MappingStore},
    traits::HasSettings,
    types::prelude::*,
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// How the pointer position is drawn on the pad.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumIter, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CursorStyle {
    #[allow(missing_docs)]
    #[default]
    Crosshair,
    #[allow(missing_docs)]
    Dot,
    #[allow(missing_docs)]
    Ring,
}

/// Contains persistent pad appearance settings, plus the display defaults
/// handed to new mappings.
///
/// Missing keys take their defaults and unknown keys are ignored, so options
/// written by any version of this crate can be read by any other.
#[derive(Clone, Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct PadOptions {
    #[derivative(Default(value = "4"))]
    grid_lines_x: u8,
    #[derivative(Default(value = "4"))]
    grid_lines_y: u8,
    #[derivative(Default(value = "ColorScheme::Black"))]
    background_color: ColorScheme,
    grid_color: ColorScheme,
    #[derivative(Default(value = "ColorScheme::White"))]
    cursor_color: ColorScheme,
    #[derivative(Default(value = "6.0"))]
    cursor_radius: f32,
    cursor_style: CursorStyle,
    #[derivative(Default(value = "true"))]
    show_curve_segments: bool,
    #[derivative(Default(value = "true"))]
    show_curve_points: bool,
    #[derivative(Default(value = "2.0"))]
    curve_thickness: f32,
    #[derivative(Default(value = "4.0"))]
    point_radius: f32,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for PadOptions {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl PadOptions {
    /// The project-state key for the options blob.
    pub const KEY: &'static str = "options";

    /// Reads options from the current project. Anything missing or
    /// unreadable comes back as the defaults.
    pub fn load(host: &dyn HostSession) -> Self {
        let mut r = match host.project_state(MappingStore::SECTION, Self::KEY) {
            Some(stored) if !stored.trim().is_empty() => {
                serde_json::from_str(&stored).unwrap_or_else(|e| {
                    log::warn!(target: "xypad::options", "ignoring stored options: {e}");
                    Self::default()
                })
            }
            _ => Self::default(),
        };
        r.mark_clean();
        r
    }

    /// Writes options to the current project if anything changed since the
    /// last load or save.
    pub fn save(&mut self, host: &mut dyn HostSession) -> anyhow::Result<()> {
        if self.has_been_saved() {
            return Ok(());
        }
        let encoded = serde_json::to_string(self)?;
        host.set_project_state(MappingStore::SECTION, Self::KEY, &encoded);
        host.mark_project_dirty();
        self.mark_clean();
        log::debug!(target: "xypad::options", "saved options");
        Ok(())
    }

    /// The settings a newly created mapping starts with.
    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            curve_visibility: CurveVisibility {
                segments: self.show_curve_segments,
                points: self.show_curve_points,
            },
            thickness: self.curve_thickness,
            point_radius: self.point_radius,
            ..Default::default()
        }
    }

    /// The number of vertical grid lines.
    pub fn grid_lines_x(&self) -> u8 {
        self.grid_lines_x
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_grid_lines_x(&mut self, grid_lines_x: u8) {
        if grid_lines_x != self.grid_lines_x {
            self.grid_lines_x = grid_lines_x;
            self.needs_save();
        }
    }

    /// The number of horizontal grid lines.
    pub fn grid_lines_y(&self) -> u8 {
        self.grid_lines_y
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_grid_lines_y(&mut self, grid_lines_y: u8) {
        if grid_lines_y != self.grid_lines_y {
            self.grid_lines_y = grid_lines_y;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn background_color(&self) -> ColorScheme {
        self.background_color
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_background_color(&mut self, color: ColorScheme) {
        if color != self.background_color {
            self.background_color = color;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn grid_color(&self) -> ColorScheme {
        self.grid_color
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_grid_color(&mut self, color: ColorScheme) {
        if color != self.grid_color {
            self.grid_color = color;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn cursor_color(&self) -> ColorScheme {
        self.cursor_color
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_cursor_color(&mut self, color: ColorScheme) {
        if color != self.cursor_color {
            self.cursor_color = color;
            self.needs_save();
        }
    }

    /// The cursor's radius in pixels.
    pub fn cursor_radius(&self) -> f32 {
        self.cursor_radius
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_cursor_radius(&mut self, radius: f32) {
        if radius != self.cursor_radius {
            self.cursor_radius = radius;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_cursor_style(&mut self, style: CursorStyle) {
        if style != self.cursor_style {
            self.cursor_style = style;
            self.needs_save();
        }
    }

    /// Whether new mappings draw their curve segments.
    pub fn show_curve_segments(&self) -> bool {
        self.show_curve_segments
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_show_curve_segments(&mut self, show: bool) {
        if show != self.show_curve_segments {
            self.show_curve_segments = show;
            self.needs_save();
        }
    }

    /// Whether new mappings draw their curve points.
    pub fn show_curve_points(&self) -> bool {
        self.show_curve_points
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_show_curve_points(&mut self, show: bool) {
        if show != self.show_curve_points {
            self.show_curve_points = show;
            self.needs_save();
        }
    }

    /// Line width for new mappings' curves.
    pub fn curve_thickness(&self) -> f32 {
        self.curve_thickness
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_curve_thickness(&mut self, thickness: f32) {
        if thickness != self.curve_thickness {
            self.curve_thickness = thickness;
            self.needs_save();
        }
    }

    /// Point radius for new mappings' curves.
    pub fn point_radius(&self) -> f32 {
        self.point_radius
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_point_radius(&mut self, radius: f32) {
        if radius != self.point_radius {
            self.point_radius = radius;
            self.needs_save();
        }
    }
}
