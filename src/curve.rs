// Copyright (c) 2024 Mike Tsao

//! User-editable transfer curves.
//!
//! A [Curve] maps a normalized input (where the pointer is along an axis) to a
//! normalized output (what gets written to the host parameter). It's a
//! piecewise-linear function through a list of [ControlPoint]s, ordered by
//! `x`. The first point always sits at x=0 and the last at x=1; users can
//! move those two only vertically, and can't delete them.

use crate::{error::CurveError, types::Normal};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single point on a [Curve]. `x` is input and `y` is output. The pad may
/// draw the Y axis's curves transposed, but the stored meaning never changes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ControlPoint {
    /// Input position.
    pub x: Normal,
    /// Output value.
    pub y: Normal,
}
impl ControlPoint {
    /// Creates a point, clamping both coordinates into 0..=1.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Normal::new(x),
            y: Normal::new(y),
        }
    }
}
impl From<(f64, f64)> for ControlPoint {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// A piecewise-linear transfer function over the unit interval.
#[derive(Clone, Debug, Serialize, Deserialize, Builder, PartialEq)]
#[serde(transparent)]
#[builder(build_fn(private, name = "build_from_builder"))]
pub struct Curve {
    /// Each point on the curve, ascending by `x`.
    #[builder(default, setter(custom))]
    points: Vec<ControlPoint>,
}
impl Default for Curve {
    /// The identity curve: output equals input.
    fn default() -> Self {
        Self {
            points: vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)],
        }
    }
}
impl CurveBuilder {
    /// Appends a point. Points must be given in ascending `x` order.
    pub fn point(&mut self, point: impl Into<ControlPoint>) -> &mut Self {
        self.points
            .get_or_insert_with(Vec::default)
            .push(point.into());
        self
    }

    /// Builds the item.
    pub fn build(&self) -> Result<Curve, CurveBuilderError> {
        let c = self.build_from_builder()?;
        Self::verify_shape(&c)?;
        Ok(c)
    }

    /// Ensures that there are at least two points, that they're in ascending
    /// `x` order, and that the ends sit on the domain boundaries.
    fn verify_shape(c: &Curve) -> Result<(), CurveBuilderError> {
        if c.points.len() < 2 {
            return Err(CurveBuilderError::ValidationError(
                "A curve needs at least two points".to_string(),
            ));
        }
        if c.points.windows(2).any(|w| w[1].x < w[0].x) {
            return Err(CurveBuilderError::ValidationError(
                "Point's x field is out of order".to_string(),
            ));
        }
        if c.points[0].x.0 != 0.0 || c.points[c.points.len() - 1].x.0 != 1.0 {
            return Err(CurveBuilderError::ValidationError(
                "First and last points must sit at x=0 and x=1".to_string(),
            ));
        }
        Ok(())
    }
}
impl Curve {
    /// Takes whatever points were recorded and bends them into a valid curve:
    /// coordinates are clamped, points are sorted by `x`, and the ends are
    /// pinned to x=0 and x=1. Anything with fewer than two points becomes the
    /// identity curve. A curve that was already valid comes back unchanged.
    pub fn repaired(points: Vec<ControlPoint>) -> Self {
        if points.len() < 2 {
            return Self::default();
        }
        let mut points: Vec<ControlPoint> = points
            .into_iter()
            .map(|p| ControlPoint::new(p.x.0, p.y.0))
            .collect();
        points.sort_by(|a, b| a.x.0.total_cmp(&b.x.0));
        let last = points.len() - 1;
        points[0].x = Normal::minimum();
        points[last].x = Normal::maximum();
        Self { points }
    }

    /// The points, ascending by `x`.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a well-formed curve.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the point at `index` is the first or the last one.
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Returns the curve's output for input `x`.
    ///
    /// Finds the first segment whose ends bracket `x` and interpolates
    /// linearly between them. A zero-width segment yields its left point's
    /// `y`. Inputs outside the curve's span take the nearest end's `y`, and
    /// so does an input sitting exactly on the last point's `x`.
    pub fn evaluate(&self, x: Normal) -> Normal {
        let x = x.0;
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Normal::new(x);
        };
        if x < first.x.0 {
            return first.y;
        }
        if x >= last.x.0 {
            return last.y;
        }
        for w in self.points.windows(2) {
            let (left, right) = (&w[0], &w[1]);
            if left.x.0 <= x && x <= right.x.0 {
                let span = right.x.0 - left.x.0;
                if span <= 0.0 {
                    return left.y;
                }
                let t = (x - left.x.0) / span;
                return Normal::new(left.y.0 * (1.0 - t) + right.y.0 * t);
            }
        }
        last.y
    }

    /// Adds a point and returns the index where it landed. The new point
    /// always goes between the endpoints, even if its `x` ties with one of
    /// them.
    pub fn insert_point(&mut self, x: f64, y: f64) -> usize {
        let point = ControlPoint::new(x, y);
        let index = self.interior_slot_for(point.x);
        self.points.insert(index, point);
        index
    }

    /// Moves the point at `index`. Endpoints move only vertically. Interior
    /// points can move anywhere, which might change their position in the
    /// list, so this returns the point's new index.
    pub fn drag_point(&mut self, index: usize, x: f64, y: f64) -> Result<usize, CurveError> {
        if index >= self.points.len() {
            return Err(CurveError::IndexOutOfRange(index));
        }
        if self.is_endpoint(index) {
            self.points[index].y = Normal::new(y);
            return Ok(index);
        }
        self.points.remove(index);
        Ok(self.insert_point(x, y))
    }

    /// Removes the point at `index`. Endpoints can't be removed.
    pub fn delete_point(&mut self, index: usize) -> Result<ControlPoint, CurveError> {
        if index >= self.points.len() {
            return Err(CurveError::IndexOutOfRange(index));
        }
        if self.is_endpoint(index) {
            return Err(CurveError::CannotDeleteEndpoint(index));
        }
        Ok(self.points.remove(index))
    }

    /// Returns the index of the point closest to (`x`, `y`), if any is within
    /// `tolerance` (in normalized units). Used for hit-testing a click.
    pub fn point_near(&self, x: f64, y: f64, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.x.0 - x).hypot(p.y.0 - y)))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn interior_slot_for(&self, x: Normal) -> usize {
        if self.points.len() < 2 {
            return self.points.partition_point(|p| p.x.0 <= x.0);
        }
        let interior = &self.points[1..self.points.len() - 1];
        1 + interior.partition_point(|p| p.x.0 <= x.0)
    }
}
