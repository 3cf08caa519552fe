// Copyright (c) 2024 Mike Tsao

//! The pad's top-level state and its per-frame entry point.

use crate::{
    curve::Curve,
    dispatch::dispatch_axis,
    host::{HostSession, ProjectIdentity},
    mapping::{HostParameterRef, Mapping, MappingStore},
    options::PadOptions,
    pending,
    resolver::Resolver,
    training::{TrainingSession, TrainingState, TrainingStatus},
    types::prelude::*,
};
use delegate::delegate;
use strum::IntoEnumIterator;

/// The pad's on-screen rectangle, in pixels, with y growing downward the way
/// screens do.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PadBounds {
    #[allow(missing_docs)]
    pub left: f32,
    #[allow(missing_docs)]
    pub top: f32,
    #[allow(missing_docs)]
    pub width: f32,
    #[allow(missing_docs)]
    pub height: f32,
}
impl PadBounds {
    /// Converts a pointer position to axis inputs, or [None] if it's outside
    /// the pad. The Y input grows upward, so the bottom edge is 0.
    pub fn normalize(&self, px: f32, py: f32) -> Option<(Normal, Normal)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = (px - self.left) / self.width;
        let y = (py - self.top) / self.height;
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        Some((Normal::from(x), Normal::from(1.0 - y)))
    }
}

/// What the user is doing with the pad this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PadInput {
    /// Where the pointer is, if it's over the pad. See
    /// [PadBounds::normalize()].
    pub cursor: Option<(Normal, Normal)>,
    /// Whether the pointer button is held.
    pub is_pressed: bool,
}
impl PadInput {
    /// A pointer held down inside the pad. Only then are mappings dispatched.
    pub fn is_engaged(&self) -> bool {
        self.is_pressed && self.cursor.is_some()
    }
}

/// One line of the pad's mapping list.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingReadout {
    #[allow(missing_docs)]
    pub axis: Axis,
    #[allow(missing_docs)]
    pub name: String,
    /// The mapping's most recent output.
    pub value: Normal,
    #[allow(missing_docs)]
    pub bypass: bool,
    /// The target couldn't be found the last time it was dispatched.
    pub missing: bool,
}
impl From<&Mapping> for MappingReadout {
    fn from(mapping: &Mapping) -> Self {
        Self {
            axis: mapping.axis(),
            name: mapping.name().to_string(),
            value: mapping.current_value(),
            bypass: mapping.bypass(),
            missing: mapping.is_missing(),
        }
    }
}

/// Everything a renderer needs after a [PadSession::tick()].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PadFrame {
    #[allow(missing_docs)]
    pub cursor: Option<(Normal, Normal)>,
    /// Whether mappings were dispatched this frame.
    pub is_engaged: bool,
    #[allow(missing_docs)]
    pub training: TrainingStatus,
    /// One entry per mapping, X axis first.
    pub readouts: Vec<MappingReadout>,
}

// Keyed by target, not position, so removals elsewhere in the store can't
// redirect the drag onto another mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CurveDrag {
    axis: Axis,
    target: HostParameterRef,
    point: usize,
}

/// Owns all of the pad's state for one host session. The host's UI loop
/// calls [PadSession::tick()] once per frame.
#[derive(Debug, Default)]
pub struct PadSession {
    store: MappingStore,
    options: PadOptions,
    training: TrainingSession,
    project: Option<ProjectIdentity>,

    // Built when a gesture starts and dropped when it ends.
    resolver: Option<Resolver>,
    drag: Option<CurveDrag>,
}
impl PadSession {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        log::debug!(target: "xypad::session", "xypad {}", crate::app_version());
        Self::default()
    }

    delegate! {
        to self.store {
            /// The mappings for one axis, in insertion order.
            pub fn mappings(&self, axis: Axis) -> &[Mapping];
            /// The number of mappings on both axes.
            pub fn len(&self) -> usize;
            #[allow(missing_docs)]
            pub fn is_empty(&self) -> bool;
        }
    }

    #[allow(missing_docs)]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Direct access to the store. Its own methods handle persistence.
    pub fn store_mut(&mut self) -> &mut MappingStore {
        &mut self.store
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    /// Changes made here are written by [PadSession::save_options()].
    pub fn options_mut(&mut self) -> &mut PadOptions {
        &mut self.options
    }

    /// Writes the options back to the project if they changed.
    pub fn save_options(&mut self, host: &mut dyn HostSession) -> anyhow::Result<()> {
        self.options.save(host)
    }

    /// Runs one frame: notices project switches, picks up mappings queued by
    /// accessory commands, advances training, and, while the pointer is
    /// engaged, writes every mapping's value to the host.
    pub fn tick(&mut self, host: &mut dyn HostSession, input: PadInput) -> PadFrame {
        self.check_project(&*host);
        self.consume_pending(host);
        let training = self.training.poll(&mut self.store, host, &self.options);

        let is_engaged = input.is_engaged();
        match input.cursor {
            Some((x, y)) if is_engaged => {
                let resolver = self.resolver.get_or_insert_with(|| Resolver::build(&*host));
                for axis in Axis::iter() {
                    let input = match axis {
                        Axis::X => x,
                        Axis::Y => y,
                    };
                    dispatch_axis(&mut self.store, axis, input, resolver, host);
                }
            }
            _ => self.resolver = None,
        }

        let mut readouts = Vec::with_capacity(self.store.len());
        self.store
            .with_mappings(|m| readouts.push(MappingReadout::from(m)));
        PadFrame {
            cursor: input.cursor,
            is_engaged,
            training,
            readouts,
        }
    }

    fn check_project(&mut self, host: &dyn HostSession) {
        let identity = host.project_identity();
        if self.project.as_ref() == Some(&identity) {
            return;
        }
        log::info!(
            target: "xypad::session",
            "project is now {:?}; reloading",
            identity.name
        );
        self.store.reload(host);
        self.options = PadOptions::load(host);
        self.training.cancel();
        self.resolver = None;
        self.drag = None;
        self.project = Some(identity);
    }

    fn consume_pending(&mut self, host: &mut dyn HostSession) {
        for request in pending::take_all(host) {
            let target = request.target();
            match self
                .store
                .add(host, request.axis, target, self.options.mapping_options())
            {
                Ok(mapping) => {
                    log::debug!(target: "xypad::session", "added pending mapping {}", mapping.name())
                }
                Err(e) => log::info!(target: "xypad::session", "skipping pending mapping: {e}"),
            }
        }
    }

    /// Starts training for `axis`. See [TrainingSession].
    pub fn start_training(&mut self, axis: Axis) {
        self.training.start(axis);
    }

    #[allow(missing_docs)]
    pub fn cancel_training(&mut self) {
        self.training.cancel();
    }

    #[allow(missing_docs)]
    pub fn training_state(&self) -> TrainingState {
        self.training.state()
    }

    /// Grabs a point on a mapping's curve. Returns false if there's no such
    /// mapping or point.
    pub fn begin_curve_drag(&mut self, axis: Axis, mapping: usize, point: usize) -> bool {
        let Some(m) = self.store.mappings(axis).get(mapping) else {
            return false;
        };
        if point >= m.curve().len() {
            return false;
        }
        self.drag = Some(CurveDrag {
            axis,
            target: m.target().clone(),
            point,
        });
        true
    }

    /// Moves the grabbed point. Returns the point's index after the move,
    /// which changes if it passed one of its neighbors. Nothing is saved
    /// until [PadSession::end_curve_drag()]. If the mapping has been removed
    /// in the meantime, the drag ends.
    pub fn update_curve_drag(&mut self, x: f64, y: f64) -> Option<usize> {
        let drag = self.drag.as_mut()?;
        let Some(mapping) = self
            .store
            .mappings_mut(drag.axis)
            .iter_mut()
            .find(|m| m.target() == &drag.target)
        else {
            log::debug!(target: "xypad::session", "dropping curve drag: {} is gone", drag.target);
            self.drag = None;
            return None;
        };
        let curve: &mut Curve = mapping.curve_mut();
        match curve.drag_point(drag.point, x, y) {
            Ok(index) => {
                drag.point = index;
                Some(index)
            }
            Err(e) => {
                log::debug!(target: "xypad::session", "dropping curve drag: {e}");
                self.drag = None;
                None
            }
        }
    }

    /// Releases the grabbed point and saves the result.
    pub fn end_curve_drag(&mut self, host: &mut dyn HostSession) {
        if self.drag.take().is_some() {
            if let Err(e) = self.store.save(host) {
                log::warn!(target: "xypad::session", "couldn't save curve edit: {e}");
            }
        }
    }

    /// Whether a curve point is grabbed.
    pub fn is_dragging_curve(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        curve::ControlPoint,
        host::{MemoryFx, MemoryHost, MemoryProject, MemoryTrack},
        mapping::MappingOptions,
        pending::PendingMapping,
    };

    fn project(name: &str) -> MemoryProject {
        MemoryProject::new_with(name).with_track(
            MemoryTrack::new_with("{T1}", "Drums")
                .with_fx(MemoryFx::new_with("{A}", "EQ", 4))
                .with_fx(MemoryFx::new_with("{B}", "Comp", 4)),
        )
    }

    fn target(fx: &str, param: usize) -> HostParameterRef {
        HostParameterRef::new_with(
            TrackId("{T1}".to_string()),
            FxId(fx.to_string()),
            ParamIndex(param),
        )
    }

    fn pressed(x: f64, y: f64) -> PadInput {
        PadInput {
            cursor: Some((Normal::new(x), Normal::new(y))),
            is_pressed: true,
        }
    }

    #[test]
    fn bounds_normalize() {
        let b = PadBounds {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(b.normalize(10.0, 70.0), Some((Normal::new(0.0), Normal::new(0.0))));
        assert_eq!(b.normalize(110.0, 20.0), Some((Normal::new(1.0), Normal::new(1.0))));
        let (x, y) = b.normalize(60.0, 45.0).unwrap();
        assert_eq!((x.0, y.0), (0.5, 0.5));
        assert_eq!(b.normalize(9.0, 30.0), None);
        assert_eq!(b.normalize(50.0, 71.0), None);
        assert_eq!(PadBounds::default().normalize(0.0, 0.0), None);
    }

    #[test]
    fn tick_dispatches_only_while_engaged() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session
            .store_mut()
            .add(&mut host, Axis::X, target("{A}", 0), MappingOptions::default())
            .unwrap();
        session
            .store_mut()
            .add(&mut host, Axis::Y, target("{B}", 1), MappingOptions::default())
            .unwrap();

        let frame = session.tick(
            &mut host,
            PadInput {
                cursor: Some((Normal::new(0.2), Normal::new(0.8))),
                is_pressed: false,
            },
        );
        assert!(!frame.is_engaged);
        assert!(host.param_writes().is_empty());

        let frame = session.tick(&mut host, pressed(0.2, 0.8));
        assert!(frame.is_engaged);
        assert_eq!(host.param_writes().len(), 2);
        assert_eq!(frame.readouts.len(), 2);
        assert_eq!(frame.readouts[0].axis, Axis::X);
        assert_eq!(frame.readouts[0].value, Normal::new(0.2));
        assert_eq!(frame.readouts[1].value, Normal::new(0.8));
        assert_eq!(frame.readouts[1].name, "Drums: Comp - Comp 1");
        assert!(!frame.readouts[1].missing);
    }

    #[test]
    fn resolver_lives_for_one_gesture() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session
            .store_mut()
            .add(&mut host, Axis::X, target("{B}", 0), MappingOptions::default())
            .unwrap();

        let _ = session.tick(&mut host, pressed(0.5, 0.5));
        assert!(session.resolver.is_some());
        let _ = session.tick(&mut host, PadInput::default());
        assert!(session.resolver.is_none());

        // Reorder between gestures; the next gesture sees the new layout.
        host.project_mut().tracks[0].fxs.swap(0, 1);
        host.clear_param_writes();
        let frame = session.tick(&mut host, pressed(0.25, 0.5));
        assert!(!frame.readouts[0].missing);
        assert_eq!(host.param_writes()[0].1, FxOrdinal(0));
    }

    #[test]
    fn project_switch_reloads_everything() {
        let mut host = MemoryHost::new_with(project("first"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session
            .store_mut()
            .add(&mut host, Axis::X, target("{A}", 0), MappingOptions::default())
            .unwrap();
        session.start_training(Axis::Y);

        let second = host.add_project(project("second"));
        host.switch_to(second);
        let frame = session.tick(&mut host, PadInput::default());
        assert!(session.is_empty());
        assert!(frame.readouts.is_empty());
        assert_eq!(session.training_state(), TrainingState::Idle);

        host.switch_to(0);
        let frame = session.tick(&mut host, PadInput::default());
        assert_eq!(session.len(), 1);
        assert_eq!(frame.readouts[0].name, "Drums: EQ - EQ 0");
    }

    #[test]
    fn tick_consumes_pending_mappings() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());

        for (axis, fx, param) in [(Axis::X, "{A}", 1), (Axis::Y, "{B}", 2), (Axis::Y, "{A}", 1)] {
            pending::post(
                &mut host,
                PendingMapping {
                    axis,
                    track_id: TrackId("{T1}".to_string()),
                    fx_id: FxId(fx.to_string()),
                    param_index: ParamIndex(param),
                },
            )
            .unwrap();
        }
        let frame = session.tick(&mut host, PadInput::default());
        assert_eq!(frame.readouts.len(), 2, "the duplicate is dropped");
        assert_eq!(session.mappings(Axis::Y).len(), 1);
        assert!(pending::take_all(&mut host).is_empty());
    }

    #[test]
    fn tick_runs_training() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session.start_training(Axis::X);
        let frame = session.tick(&mut host, PadInput::default());
        assert_eq!(frame.training, TrainingStatus::Waiting(Axis::X));

        host.touch(0, 1, 2);
        let frame = session.tick(&mut host, PadInput::default());
        assert_eq!(frame.training, TrainingStatus::Added(Axis::X, target("{B}", 2)));
        assert_eq!(session.training_state(), TrainingState::Idle);
        assert_eq!(frame.readouts.len(), 1);

        session.start_training(Axis::Y);
        session.cancel_training();
        let frame = session.tick(&mut host, PadInput::default());
        assert_eq!(frame.training, TrainingStatus::Idle);
    }

    #[test]
    fn curve_drag_saves_once_at_end() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session
            .store_mut()
            .add(&mut host, Axis::X, target("{A}", 0), MappingOptions::default())
            .unwrap();
        let _ = session
            .store_mut()
            .edit_curve(&mut host, Axis::X, 0, |c| c.insert_point(0.3, 0.3));
        let _ = session
            .store_mut()
            .edit_curve(&mut host, Axis::X, 0, |c| c.insert_point(0.6, 0.6));
        let saved_before = host
            .project()
            .state(MappingStore::SECTION, MappingStore::KEY)
            .cloned();

        assert!(!session.begin_curve_drag(Axis::Y, 0, 0));
        assert!(!session.begin_curve_drag(Axis::X, 0, 9));
        assert!(session.begin_curve_drag(Axis::X, 0, 1));
        assert_eq!(session.update_curve_drag(0.7, 0.1), Some(2), "passed its neighbor");
        assert_eq!(session.update_curve_drag(0.8, 0.2), Some(2));
        assert_eq!(
            host.project()
                .state(MappingStore::SECTION, MappingStore::KEY)
                .cloned(),
            saved_before,
            "nothing saved mid-drag"
        );

        session.end_curve_drag(&mut host);
        assert!(!session.is_dragging_curve());
        assert_eq!(session.update_curve_drag(0.1, 0.1), None);

        let mut reloaded = MappingStore::default();
        reloaded.reload(&host);
        assert_eq!(
            reloaded.mappings(Axis::X)[0].curve().points()[2],
            ControlPoint::new(0.8, 0.2)
        );
    }

    #[test]
    fn curve_drag_follows_its_mapping_through_removals() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        for param in 0..3 {
            session
                .store_mut()
                .add(&mut host, Axis::X, target("{A}", param), MappingOptions::default())
                .unwrap();
        }

        assert!(session.begin_curve_drag(Axis::X, 1, 0));
        assert_eq!(
            session
                .store_mut()
                .remove(&mut host, |m| m.target() == &target("{A}", 0)),
            1
        );
        assert_eq!(session.update_curve_drag(0.0, 0.9), Some(0));
        let xs = session.mappings(Axis::X);
        assert_eq!(xs[0].target(), &target("{A}", 1));
        assert_eq!(xs[0].curve().points()[0], ControlPoint::new(0.0, 0.9));
        assert_eq!(xs[1].curve().points()[0], ControlPoint::new(0.0, 0.0));

        assert_eq!(
            session
                .store_mut()
                .remove(&mut host, |m| m.target() == &target("{A}", 1)),
            1
        );
        assert_eq!(session.update_curve_drag(0.0, 0.5), None);
        assert!(!session.is_dragging_curve());
        assert_eq!(
            session.mappings(Axis::X)[0].curve().points()[0],
            ControlPoint::new(0.0, 0.0)
        );
    }

    #[test]
    fn dragging_an_endpoint_moves_only_y() {
        let mut host = MemoryHost::new_with(project("p"));
        let mut session = PadSession::new();
        let _ = session.tick(&mut host, PadInput::default());
        session
            .store_mut()
            .add(&mut host, Axis::Y, target("{A}", 0), MappingOptions::default())
            .unwrap();
        assert!(session.begin_curve_drag(Axis::Y, 0, 0));
        assert_eq!(session.update_curve_drag(0.5, 0.75), Some(0));
        session.end_curve_drag(&mut host);
        assert_eq!(
            session.mappings(Axis::Y)[0].curve().points()[0],
            ControlPoint::new(0.0, 0.75)
        );
    }
}
