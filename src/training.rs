// Copyright (c) 2024 Mike Tsao

//! Mapping by example: the user picks an axis, then wiggles a parameter in
//! the host, and the pad maps the two.
//!
//! The host only offers a global "last touched parameter" signal, which knows
//! nothing about training. So while training, [TrainingSession::poll()]
//! checks that signal every frame and reports what it sees, including the
//! unhelpful cases, rather than treating them as errors.

use crate::{
    host::HostSession,
    mapping::{HostParameterRef, MappingStore},
    options::PadOptions,
    types::prelude::*,
};

/// Whether training is in progress, and for which axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainingState {
    #[allow(missing_docs)]
    #[default]
    Idle,
    #[allow(missing_docs)]
    Training(Axis),
}

/// What the latest [TrainingSession::poll()] saw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TrainingStatus {
    /// Not training.
    #[default]
    Idle,
    /// Training, but no usable parameter has been touched yet.
    Waiting(Axis),
    /// Training, but the project has no tracks.
    NoTracks(Axis),
    /// Training, but no track has any effects.
    NoEffects(Axis),
    /// The touched parameter is already mapped. Training continues.
    AlreadyMapped(Axis, HostParameterRef),
    /// A mapping was created and training has ended.
    Added(Axis, HostParameterRef),
}

/// Drives training. See the module docs.
#[derive(Debug, Default)]
pub struct TrainingSession {
    state: TrainingState,
}
impl TrainingSession {
    /// Begins training for `axis`, replacing any training in progress.
    pub fn start(&mut self, axis: Axis) {
        log::debug!(target: "xypad::training", "training {axis}");
        self.state = TrainingState::Training(axis);
    }

    /// Stops training without creating anything.
    pub fn cancel(&mut self) {
        if self.state != TrainingState::Idle {
            log::debug!(target: "xypad::training", "training cancelled");
        }
        self.state = TrainingState::Idle;
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> TrainingState {
        self.state
    }

    #[allow(missing_docs)]
    pub fn is_training(&self) -> bool {
        matches!(self.state, TrainingState::Training(_))
    }

    /// Looks at the host's last-touched parameter and, if it's usable and not
    /// yet mapped, maps it to the training axis and returns to idle.
    pub fn poll(
        &mut self,
        store: &mut MappingStore,
        host: &mut dyn HostSession,
        options: &PadOptions,
    ) -> TrainingStatus {
        let TrainingState::Training(axis) = self.state else {
            return TrainingStatus::Idle;
        };

        let track_count = host.track_count();
        if track_count == 0 {
            return TrainingStatus::NoTracks(axis);
        }
        if (0..track_count).all(|t| host.fx_count(TrackOrdinal(t)) == 0) {
            return TrainingStatus::NoEffects(axis);
        }
        let Some(target) = Self::touched_target(&*host) else {
            return TrainingStatus::Waiting(axis);
        };
        if store.exists(&target) {
            return TrainingStatus::AlreadyMapped(axis, target);
        }
        match store.add(host, axis, target.clone(), options.mapping_options()) {
            Ok(_) => {
                log::info!(target: "xypad::training", "trained {axis} to {target}");
                self.state = TrainingState::Idle;
                TrainingStatus::Added(axis, target)
            }
            Err(e) => {
                log::debug!(target: "xypad::training", "still waiting: {e}");
                TrainingStatus::Waiting(axis)
            }
        }
    }

    fn touched_target(host: &dyn HostSession) -> Option<HostParameterRef> {
        let touched = host.last_touched_param()?;
        if touched.param.0 >= host.param_count(touched.track, touched.fx) {
            return None;
        }
        Some(HostParameterRef::new_with(
            host.track_id(touched.track)?,
            host.fx_id(touched.track, touched.fx)?,
            touched.param,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::{MemoryFx, MemoryHost, MemoryProject, MemoryTrack},
        mapping::MappingOptions,
        resolver::Resolver,
    };

    fn host() -> MemoryHost {
        MemoryHost::new_with(
            MemoryProject::new_with("p").with_track(
                MemoryTrack::new_with("{T1}", "Drums")
                    .with_fx(MemoryFx::new_with("{A}", "EQ", 4))
                    .with_fx(MemoryFx::new_with("{B}", "Comp", 4)),
            ),
        )
    }

    #[test]
    fn idle_does_nothing() {
        let mut host = host();
        host.touch(0, 0, 0);
        let mut store = MappingStore::default();
        let mut training = TrainingSession::default();
        assert_eq!(
            training.poll(&mut store, &mut host, &PadOptions::default()),
            TrainingStatus::Idle
        );
        assert!(store.is_empty());
    }

    #[test]
    fn training_adds_touched_param_once() {
        let mut host = host();
        let mut store = MappingStore::default();
        let mut training = TrainingSession::default();
        let options = PadOptions::default();

        training.start(Axis::Y);
        assert!(training.is_training());
        assert_eq!(
            training.poll(&mut store, &mut host, &options),
            TrainingStatus::Waiting(Axis::Y)
        );

        host.touch(0, 1, 3);
        let status = training.poll(&mut store, &mut host, &options);
        let TrainingStatus::Added(Axis::Y, target) = status else {
            panic!("expected a new mapping, got {status:?}");
        };
        assert_eq!(target.fx_id, FxId("{B}".to_string()));
        assert_eq!(training.state(), TrainingState::Idle);
        assert_eq!(store.mappings(Axis::Y).len(), 1);
        assert_eq!(
            training.poll(&mut store, &mut host, &options),
            TrainingStatus::Idle
        );
    }

    #[test]
    fn already_mapped_keeps_waiting() {
        let mut host = host();
        let mut store = MappingStore::default();
        let target = HostParameterRef::new_with(
            TrackId("{T1}".to_string()),
            FxId("{A}".to_string()),
            ParamIndex(0),
        );
        store
            .add(&mut host, Axis::X, target.clone(), MappingOptions::default())
            .unwrap();

        let mut training = TrainingSession::default();
        training.start(Axis::Y);
        host.touch(0, 0, 0);
        assert_eq!(
            training.poll(&mut store, &mut host, &PadOptions::default()),
            TrainingStatus::AlreadyMapped(Axis::Y, target)
        );
        assert!(training.is_training());
        assert_eq!(store.len(), 1);

        host.touch(0, 0, 9);
        assert_eq!(
            training.poll(&mut store, &mut host, &PadOptions::default()),
            TrainingStatus::Waiting(Axis::Y),
            "out-of-range params are ignored"
        );

        training.cancel();
        assert_eq!(training.state(), TrainingState::Idle);
    }

    #[test]
    fn empty_projects_are_reported() {
        let mut host = MemoryHost::new_with(MemoryProject::new_with("empty"));
        let resolver = Resolver::build(&host);
        assert!(resolver.is_empty());
        assert!(!resolver.is_valid(&HostParameterRef::new_with(
            TrackId("{T1}".to_string()),
            FxId("{A}".to_string()),
            ParamIndex(0),
        )));

        let mut store = MappingStore::default();
        let mut training = TrainingSession::default();
        training.start(Axis::X);
        host.touch(0, 0, 0);
        assert_eq!(
            training.poll(&mut store, &mut host, &PadOptions::default()),
            TrainingStatus::NoTracks(Axis::X)
        );

        host.project_mut()
            .tracks
            .push(MemoryTrack::new_with("{T1}", "Empty"));
        assert_eq!(
            training.poll(&mut store, &mut host, &PadOptions::default()),
            TrainingStatus::NoEffects(Axis::X)
        );
        assert!(training.is_training());
    }

    #[test]
    fn new_mappings_take_option_defaults() {
        let mut host = host();
        let mut store = MappingStore::default();
        let mut options = PadOptions::default();
        options.set_show_curve_segments(false);
        options.set_curve_thickness(5.0);

        let mut training = TrainingSession::default();
        training.start(Axis::X);
        host.touch(0, 0, 1);
        assert!(matches!(
            training.poll(&mut store, &mut host, &options),
            TrainingStatus::Added(..)
        ));
        let m = &store.mappings(Axis::X)[0];
        assert!(!m.curve_visibility().segments);
        assert!(m.curve_visibility().points);
        assert_eq!(m.style().thickness, 5.0);
    }
}
