// Copyright (c) 2024 Mike Tsao

use super::{HostSession, ProjectIdentity, TouchedParam};
use crate::types::prelude::*;
use anyhow::anyhow;
use rustc_hash::FxHashMap;

/// One parameter on a [MemoryFx].
#[derive(Clone, Debug, Default)]
pub struct MemoryParam {
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub value: ControlValue,
}

/// An effect living in a [MemoryHost].
#[derive(Clone, Debug, Default)]
pub struct MemoryFx {
    #[allow(missing_docs)]
    pub id: FxId,
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub params: Vec<MemoryParam>,
}
impl MemoryFx {
    /// Creates an effect with `param_count` named parameters.
    pub fn new_with(id: &str, name: &str, param_count: usize) -> Self {
        Self {
            id: FxId(id.to_string()),
            name: Some(name.to_string()),
            params: (0..param_count)
                .map(|i| MemoryParam {
                    name: Some(format!("{name} {i}")),
                    value: ControlValue::default(),
                })
                .collect(),
        }
    }

    /// Removes the names from everything on this effect, including the
    /// effect itself.
    pub fn anonymous(mut self) -> Self {
        self.name = None;
        self.params.iter_mut().for_each(|p| p.name = None);
        self
    }
}

/// A track living in a [MemoryHost].
#[derive(Clone, Debug, Default)]
pub struct MemoryTrack {
    #[allow(missing_docs)]
    pub id: TrackId,
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub fxs: Vec<MemoryFx>,
}
impl MemoryTrack {
    #[allow(missing_docs)]
    pub fn new_with(id: &str, name: &str) -> Self {
        Self {
            id: TrackId(id.to_string()),
            name: Some(name.to_string()),
            fxs: Vec::default(),
        }
    }

    /// Appends an effect to the end of the chain.
    pub fn with_fx(mut self, fx: MemoryFx) -> Self {
        self.fxs.push(fx);
        self
    }
}

/// A project living in a [MemoryHost].
#[derive(Clone, Debug, Default)]
pub struct MemoryProject {
    #[allow(missing_docs)]
    pub identity: ProjectIdentity,
    #[allow(missing_docs)]
    pub tracks: Vec<MemoryTrack>,
    state: FxHashMap<(String, String), String>,
    is_dirty: bool,
}
impl MemoryProject {
    #[allow(missing_docs)]
    pub fn new_with(name: &str) -> Self {
        Self {
            identity: ProjectIdentity {
                handle: 0,
                name: name.to_string(),
            },
            ..Default::default()
        }
    }

    /// Appends a track.
    pub fn with_track(mut self, track: MemoryTrack) -> Self {
        self.tracks.push(track);
        self
    }

    /// Whether anything has called [HostSession::mark_project_dirty()] on
    /// this project.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Returns a stored project value.
    pub fn state(&self, section: &str, key: &str) -> Option<&String> {
        self.state.get(&(section.to_string(), key.to_string()))
    }

    /// Overwrites a stored project value, bypassing the dirty flag.
    pub fn set_state(&mut self, section: &str, key: &str, value: &str) {
        self.state
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    fn fx(&self, track: TrackOrdinal, fx: FxOrdinal) -> Option<&MemoryFx> {
        self.tracks.get(track.0).and_then(|t| t.fxs.get(fx.0))
    }

    fn fx_mut(&mut self, track: TrackOrdinal, fx: FxOrdinal) -> Option<&mut MemoryFx> {
        self.tracks.get_mut(track.0).and_then(|t| t.fxs.get_mut(fx.0))
    }
}

/// An in-memory [HostSession]. It holds any number of projects, one of which
/// is active, and records every parameter write so that callers can inspect
/// what happened. Useful for tests and for prototyping without a DAW.
///
/// There's always an active project, so there's no [Default]; start from
/// [MemoryHost::new_with()].
#[derive(Debug)]
pub struct MemoryHost {
    projects: Vec<MemoryProject>,
    active: usize,
    global: FxHashMap<(String, String), String>,
    last_touched: Option<TouchedParam>,
    param_writes: Vec<(TrackOrdinal, FxOrdinal, ParamIndex, ControlValue)>,
}
impl MemoryHost {
    /// Creates a host with a single active project.
    pub fn new_with(project: MemoryProject) -> Self {
        Self {
            projects: vec![project],
            active: 0,
            global: FxHashMap::default(),
            last_touched: None,
            param_writes: Vec::default(),
        }
    }

    /// Adds another project and returns its position. It doesn't become
    /// active.
    pub fn add_project(&mut self, mut project: MemoryProject) -> usize {
        project.identity.handle = self.projects.len();
        self.projects.push(project);
        self.projects.len() - 1
    }

    /// Makes a different project the active one.
    pub fn switch_to(&mut self, index: usize) {
        if index < self.projects.len() {
            self.active = index;
        }
    }

    /// The active project.
    pub fn project(&self) -> &MemoryProject {
        &self.projects[self.active]
    }

    /// The active project, mutably.
    pub fn project_mut(&mut self) -> &mut MemoryProject {
        &mut self.projects[self.active]
    }

    /// Simulates the user touching a parameter.
    pub fn touch(&mut self, track: usize, fx: usize, param: usize) {
        self.last_touched = Some(TouchedParam {
            track: TrackOrdinal(track),
            fx: FxOrdinal(fx),
            param: ParamIndex(param),
        });
    }

    /// Every parameter write since creation or the last
    /// [MemoryHost::clear_param_writes()].
    pub fn param_writes(&self) -> &[(TrackOrdinal, FxOrdinal, ParamIndex, ControlValue)] {
        &self.param_writes
    }

    #[allow(missing_docs)]
    pub fn clear_param_writes(&mut self) {
        self.param_writes.clear();
    }
}
impl HostSession for MemoryHost {
    fn track_count(&self) -> usize {
        self.project().tracks.len()
    }

    fn track_id(&self, track: TrackOrdinal) -> Option<TrackId> {
        self.project().tracks.get(track.0).map(|t| t.id.clone())
    }

    fn track_name(&self, track: TrackOrdinal) -> Option<String> {
        self.project()
            .tracks
            .get(track.0)
            .and_then(|t| t.name.clone())
    }

    fn fx_count(&self, track: TrackOrdinal) -> usize {
        self.project()
            .tracks
            .get(track.0)
            .map_or(0, |t| t.fxs.len())
    }

    fn fx_id(&self, track: TrackOrdinal, fx: FxOrdinal) -> Option<FxId> {
        self.project().fx(track, fx).map(|f| f.id.clone())
    }

    fn fx_name(&self, track: TrackOrdinal, fx: FxOrdinal) -> Option<String> {
        self.project().fx(track, fx).and_then(|f| f.name.clone())
    }

    fn param_count(&self, track: TrackOrdinal, fx: FxOrdinal) -> usize {
        self.project().fx(track, fx).map_or(0, |f| f.params.len())
    }

    fn param_name(&self, track: TrackOrdinal, fx: FxOrdinal, param: ParamIndex) -> Option<String> {
        self.project()
            .fx(track, fx)
            .and_then(|f| f.params.get(param.0))
            .and_then(|p| p.name.clone())
    }

    fn param_value(
        &self,
        track: TrackOrdinal,
        fx: FxOrdinal,
        param: ParamIndex,
    ) -> Option<ControlValue> {
        self.project()
            .fx(track, fx)
            .and_then(|f| f.params.get(param.0))
            .map(|p| p.value)
    }

    fn set_param_value(
        &mut self,
        track: TrackOrdinal,
        fx: FxOrdinal,
        param: ParamIndex,
        value: ControlValue,
    ) -> anyhow::Result<()> {
        let Some(p) = self
            .project_mut()
            .fx_mut(track, fx)
            .and_then(|f| f.params.get_mut(param.0))
        else {
            return Err(anyhow!("No parameter {param} on track {track} fx {fx}"));
        };
        p.value = value;
        self.param_writes.push((track, fx, param, value));
        Ok(())
    }

    fn last_touched_param(&self) -> Option<TouchedParam> {
        self.last_touched
    }

    fn project_identity(&self) -> ProjectIdentity {
        self.project().identity.clone()
    }

    fn project_state(&self, section: &str, key: &str) -> Option<String> {
        self.project().state(section, key).cloned()
    }

    fn set_project_state(&mut self, section: &str, key: &str, value: &str) {
        self.project_mut().set_state(section, key, value);
    }

    fn mark_project_dirty(&mut self) {
        self.project_mut().is_dirty = true;
    }

    fn global_state(&self, section: &str, key: &str) -> Option<String> {
        self.global
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn set_global_state(&mut self, section: &str, key: &str, value: &str) {
        self.global
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    fn delete_global_state(&mut self, section: &str, key: &str) {
        self.global.remove(&(section.to_string(), key.to_string()));
    }
}
