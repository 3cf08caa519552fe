// Copyright (c) 2024 Mike Tsao

use crate::types::prelude::*;
use serde::{Deserialize, Serialize};

/// The parameter that the user most recently touched or focused in the host,
/// expressed as positions in the host's current object graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TouchedParam {
    #[allow(missing_docs)]
    pub track: TrackOrdinal,
    #[allow(missing_docs)]
    pub fx: FxOrdinal,
    #[allow(missing_docs)]
    pub param: ParamIndex,
}

/// Whatever the host uses to tell one open project from another. Compared
/// once per tick, so it should be cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectIdentity {
    /// An opaque handle value, if the host has one.
    pub handle: usize,
    /// The project's file path or name. Empty for unsaved projects.
    pub name: String,
}

/// The capabilities this crate needs from the DAW host.
///
/// Tracks and effects are addressed by ordinal here because that's how hosts
/// expose them. Ordinals go stale when the user rearranges things, so nothing
/// in this crate holds on to one without confirming it against the stable
/// [TrackId]/[FxId] first. See [Resolver](crate::resolver::Resolver).
///
/// All methods are expected to be synchronous and cheap.
pub trait HostSession {
    /// The number of tracks in the current project.
    fn track_count(&self) -> usize;
    /// The stable id of the track at `track`, or [None] if out of range.
    fn track_id(&self, track: TrackOrdinal) -> Option<TrackId>;
    /// The track's display name, if it has one.
    fn track_name(&self, track: TrackOrdinal) -> Option<String>;

    /// The number of effects on the given track.
    fn fx_count(&self, track: TrackOrdinal) -> usize;
    /// The stable id of the given effect.
    fn fx_id(&self, track: TrackOrdinal, fx: FxOrdinal) -> Option<FxId>;
    /// The effect's display name, if it has one.
    fn fx_name(&self, track: TrackOrdinal, fx: FxOrdinal) -> Option<String>;

    /// The number of parameters the given effect exposes.
    fn param_count(&self, track: TrackOrdinal, fx: FxOrdinal) -> usize;
    /// The parameter's display name, if it has one.
    fn param_name(&self, track: TrackOrdinal, fx: FxOrdinal, param: ParamIndex) -> Option<String>;
    /// The parameter's current normalized value.
    fn param_value(
        &self,
        track: TrackOrdinal,
        fx: FxOrdinal,
        param: ParamIndex,
    ) -> Option<ControlValue>;
    /// Sets the parameter's normalized value.
    fn set_param_value(
        &mut self,
        track: TrackOrdinal,
        fx: FxOrdinal,
        param: ParamIndex,
        value: ControlValue,
    ) -> anyhow::Result<()>;

    /// The most recently touched or focused parameter, or [None]. This
    /// reflects global interaction state in the host, not anything scoped to
    /// this crate.
    fn last_touched_param(&self) -> Option<TouchedParam>;

    /// Identifies the currently active project.
    fn project_identity(&self) -> ProjectIdentity;
    /// Reads a string stored in the current project.
    fn project_state(&self, section: &str, key: &str) -> Option<String>;
    /// Stores a string in the current project.
    fn set_project_state(&mut self, section: &str, key: &str, value: &str);
    /// Tells the host that the current project has unsaved changes.
    fn mark_project_dirty(&mut self);

    /// Reads a string from host-global (not per-project) storage.
    fn global_state(&self, section: &str, key: &str) -> Option<String>;
    /// Writes a string to host-global storage.
    fn set_global_state(&mut self, section: &str, key: &str, value: &str);
    /// Deletes a key from host-global storage.
    fn delete_global_state(&mut self, section: &str, key: &str);
}
