// Copyright (c) 2024 Mike Tsao

//! Turns the host's stable track/effect ids into the ordinals the host wants
//! for its API calls.
//!
//! A [Resolver] is a snapshot. It walks the whole track/effect graph once when
//! it's built and never looks at the host again, so it should be rebuilt
//! whenever the graph might have changed. In practice that means once per
//! pointer gesture, which keeps the graph walk out of the per-frame path.

use crate::{host::HostSession, mapping::HostParameterRef, types::prelude::*};
use rustc_hash::FxHashMap;

/// Where a [HostParameterRef] currently lives in the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedParam {
    #[allow(missing_docs)]
    pub track: TrackOrdinal,
    #[allow(missing_docs)]
    pub fx: FxOrdinal,
    #[allow(missing_docs)]
    pub param: ParamIndex,
}

#[derive(Debug, Default)]
struct TrackEntry {
    ordinal: TrackOrdinal,
    fxs: FxHashMap<FxId, FxOrdinal>,
}

/// A read-only two-level lookup: track id to track ordinal, then effect id to
/// effect ordinal within that track.
#[derive(Debug, Default)]
pub struct Resolver {
    tracks: FxHashMap<TrackId, TrackEntry>,
}
impl Resolver {
    /// Scans every track and every effect on it.
    pub fn build(host: &dyn HostSession) -> Self {
        let mut tracks: FxHashMap<TrackId, TrackEntry> = FxHashMap::default();
        for t in 0..host.track_count() {
            let ordinal = TrackOrdinal(t);
            let Some(track_id) = host.track_id(ordinal) else {
                continue;
            };
            if tracks.contains_key(&track_id) {
                // First one wins. Hosts shouldn't hand out duplicates, but if
                // they do, the earlier track is the one a user would expect.
                continue;
            }
            let mut fxs = FxHashMap::default();
            for f in 0..host.fx_count(ordinal) {
                if let Some(fx_id) = host.fx_id(ordinal, FxOrdinal(f)) {
                    fxs.entry(fx_id).or_insert(FxOrdinal(f));
                }
            }
            tracks.insert(track_id, TrackEntry { ordinal, fxs });
        }
        Self { tracks }
    }

    /// Returns the track's current ordinal.
    pub fn resolve_track(&self, track_id: &TrackId) -> Option<TrackOrdinal> {
        self.tracks.get(track_id).map(|entry| entry.ordinal)
    }

    /// Returns the effect's current ordinal within its track.
    pub fn resolve_fx(&self, track_id: &TrackId, fx_id: &FxId) -> Option<FxOrdinal> {
        self.tracks
            .get(track_id)
            .and_then(|entry| entry.fxs.get(fx_id))
            .copied()
    }

    /// Resolves both levels at once. The parameter index is carried through
    /// unchecked; bounds are checked when a value is actually written.
    pub fn resolve(&self, target: &HostParameterRef) -> Option<ResolvedParam> {
        let entry = self.tracks.get(&target.track_id)?;
        let fx = entry.fxs.get(&target.fx_id)?;
        Some(ResolvedParam {
            track: entry.ordinal,
            fx: *fx,
            param: target.param_index,
        })
    }

    /// Whether both the track and the effect can be found.
    pub fn is_valid(&self, target: &HostParameterRef) -> bool {
        self.resolve(target).is_some()
    }

    /// Whether the snapshot saw no tracks at all.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
