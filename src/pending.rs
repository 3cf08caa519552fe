// Copyright (c) 2024 Mike Tsao

//! Hands mappings from short-lived accessory commands to the running pad.
//!
//! An accessory ("assign the last touched parameter to X") can't reach into
//! the pad's memory. Instead it appends a [PendingMapping] to a queue kept in
//! host-global storage, and the pad drains that queue on its next tick.
//! Draining deletes the key, so each entry is consumed at most once.

use crate::{host::HostSession, mapping::HostParameterRef, types::prelude::*};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// The host-global storage section.
pub const SECTION: &str = "xypad";
/// The host-global storage key for the queue.
pub const KEY: &str = "pending-mappings";

/// A request to map `axis` to a parameter, waiting to be picked up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingMapping {
    #[allow(missing_docs)]
    pub axis: Axis,
    #[allow(missing_docs)]
    pub track_id: TrackId,
    #[allow(missing_docs)]
    pub fx_id: FxId,
    #[allow(missing_docs)]
    pub param_index: ParamIndex,
}
impl PendingMapping {
    /// The parameter this request points at.
    pub fn target(&self) -> HostParameterRef {
        HostParameterRef::new_with(self.track_id.clone(), self.fx_id.clone(), self.param_index)
    }
}

// Older writers stored exactly one request rather than a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum PendingPayload {
    Queue(Vec<PendingMapping>),
    Single(PendingMapping),
}
impl From<PendingPayload> for Vec<PendingMapping> {
    fn from(value: PendingPayload) -> Self {
        match value {
            PendingPayload::Queue(queue) => queue,
            PendingPayload::Single(single) => vec![single],
        }
    }
}

fn read_queue(host: &dyn HostSession) -> Option<Result<Vec<PendingMapping>, serde_json::Error>> {
    let stored = host.global_state(SECTION, KEY)?;
    if stored.trim().is_empty() {
        return Some(Ok(Vec::default()));
    }
    Some(serde_json::from_str::<PendingPayload>(&stored).map(Vec::from))
}

/// Appends a request to the queue.
pub fn post(host: &mut dyn HostSession, pending: PendingMapping) -> anyhow::Result<()> {
    let mut queue = match read_queue(&*host) {
        Some(Ok(queue)) => queue,
        Some(Err(e)) => {
            log::warn!(target: "xypad::pending", "replacing unreadable pending queue: {e}");
            Vec::default()
        }
        None => Vec::default(),
    };
    queue.push(pending);
    host.set_global_state(SECTION, KEY, &serde_json::to_string(&queue)?);
    Ok(())
}

/// Removes and returns every waiting request, oldest first.
pub fn take_all(host: &mut dyn HostSession) -> Vec<PendingMapping> {
    let Some(result) = read_queue(&*host) else {
        return Vec::default();
    };
    host.delete_global_state(SECTION, KEY);
    match result {
        Ok(queue) => {
            if !queue.is_empty() {
                log::debug!(target: "xypad::pending", "took {} pending mappings", queue.len());
            }
            queue
        }
        Err(e) => {
            log::warn!(target: "xypad::pending", "discarding unreadable pending queue: {e}");
            Vec::default()
        }
    }
}

/// Queues a request to map `axis` to whatever parameter the user last
/// touched in the host.
pub fn assign_last_touched(host: &mut dyn HostSession, axis: Axis) -> anyhow::Result<PendingMapping> {
    let touched = host
        .last_touched_param()
        .ok_or_else(|| anyhow!("No parameter has been touched"))?;
    let track_id = host
        .track_id(touched.track)
        .ok_or_else(|| anyhow!("Track {} has no id", touched.track))?;
    let fx_id = host
        .fx_id(touched.track, touched.fx)
        .ok_or_else(|| anyhow!("FX {} on track {} has no id", touched.fx, touched.track))?;
    let pending = PendingMapping {
        axis,
        track_id,
        fx_id,
        param_index: touched.param,
    };
    post(host, pending.clone())?;
    Ok(pending)
}
