// Copyright (c) 2024 Mike Tsao

use crate::types::prelude::*;
use core::fmt::Display;
use serde::{Deserialize, Serialize};

/// Names one automatable parameter in the host: a track, an effect on that
/// track, and a parameter on that effect. The two ids are stable; the
/// parameter index is positional and is trusted only once the effect has been
/// found.
///
/// Two mappings are "the same target" exactly when their
/// [HostParameterRef]s are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostParameterRef {
    #[allow(missing_docs)]
    pub track_id: TrackId,
    #[allow(missing_docs)]
    pub fx_id: FxId,
    #[allow(missing_docs)]
    pub param_index: ParamIndex,
}
impl HostParameterRef {
    #[allow(missing_docs)]
    pub fn new_with(track_id: TrackId, fx_id: FxId, param_index: ParamIndex) -> Self {
        Self {
            track_id,
            fx_id,
            param_index,
        }
    }
}
impl Display for HostParameterRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{}/#{}",
            self.track_id.0, self.fx_id.0, self.param_index.0
        )
    }
}
