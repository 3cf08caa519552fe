// Copyright (c) 2024 Mike Tsao

//! Everything that can go wrong in the mapping engine. None of it is fatal:
//! callers log these and skip the offending mapping or mutation.

use crate::mapping::HostParameterRef;

/// Why a mapping couldn't be created.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// Some mapping, on either axis, already targets this parameter.
    #[error("{0} is already mapped")]
    AlreadyExists(HostParameterRef),

    /// The host doesn't have this track or effect (anymore).
    #[error("{0} doesn't resolve to a live effect parameter")]
    InvalidReference(HostParameterRef),
}

/// Why a curve edit was refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// The first and last points pin the domain and can't be removed.
    #[error("point {0} is an endpoint and can't be deleted")]
    CannotDeleteEndpoint(usize),

    #[allow(missing_docs)]
    #[error("no point at index {0}")]
    IndexOutOfRange(usize),
}

/// Problems moving state in and out of the host's storage.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The stored blob wasn't what we expected.
    #[error("couldn't decode stored state: {0}")]
    Decode(#[source] serde_json::Error),

    #[allow(missing_docs)]
    #[error("couldn't encode state: {0}")]
    Encode(#[source] serde_json::Error),
}
