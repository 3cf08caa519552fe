// Copyright (c) 2024 Mike Tsao

//! Identifiers for host entities. The string ids are opaque and stable across
//! sessions (the host hands them out); the ordinals are positions in the
//! host's current object graph and can change whenever the user reorders
//! tracks or effects.

use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// The host's stable, opaque identifier for a track.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackId(pub String);

/// The host's stable, opaque identifier for an effect. Unique within its
/// track.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FxId(pub String);

/// A zero-based index of a parameter within an effect. Unlike [TrackId] and
/// [FxId], this is positional, so it's trusted only after the owning effect
/// has been found.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamIndex(pub usize);

/// The current zero-based position of a track in the project.
#[derive(Synonym, Serialize, Deserialize)]
pub struct TrackOrdinal(pub usize);

/// The current zero-based position of an effect in its track's chain.
#[derive(Synonym, Serialize, Deserialize)]
pub struct FxOrdinal(pub usize);
