// Copyright (c) 2024 Mike Tsao

//! The boundary between this crate and the DAW that hosts it.

pub use memory::{MemoryFx, MemoryHost, MemoryParam, MemoryProject, MemoryTrack};
pub use traits::{HostSession, ProjectIdentity, TouchedParam};

mod memory;
mod traits;
