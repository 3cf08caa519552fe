// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! An XY pad for a DAW. Each axis of the pad drives any number of effect
//! parameters in the host, each through its own transfer curve.
//!
//! * [PadSession] owns everything and is driven by the host's UI loop, one
//! [PadSession::tick()] per frame.
//! * [MappingStore] holds the axis-to-parameter [Mapping]s and persists them
//! in the host project.
//! * [Curve] shapes how pointer position becomes parameter value.
//! * [HostSession] is everything the pad needs from the DAW. [MemoryHost]
//! implements it in memory for tests and prototyping.

/// A collection of imports that are useful to users of this crate. `use
/// xypad::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        curve::{ControlPoint, Curve, CurveBuilder},
        dispatch::DispatchOutcome,
        error::{CurveError, MappingError, PersistError},
        host::{HostSession, MemoryHost, ProjectIdentity, TouchedParam},
        mapping::{
            CurveVisibility, HostParameterRef, Mapping, MappingOptions, MappingOptionsBuilder,
            MappingStore,
        },
        options::{CursorStyle, PadOptions},
        pending::PendingMapping,
        session::{MappingReadout, PadBounds, PadFrame, PadInput, PadSession},
        traits::HasSettings,
        training::{TrainingState, TrainingStatus},
        types::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    curve::Curve,
    host::{HostSession, MemoryHost},
    mapping::{Mapping, MappingStore},
    session::PadSession,
    version::app_version,
};

pub mod curve;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod mapping;
pub mod options;
pub mod pending;
pub mod resolver;
pub mod session;
pub mod traits;
pub mod training;
pub mod types;

mod version;
