// Copyright (c) 2024 Mike Tsao

//! Bindings between pad axes and host parameters, and the store that owns
//! them.
//!
//! A [Mapping] ties one [Axis](crate::types::Axis) to one
//! [HostParameterRef]. Each one carries its own [Curve](crate::curve::Curve)
//! plus a few switches (invert, bypass, curve on/off). The [MappingStore]
//! holds every mapping for the current project and is the only thing that
//! reads or writes them in the host's project storage. On the way out, a
//! mapping is *dehydrated* into a [MappingRecord] holding only the fields
//! worth persisting; on the way back in, each record is *hydrated* against
//! the live host, and records whose track or effect has vanished are dropped.

pub use self::{
    mapping::{
        CurveStyle, CurveVisibility, Mapping, MappingNames, MappingOptions, MappingOptionsBuilder,
    },
    record::{MappingRecord, MappingsBlob},
    store::{MappingAddedFn, MappingStore},
    target::HostParameterRef,
};

#[allow(clippy::module_inception)]
mod mapping;
mod record;
mod store;
mod target;
