// Copyright (c) 2024 Mike Tsao

//! Pushes pad positions out to host parameters.
//!
//! Dispatch runs once per mapping per frame while the pointer is engaged. It
//! trusts each mapping's cached ordinals only after checking them against the
//! host's current ids, because users can reorder tracks and effects between
//! gestures.

use crate::{
    host::HostSession,
    mapping::{Mapping, MappingStore},
    resolver::{ResolvedParam, Resolver},
    types::prelude::*,
};

/// What happened when a mapping was dispatched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The value was written to the host.
    Written(Normal),
    /// The value was computed but not written because the mapping is
    /// bypassed.
    Bypassed(Normal),
    /// The target couldn't be found, so nothing happened.
    Missing,
}

/// Evaluates `mapping` for `input` and writes the result to its target.
///
/// A bypassed mapping still updates its current value so the pad can show
/// what it would have sent. A mapping whose target can't be found is marked
/// missing and left alone; it's warned about only on the frame it goes
/// missing.
pub fn dispatch(
    mapping: &mut Mapping,
    input: Normal,
    resolver: &Resolver,
    host: &mut dyn HostSession,
) -> DispatchOutcome {
    let output = mapping.transfer(input);
    if mapping.bypass() {
        mapping.set_current_value(output);
        return DispatchOutcome::Bypassed(output);
    }

    let Some(resolved) = locate(mapping, resolver, &*host) else {
        mark_missing(mapping, "can't be found");
        return DispatchOutcome::Missing;
    };
    if let Err(e) = host.set_param_value(resolved.track, resolved.fx, resolved.param, output.into())
    {
        mark_missing(mapping, &e.to_string());
        return DispatchOutcome::Missing;
    }
    if mapping.is_missing() {
        log::info!(target: "xypad::dispatch", "{} is back", mapping.target());
        mapping.set_is_missing(false);
    }
    mapping.set_current_value(output);
    DispatchOutcome::Written(output)
}

/// Dispatches every mapping on `axis` with the same input.
pub fn dispatch_axis(
    store: &mut MappingStore,
    axis: Axis,
    input: Normal,
    resolver: &Resolver,
    host: &mut dyn HostSession,
) -> Vec<DispatchOutcome> {
    store
        .mappings_mut(axis)
        .iter_mut()
        .map(|mapping| dispatch(mapping, input, resolver, host))
        .collect()
}

fn locate(mapping: &mut Mapping, resolver: &Resolver, host: &dyn HostSession) -> Option<ResolvedParam> {
    let resolved = match mapping.resolved() {
        Some(cached) if still_points_at(mapping, cached, host) => cached,
        _ => {
            let fresh = resolver.resolve(mapping.target())?;
            if !still_points_at(mapping, fresh, host) {
                return None;
            }
            log::debug!(
                target: "xypad::dispatch",
                "{} moved to track {} fx {}",
                mapping.target(),
                fresh.track.0,
                fresh.fx.0
            );
            mapping.set_resolved(Some(fresh));
            fresh
        }
    };
    (resolved.param.0 < host.param_count(resolved.track, resolved.fx)).then_some(resolved)
}

fn still_points_at(mapping: &Mapping, resolved: ResolvedParam, host: &dyn HostSession) -> bool {
    let target = mapping.target();
    host.track_id(resolved.track).as_ref() == Some(&target.track_id)
        && host.fx_id(resolved.track, resolved.fx).as_ref() == Some(&target.fx_id)
}

fn mark_missing(mapping: &mut Mapping, why: &str) {
    if !mapping.is_missing() {
        log::warn!(target: "xypad::dispatch", "skipping {}: {why}", mapping.target());
        mapping.set_is_missing(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        curve::CurveBuilder,
        host::{MemoryFx, MemoryHost, MemoryProject, MemoryTrack},
        mapping::{HostParameterRef, MappingOptions, MappingOptionsBuilder},
    };
    use float_cmp::approx_eq;

    fn host() -> MemoryHost {
        MemoryHost::new_with(
            MemoryProject::new_with("p").with_track(
                MemoryTrack::new_with("{T1}", "Drums")
                    .with_fx(MemoryFx::new_with("{A}", "EQ", 4))
                    .with_fx(MemoryFx::new_with("{B}", "Comp", 4)),
            ),
        )
    }

    fn target(fx: &str, param: usize) -> HostParameterRef {
        HostParameterRef::new_with(TrackId("{T1}".to_string()), FxId(fx.to_string()), ParamIndex(param))
    }

    fn store_with(host: &mut MemoryHost, options: MappingOptions) -> MappingStore {
        let mut store = MappingStore::default();
        store.add(host, Axis::X, target("{B}", 2), options).unwrap();
        host.clear_param_writes();
        store
    }

    #[test]
    fn dispatch_writes_transferred_value() {
        let mut host = host();
        let mut store = store_with(
            &mut host,
            MappingOptionsBuilder::default()
                .curve(
                    CurveBuilder::default()
                        .point((0.0, 0.0))
                        .point((0.5, 1.0))
                        .point((1.0, 0.0))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        );
        let resolver = Resolver::build(&host);
        let mapping = &mut store.mappings_mut(Axis::X)[0];

        let outcome = dispatch(mapping, Normal::new(0.25), &resolver, &mut host);
        assert_eq!(outcome, DispatchOutcome::Written(Normal::new(0.5)));
        assert_eq!(mapping.current_value(), Normal::new(0.5));
        assert_eq!(host.param_writes().len(), 1);
        let (track, fx, param, value) = host.param_writes()[0];
        assert_eq!((track, fx, param), (TrackOrdinal(0), FxOrdinal(1), ParamIndex(2)));
        assert!(approx_eq!(f64, value.0, 0.5, epsilon = 1e-12));
    }

    #[test]
    fn invert_mirrors_output() {
        let mut host = host();
        let mut store = store_with(&mut host, MappingOptions::default());
        let resolver = Resolver::build(&host);
        let curve = CurveBuilder::default()
            .point((0.0, 0.1))
            .point((0.3, 0.8))
            .point((1.0, 0.4))
            .build()
            .unwrap();
        let mapping = &mut store.mappings_mut(Axis::X)[0];
        *mapping.curve_mut() = curve;

        for i in 0..=20 {
            let input = Normal::new(i as f64 / 20.0);
            mapping.set_invert(false);
            let DispatchOutcome::Written(plain) = dispatch(mapping, input, &resolver, &mut host) else {
                panic!("expected a write");
            };
            mapping.set_invert(true);
            let DispatchOutcome::Written(inverted) = dispatch(mapping, input, &resolver, &mut host)
            else {
                panic!("expected a write");
            };
            assert!(approx_eq!(f64, inverted.0, 1.0 - plain.0, epsilon = 1e-12));
        }
    }

    #[test]
    fn bypass_skips_host_but_tracks_value() {
        let mut host = host();
        let mut store = store_with(
            &mut host,
            MappingOptionsBuilder::default().bypass(true).build().unwrap(),
        );
        let resolver = Resolver::build(&host);
        let mapping = &mut store.mappings_mut(Axis::X)[0];

        let outcome = dispatch(mapping, Normal::new(0.7), &resolver, &mut host);
        assert_eq!(outcome, DispatchOutcome::Bypassed(Normal::new(0.7)));
        assert!(host.param_writes().is_empty());
        assert_eq!(mapping.current_value(), Normal::new(0.7));
    }

    #[test]
    fn follows_reordered_effects() {
        let mut host = host();
        let mut store = store_with(&mut host, MappingOptions::default());
        host.project_mut().tracks[0].fxs.swap(0, 1);

        let resolver = Resolver::build(&host);
        let mapping = &mut store.mappings_mut(Axis::X)[0];
        assert_eq!(mapping.resolved().map(|r| r.fx), Some(FxOrdinal(1)));
        assert_eq!(
            dispatch(mapping, Normal::new(0.3), &resolver, &mut host),
            DispatchOutcome::Written(Normal::new(0.3))
        );
        assert_eq!(mapping.resolved().map(|r| r.fx), Some(FxOrdinal(0)));
        assert_eq!(host.param_writes()[0].1, FxOrdinal(0));
    }

    #[test]
    fn stale_resolver_does_not_write_to_wrong_effect() {
        let mut host = host();
        let mut store = store_with(&mut host, MappingOptions::default());
        let stale = Resolver::build(&host);
        host.project_mut().tracks[0].fxs.swap(0, 1);

        let mapping = &mut store.mappings_mut(Axis::X)[0];
        assert_eq!(
            dispatch(mapping, Normal::new(0.3), &stale, &mut host),
            DispatchOutcome::Missing
        );
        assert!(host.param_writes().is_empty());

        let resolver = Resolver::build(&host);
        assert!(matches!(
            dispatch(mapping, Normal::new(0.3), &resolver, &mut host),
            DispatchOutcome::Written(_)
        ));
        assert_eq!(host.param_writes()[0].1, FxOrdinal(0));
    }

    #[test]
    fn missing_target_is_kept_and_recovers() {
        let mut host = host();
        let mut store = store_with(&mut host, MappingOptions::default());
        let removed = host.project_mut().tracks[0].fxs.remove(1);

        let resolver = Resolver::build(&host);
        let mapping = &mut store.mappings_mut(Axis::X)[0];
        for _ in 0..3 {
            assert_eq!(
                dispatch(mapping, Normal::new(0.9), &resolver, &mut host),
                DispatchOutcome::Missing
            );
        }
        assert!(mapping.is_missing());
        assert!(host.param_writes().is_empty());

        // Undo brings it back.
        host.project_mut().tracks[0].fxs.insert(1, removed);
        let resolver = Resolver::build(&host);
        assert!(matches!(
            dispatch(mapping, Normal::new(0.9), &resolver, &mut host),
            DispatchOutcome::Written(_)
        ));
        assert!(!mapping.is_missing());
    }

    #[test]
    fn out_of_range_param_is_missing() {
        let mut host = host();
        let mut store = MappingStore::default();
        store
            .add(&mut host, Axis::Y, target("{A}", 9), MappingOptions::default())
            .unwrap();
        let resolver = Resolver::build(&host);
        let outcomes = dispatch_axis(&mut store, Axis::Y, Normal::new(0.5), &resolver, &mut host);
        assert_eq!(outcomes, vec![DispatchOutcome::Missing]);
        assert!(store.mappings(Axis::Y)[0].is_missing());
    }
}
