// Copyright (c) 2024 Mike Tsao

use super::{
    CurveVisibility, HostParameterRef, Mapping, MappingOptions, MappingRecord, MappingsBlob,
};
use crate::{
    curve::Curve,
    error::{MappingError, PersistError},
    host::HostSession,
    resolver::Resolver,
    types::prelude::*,
};
use derivative::Derivative;

/// Called with each newly added [Mapping]. See
/// [MappingStore::subscribe_on_add()].
pub type MappingAddedFn = dyn FnMut(&Mapping);

/// Holds every [Mapping] for the current project, one ordered list per axis,
/// and keeps the project's stored copy up to date.
///
/// Iteration order is always X then Y, and insertion order within each.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct MappingStore {
    xs: Vec<Mapping>,
    ys: Vec<Mapping>,

    #[derivative(Debug = "ignore")]
    on_add: Vec<Box<MappingAddedFn>>,
}
impl MappingStore {
    /// The project-state section that holds everything this crate stores.
    pub const SECTION: &'static str = "xypad";
    /// The project-state key for the mappings blob.
    pub const KEY: &'static str = "mappings";

    /// Throws away everything in memory and reloads from the host's project
    /// storage. Stored mappings whose track or effect can't be found are
    /// dropped; they'll be gone for good the next time the store saves.
    ///
    /// This never fails. A missing blob means an empty store, and a corrupt
    /// one is logged and treated the same way.
    pub fn reload(&mut self, host: &dyn HostSession) {
        self.xs.clear();
        self.ys.clear();

        let Some(stored) = host.project_state(Self::SECTION, Self::KEY) else {
            log::debug!(target: "xypad::store", "no stored mappings for this project");
            return;
        };
        if stored.trim().is_empty() {
            return;
        }
        let blob = match MappingsBlob::decode(&stored) {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!(target: "xypad::store", "ignoring stored mappings: {e}");
                return;
            }
        };

        let resolver = Resolver::build(host);
        self.xs = Self::hydrate_all(Axis::X, blob.records(Axis::X), &resolver, host);
        self.ys = Self::hydrate_all(Axis::Y, blob.records(Axis::Y), &resolver, host);
        log::debug!(
            target: "xypad::store",
            "loaded {} X and {} Y mappings",
            self.xs.len(),
            self.ys.len()
        );
    }

    fn hydrate_all(
        axis: Axis,
        records: &[MappingRecord],
        resolver: &Resolver,
        host: &dyn HostSession,
    ) -> Vec<Mapping> {
        let mut mappings: Vec<Mapping> = Vec::with_capacity(records.len());
        for record in records {
            match Mapping::hydrate(axis, record, resolver, host) {
                Ok(mapping) => {
                    if mappings.iter().any(|m| m.target() == mapping.target()) {
                        log::info!(target: "xypad::store", "dropping duplicate stored mapping {}", mapping.target());
                    } else {
                        mappings.push(mapping);
                    }
                }
                Err(e) => log::info!(target: "xypad::store", "dropping stored mapping: {e}"),
            }
        }
        mappings
    }

    /// Creates a mapping from `axis` to `target`, saves, and tells
    /// subscribers about it.
    ///
    /// Fails if any mapping on either axis already has this target, or if the
    /// host can't find the target's track and effect.
    pub fn add(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        target: HostParameterRef,
        options: MappingOptions,
    ) -> Result<&Mapping, MappingError> {
        if self.exists(&target) {
            log::info!(target: "xypad::store", "not adding {target}: already mapped");
            return Err(MappingError::AlreadyExists(target));
        }
        let resolver = Resolver::build(&*host);
        let record = MappingRecord {
            track_id: target.track_id.clone(),
            fx_id: target.fx_id.clone(),
            param_index: target.param_index,
            invert: options.invert,
            bypass: options.bypass,
            use_curve: options.use_curve,
            curve_visibility: options.curve_visibility,
            curve: options.curve,
            curve_color: options
                .color
                .unwrap_or_else(|| ColorScheme::nth_curve_color(self.len())),
            curve_thickness: options.thickness,
            point_radius: options.point_radius,
        };
        let mapping = match Mapping::hydrate(axis, &record, &resolver, &*host) {
            Ok(mapping) => mapping,
            Err(e) => {
                log::info!(target: "xypad::store", "not adding mapping: {e}");
                return Err(e);
            }
        };
        log::info!(target: "xypad::store", "mapped {axis} to {}", mapping.name());

        match axis {
            Axis::X => self.xs.push(mapping),
            Axis::Y => self.ys.push(mapping),
        }
        self.save_or_log(host);

        let list = match axis {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        };
        let mapping = &list[list.len() - 1];
        for on_add in self.on_add.iter_mut() {
            on_add(mapping);
        }
        Ok(mapping)
    }

    /// Removes every mapping, on both axes, that matches `predicate`, then
    /// saves. Returns how many were removed.
    pub fn remove(
        &mut self,
        host: &mut dyn HostSession,
        mut predicate: impl FnMut(&Mapping) -> bool,
    ) -> usize {
        let before = self.len();
        self.xs.retain(|m| !predicate(m));
        self.ys.retain(|m| !predicate(m));
        let removed = before - self.len();
        log::debug!(target: "xypad::store", "removed {removed} mappings");
        self.save_or_log(host);
        removed
    }

    /// Removes every selected mapping.
    pub fn remove_selected(&mut self, host: &mut dyn HostSession) -> usize {
        self.remove(host, |m| m.is_selected())
    }

    /// Whether any mapping on either axis targets this parameter.
    pub fn exists(&self, target: &HostParameterRef) -> bool {
        self.find_mapping(|m| m.target() == target).is_some()
    }

    /// Writes every mapping to the host's project storage and marks the
    /// project as changed.
    pub fn save(&self, host: &mut dyn HostSession) -> Result<(), PersistError> {
        let encoded = self.blob().encode()?;
        host.set_project_state(Self::SECTION, Self::KEY, &encoded);
        host.mark_project_dirty();
        Ok(())
    }

    fn save_or_log(&self, host: &mut dyn HostSession) {
        if let Err(e) = self.save(host) {
            log::warn!(target: "xypad::store", "couldn't save mappings: {e}");
        }
    }

    /// The dehydrated form of everything in the store.
    pub fn blob(&self) -> MappingsBlob {
        MappingsBlob {
            xs: self.xs.iter().map(Mapping::dehydrate).collect(),
            ys: self.ys.iter().map(Mapping::dehydrate).collect(),
        }
    }

    /// Visits every mapping, X axis first.
    pub fn with_mappings(&self, mut visit: impl FnMut(&Mapping)) {
        self.xs.iter().chain(self.ys.iter()).for_each(|m| visit(m));
    }

    /// Visits every mapping mutably, X axis first. Nothing is saved.
    pub fn with_mappings_mut(&mut self, mut visit: impl FnMut(&mut Mapping)) {
        self.xs
            .iter_mut()
            .chain(self.ys.iter_mut())
            .for_each(|m| visit(m));
    }

    /// Returns the first mapping, X axis first, that matches `predicate`.
    pub fn find_mapping(&self, mut predicate: impl FnMut(&Mapping) -> bool) -> Option<&Mapping> {
        self.xs.iter().chain(self.ys.iter()).find(|m| predicate(m))
    }

    /// The mappings for one axis, in insertion order.
    pub fn mappings(&self, axis: Axis) -> &[Mapping] {
        match axis {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        }
    }

    /// The mappings for one axis, mutably. Nothing is saved.
    pub fn mappings_mut(&mut self, axis: Axis) -> &mut [Mapping] {
        match axis {
            Axis::X => &mut self.xs,
            Axis::Y => &mut self.ys,
        }
    }

    /// The number of mappings on both axes.
    pub fn len(&self) -> usize {
        self.xs.len() + self.ys.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() && self.ys.is_empty()
    }

    /// Registers a callback to run after each successful
    /// [MappingStore::add()].
    pub fn subscribe_on_add(&mut self, on_add: Box<MappingAddedFn>) {
        self.on_add.push(on_add);
    }

    /// Changes one mapping's persisted settings and saves. Returns false if
    /// there's no such mapping.
    pub fn update(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        f: impl FnOnce(&mut Mapping),
    ) -> bool {
        let Some(mapping) = self.mappings_mut(axis).get_mut(index) else {
            return false;
        };
        f(mapping);
        self.save_or_log(host);
        true
    }

    #[allow(missing_docs)]
    pub fn set_invert(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        invert: bool,
    ) -> bool {
        self.update(host, axis, index, |m| m.set_invert(invert))
    }

    #[allow(missing_docs)]
    pub fn set_bypass(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        bypass: bool,
    ) -> bool {
        self.update(host, axis, index, |m| m.set_bypass(bypass))
    }

    #[allow(missing_docs)]
    pub fn set_use_curve(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        use_curve: bool,
    ) -> bool {
        self.update(host, axis, index, |m| m.set_use_curve(use_curve))
    }

    #[allow(missing_docs)]
    pub fn set_curve_visibility(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        curve_visibility: CurveVisibility,
    ) -> bool {
        self.update(host, axis, index, |m| m.set_curve_visibility(curve_visibility))
    }

    /// Runs a curve edit on one mapping and saves. Returns [None] if there's
    /// no such mapping.
    pub fn edit_curve<R>(
        &mut self,
        host: &mut dyn HostSession,
        axis: Axis,
        index: usize,
        f: impl FnOnce(&mut Curve) -> R,
    ) -> Option<R> {
        let mapping = self.mappings_mut(axis).get_mut(index)?;
        let r = f(mapping.curve_mut());
        self.save_or_log(host);
        Some(r)
    }

    /// Flips a mapping's selection. Selection isn't persisted.
    pub fn toggle_selected(&mut self, axis: Axis, index: usize) -> bool {
        if let Some(mapping) = self.mappings_mut(axis).get_mut(index) {
            mapping.set_is_selected(!mapping.is_selected());
            true
        } else {
            false
        }
    }
}
