// Copyright (c) 2024 Mike Tsao

//! Traits shared across the crate.

/// Configuration that's persisted somewhere outside the struct. Implementing
/// [HasSettings] lets the owner write the struct back only when something
/// actually changed.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}
