//! Dirty-flagged need-system registry
//!
//! One state slot per need category. Each slot holds a dirty flag and the set
//! of registered entities; the actual recomputation lives in the simulation
//! tick, which skips every clean slot. This lazy discipline is the core
//! performance design: nothing upstream changed means zero need work that
//! tick.

use ahash::AHashSet;

use crate::core::types::LifeId;
use crate::needs::need::NeedSystemKind;

/// Registration and staleness state for one need category
#[derive(Debug, Default)]
pub struct NeedSystemState {
    dirty: bool,
    registered: AHashSet<LifeId>,
    /// Batch recomputes performed, for tests and diagnostics
    recomputes: u64,
}

/// The full set of category systems
#[derive(Debug, Default)]
pub struct NeedSystems {
    states: [NeedSystemState; NeedSystemKind::ALL.len()],
}

impl NeedSystems {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, kind: NeedSystemKind) -> &NeedSystemState {
        &self.states[kind.index()]
    }

    fn state_mut(&mut self, kind: NeedSystemKind) -> &mut NeedSystemState {
        &mut self.states[kind.index()]
    }

    /// Flag a category stale. Idempotent.
    pub fn mark_dirty(&mut self, kind: NeedSystemKind) {
        self.state_mut(kind).dirty = true;
    }

    /// Flag every category stale (startup, full terrain rebuild)
    pub fn mark_all_dirty(&mut self) {
        for kind in NeedSystemKind::ALL {
            self.mark_dirty(kind);
        }
    }

    pub fn is_dirty(&self, kind: NeedSystemKind) -> bool {
        self.state(kind).dirty
    }

    /// Register an entity with a category. Idempotent: re-registering an
    /// already-registered entity changes nothing.
    pub fn register(&mut self, kind: NeedSystemKind, life: LifeId) {
        self.state_mut(kind).registered.insert(life);
    }

    /// Remove an entity from a category. Idempotent.
    pub fn unregister(&mut self, kind: NeedSystemKind, life: LifeId) {
        self.state_mut(kind).registered.remove(&life);
    }

    /// Remove an entity from every category
    pub fn unregister_all(&mut self, life: LifeId) {
        for kind in NeedSystemKind::ALL {
            self.unregister(kind, life);
        }
    }

    pub fn is_registered(&self, kind: NeedSystemKind, life: LifeId) -> bool {
        self.state(kind).registered.contains(&life)
    }

    /// Registered entities of a category, in unspecified order
    pub fn registered(&self, kind: NeedSystemKind) -> impl Iterator<Item = LifeId> + '_ {
        self.state(kind).registered.iter().copied()
    }

    /// Claim a dirty category for recomputation
    ///
    /// Returns false (and does nothing) when the category is clean; otherwise
    /// clears the flag and bumps the recompute counter. The caller must then
    /// actually recompute every registered entity.
    pub fn begin_update(&mut self, kind: NeedSystemKind) -> bool {
        let state = self.state_mut(kind);
        if !state.dirty {
            return false;
        }
        state.dirty = false;
        state.recomputes += 1;
        true
    }

    /// How many batch recomputes this category has run
    pub fn recompute_count(&self, kind: NeedSystemKind) -> u64 {
        self.state(kind).recomputes
    }
}
