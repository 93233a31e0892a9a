//! Maps active need conditions to behaviors
//!
//! Each population carries one selector. When a need's condition changes, the
//! highest-priority species rule matching (need, condition) wins; with no
//! match the species default list applies in declared order. The resulting
//! need -> behavior map is what the external movement/animation layer reads.

use ahash::AHashMap;

use crate::core::types::BehaviorId;
use crate::needs::{NeedCondition, NeedKind};
use crate::species::SpeciesData;

#[derive(Debug, Default)]
pub struct BehaviorSelector {
    active: AHashMap<NeedKind, BehaviorId>,
}

impl BehaviorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to a need condition change
    pub fn on_condition_changed(
        &mut self,
        species: &SpeciesData,
        kind: NeedKind,
        condition: NeedCondition,
    ) {
        let chosen = Self::rule_match(species, kind, condition)
            .or_else(|| species.default_behaviors.first().copied());

        match chosen {
            Some(behavior) => {
                tracing::debug!(
                    species = %species.name,
                    need = ?kind,
                    condition = condition.name(),
                    behavior = species.behavior_name(behavior),
                    "behavior selected"
                );
                self.active.insert(kind, behavior);
            }
            None => {
                // species with no behaviors at all (food): nothing to select
                self.active.remove(&kind);
            }
        }
    }

    fn rule_match(
        species: &SpeciesData,
        kind: NeedKind,
        condition: NeedCondition,
    ) -> Option<BehaviorId> {
        species
            .behavior_rules
            .iter()
            .filter(|rule| rule.need == kind && rule.condition == condition)
            .max_by_key(|rule| rule.priority)
            .map(|rule| rule.behavior)
    }

    /// Active behavior for one need, if any
    pub fn behavior_for(&self, kind: NeedKind) -> Option<BehaviorId> {
        self.active.get(&kind).copied()
    }

    /// The full need -> behavior map
    pub fn active(&self) -> &AHashMap<NeedKind, BehaviorId> {
        &self.active
    }
}
