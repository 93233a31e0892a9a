//! Runtime instance of an animal population

use ahash::AHashMap;

use crate::behavior::BehaviorSelector;
use crate::core::types::{LifeId, PopulationId, SpeciesId, Tick, Vec2};
use crate::entity::Life;
use crate::growth::{GrowthCalculator, GrowthStatus, GrowthStrategy, PopulationChange};
use crate::needs::{Need, NeedCondition, NeedKind};
use crate::species::SpeciesData;

/// One animal in a population
#[derive(Debug, Clone, Copy)]
pub struct Member {
    pub id: u32,
    pub born_at: Tick,
}

/// Recycles member slots so growth churn doesn't allocate
#[derive(Debug, Default)]
struct MemberPool {
    free: Vec<Member>,
}

impl MemberPool {
    fn acquire(&mut self, id: u32, tick: Tick) -> Member {
        match self.free.pop() {
            Some(mut member) => {
                member.id = id;
                member.born_at = tick;
                member
            }
            None => Member { id, born_at: tick },
        }
    }

    fn release(&mut self, member: Member) {
        self.free.push(member);
    }
}

/// A population of one animal species
///
/// Members are ordered by arrival; decline removes the most recently added
/// first. Reaching zero members is terminal: the population object stays
/// alive (removal belongs to the caller) but never grows again on its own
/// because its needs stop being recomputed only when unregistered.
pub struct Population {
    pub id: PopulationId,
    pub species: SpeciesId,
    pub position: Vec2,
    members: Vec<Member>,
    pool: MemberPool,
    next_member_id: u32,
    needs: AHashMap<NeedKind, Need>,
    growth: GrowthCalculator,
    behaviors: BehaviorSelector,
    /// Need updates awaiting the behavior pass
    pending_conditions: Vec<(NeedKind, NeedCondition)>,
    /// Set by terrain edits, cleared once consumed by the need pass
    pub accessibility_changed: bool,
    species_name: String,
}

impl Population {
    pub fn new(
        id: PopulationId,
        species: &SpeciesData,
        position: Vec2,
        size: u32,
        death_budget_base: f32,
        tick: Tick,
    ) -> Self {
        let needs = species
            .needs
            .iter()
            .map(|def| {
                (def.kind, Need::new(def.kind, def.thresholds.clone(), def.severity))
            })
            .collect();

        let mut population = Self {
            id,
            species: species.id,
            position,
            members: Vec::new(),
            pool: MemberPool::default(),
            next_member_id: 0,
            needs,
            growth: GrowthCalculator::new(species, death_budget_base),
            behaviors: BehaviorSelector::new(),
            pending_conditions: Vec::new(),
            accessibility_changed: false,
            species_name: species.name.clone(),
        };
        for _ in 0..size {
            population.add_member(tick);
        }
        population
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Crowding weight: head count scaled by the species dominance factor
    pub fn dominance(&self, species: &SpeciesData) -> f32 {
        self.count() as f32 * species.dominance
    }

    pub fn add_member(&mut self, tick: Tick) {
        let id = self.next_member_id;
        self.next_member_id += 1;
        let member = self.pool.acquire(id, tick);
        self.members.push(member);
    }

    /// Remove the most recently added member, returning the remaining count
    pub fn remove_member(&mut self) -> usize {
        if let Some(member) = self.members.pop() {
            self.pool.release(member);
        } else {
            tracing::warn!(population = %self.species_name, "removal from an extinct population");
        }
        self.members.len()
    }

    /// Set a need's value; the resulting condition is queued for the
    /// behavior pass
    pub fn set_need_value(&mut self, kind: NeedKind, value: f32) {
        let Some(need) = self.needs.get_mut(&kind) else {
            debug_assert!(false, "{} population has no need {kind:?}", self.species_name);
            tracing::error!(
                population = %self.species_name,
                need = ?kind,
                "update for an undeclared need ignored"
            );
            return;
        };
        let condition = need.update_value(value);
        self.pending_conditions.push((kind, condition));
    }

    /// Current value of a declared need
    pub fn need_value(&self, kind: NeedKind) -> f32 {
        match self.needs.get(&kind) {
            Some(need) => need.value(),
            None => {
                debug_assert!(false, "{} population has no need {kind:?}", self.species_name);
                tracing::error!(
                    population = %self.species_name,
                    need = ?kind,
                    "query for an undeclared need"
                );
                0.0
            }
        }
    }

    pub fn growth_status(&self) -> GrowthStatus {
        self.growth.status()
    }

    pub fn days_till_death(&self, kind: NeedKind) -> Option<u32> {
        self.growth.days_till_death(kind)
    }

    pub fn days_till_growth(&self) -> u32 {
        self.growth.days_till_growth()
    }

    /// Re-derive growth status and death timers from current conditions
    pub fn calculate_growth(&mut self, strategy: &dyn GrowthStrategy) {
        self.growth.calculate(&self.needs, strategy);
    }

    /// Apply the growth status: at most one member gained or lost
    pub fn handle_growth(&mut self) -> PopulationChange {
        self.growth.handle()
    }

    /// Run queued condition changes through the behavior selector
    pub fn apply_behaviors(&mut self, species: &SpeciesData) {
        for (kind, condition) in std::mem::take(&mut self.pending_conditions) {
            self.behaviors.on_condition_changed(species, kind, condition);
        }
    }

    pub fn behaviors(&self) -> &BehaviorSelector {
        &self.behaviors
    }
}

impl Life for Population {
    fn life_id(&self) -> LifeId {
        LifeId::Population(self.id)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn need_values(&self) -> &AHashMap<NeedKind, Need> {
        &self.needs
    }

    fn update_need(&mut self, kind: NeedKind, value: f32) {
        self.set_need_value(kind, value);
    }

    fn accessibility_status(&self) -> bool {
        self.accessibility_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::needs::NeedThresholds;
    use crate::species::{NeedDefinition, SpeciesClass};

    fn species() -> SpeciesData {
        SpeciesData {
            id: SpeciesId(0),
            name: "loam_vole".into(),
            class: SpeciesClass::Animal,
            dominance: 1.5,
            initial_population: 3,
            growth_cycles: 4,
            base_output: 0.0,
            root_radius: 0,
            needs: vec![NeedDefinition {
                kind: NeedKind::Density,
                thresholds: NeedThresholds::two_band(0.2, 0.5),
                severity: 2.0,
            }],
            behavior_names: vec!["roam".into()],
            behavior_rules: vec![],
            default_behaviors: vec![],
        }
    }

    #[test]
    fn test_spawn_builds_needs_and_members() {
        let pop = Population::new(PopulationId(0), &species(), Vec2::default(), 3, 10.0, 0);
        assert_eq!(pop.count(), 3);
        assert_eq!(pop.need_values().len(), 1);
        assert!(!pop.is_extinct());
    }

    #[test]
    fn test_remove_member_pops_newest_first() {
        let mut pop = Population::new(PopulationId(0), &species(), Vec2::default(), 2, 10.0, 0);
        pop.add_member(9);
        assert_eq!(pop.members().last().unwrap().born_at, 9);
        assert_eq!(pop.remove_member(), 2);
        assert!(pop.members().iter().all(|m| m.born_at == 0));
    }

    #[test]
    fn test_member_pool_recycles_slots() {
        let mut pop = Population::new(PopulationId(0), &species(), Vec2::default(), 1, 10.0, 0);
        pop.remove_member();
        pop.add_member(5);
        assert_eq!(pop.count(), 1);
        // recycled slot carries the new birth tick and a fresh id
        assert_eq!(pop.members()[0].born_at, 5);
        assert_eq!(pop.members()[0].id, 1);
    }

    #[test]
    fn test_dominance_scales_with_count() {
        let pop = Population::new(PopulationId(0), &species(), Vec2::default(), 4, 10.0, 0);
        assert_eq!(pop.dominance(&species()), 6.0);
    }

    #[test]
    fn test_every_update_queues_for_the_behavior_pass() {
        let mut pop = Population::new(PopulationId(0), &species(), Vec2::default(), 2, 10.0, 0);
        pop.set_need_value(NeedKind::Density, 0.9);
        pop.set_need_value(NeedKind::Density, 0.8);
        assert_eq!(pop.pending_conditions.len(), 2);
        assert_eq!(pop.pending_conditions[0], (NeedKind::Density, NeedCondition::Good));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no need")]
    fn test_undeclared_need_update_panics_in_debug() {
        let mut pop = Population::new(PopulationId(0), &species(), Vec2::default(), 1, 10.0, 0);
        pop.set_need_value(NeedKind::Food(SpeciesId(9)), 1.0);
    }
}
