//! Species definitions driving entity construction
//!
//! Everything an entity derives from its species is resolved once at load
//! time: need kinds, threshold bands, severities, the flat behavior rule
//! table, and growth pacing. Runtime code never touches strings.

use ahash::AHashMap;

use crate::core::types::{BehaviorId, SpeciesId};
use crate::needs::{NeedCondition, NeedKind, NeedThresholds};

/// Whether a species spawns populations or food sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesClass {
    Animal,
    Food,
}

/// One need a member of the species is born with
#[derive(Debug, Clone)]
pub struct NeedDefinition {
    pub kind: NeedKind,
    pub thresholds: NeedThresholds,
    pub severity: f32,
}

/// Maps a (need, condition) pair to a behavior
#[derive(Debug, Clone, Copy)]
pub struct BehaviorRule {
    pub need: NeedKind,
    pub condition: NeedCondition,
    pub behavior: BehaviorId,
    pub priority: u8,
}

/// Static data for one species
#[derive(Debug, Clone)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub class: SpeciesClass,
    /// Weight of one member in enclosure crowding
    pub dominance: f32,
    pub initial_population: u32,
    /// Satisfied Growing cycles needed per new member
    pub growth_cycles: u32,
    /// Edible output while all needs are Good (food species)
    pub base_output: f32,
    /// Terrain census radius in cells (food species root reach)
    pub root_radius: i32,
    pub needs: Vec<NeedDefinition>,
    /// Behavior vocabulary; `BehaviorId` indexes into this
    pub behavior_names: Vec<String>,
    pub behavior_rules: Vec<BehaviorRule>,
    /// Lowest-priority fallbacks, in declared order
    pub default_behaviors: Vec<BehaviorId>,
}

impl SpeciesData {
    pub fn behavior_name(&self, behavior: BehaviorId) -> &str {
        self.behavior_names
            .get(behavior.0 as usize)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    pub fn declares_need(&self, kind: NeedKind) -> bool {
        self.needs.iter().any(|n| n.kind == kind)
    }
}

/// All loaded species, addressed by id or name
#[derive(Debug, Default)]
pub struct SpeciesTable {
    species: Vec<SpeciesData>,
    by_name: AHashMap<String, SpeciesId>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, data: SpeciesData) -> SpeciesId {
        let id = data.id;
        debug_assert_eq!(id.0 as usize, self.species.len(), "species ids must be dense");
        self.by_name.insert(data.name.clone(), id);
        self.species.push(data);
        id
    }

    pub fn get(&self, id: SpeciesId) -> &SpeciesData {
        &self.species[id.0 as usize]
    }

    pub fn id_of(&self, name: &str) -> Option<SpeciesId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesData> {
        self.species.iter()
    }
}
