//! Runtime instance of a food source

use ahash::AHashMap;

use crate::core::types::{CellPos, FoodSourceId, LifeId, SpeciesId, Vec2};
use crate::entity::Life;
use crate::needs::{Need, NeedCondition, NeedKind};
use crate::species::SpeciesData;
use crate::terrain::{TerrainGrid, TileKind};

/// A planted food source
///
/// Output is all-or-nothing: the species base output while every declared
/// need sits in Good condition, zero otherwise.
pub struct FoodSource {
    pub id: FoodSourceId,
    pub species: SpeciesId,
    pub position: Vec2,
    needs: AHashMap<NeedKind, Need>,
    /// Per-kind tile census within the root radius, compared across terrain
    /// edits to detect accessibility change
    accessible_terrain: [u32; TileKind::COUNT],
    accessibility_checked: bool,
    accessibility_changed: bool,
    prev_output: f32,
    species_name: String,
    root_radius: i32,
}

impl FoodSource {
    pub fn new(
        id: FoodSourceId,
        species: &SpeciesData,
        position: Vec2,
        terrain: &TerrainGrid,
    ) -> Self {
        let needs = species
            .needs
            .iter()
            .map(|def| {
                (def.kind, Need::new(def.kind, def.thresholds.clone(), def.severity))
            })
            .collect();
        let cell = terrain.world_to_cell(position);
        Self {
            id,
            species: species.id,
            position,
            needs,
            accessible_terrain: terrain.count_in_radius(cell, species.root_radius),
            accessibility_checked: false,
            accessibility_changed: false,
            prev_output: 0.0,
            species_name: species.name.clone(),
            root_radius: species.root_radius,
        }
    }

    pub fn cell(&self, terrain: &TerrainGrid) -> CellPos {
        terrain.world_to_cell(self.position)
    }

    /// Edible output this cycle: base output iff every need is Good
    pub fn output(&self, species: &SpeciesData) -> f32 {
        let satisfied = self
            .needs
            .values()
            .all(|need| need.condition() == NeedCondition::Good);
        if satisfied {
            species.base_output
        } else {
            0.0
        }
    }

    /// Record this cycle's output; true when it differs from the tracked
    /// previous value (the initial zero is not reported as a change)
    pub fn note_output(&mut self, output: f32) -> bool {
        let changed = self.prev_output != 0.0 && self.prev_output != output;
        self.prev_output = output;
        changed
    }

    /// Whether the reachable terrain changed since the last refresh
    ///
    /// Only re-censuses once per stale period: the first call after a terrain
    /// edit compares tile counts within the root radius, later calls reuse
    /// the answer until `update_accessible_terrain` resets it.
    pub fn check_accessibility(&mut self, terrain: &TerrainGrid, terrain_changed: bool) -> bool {
        if !terrain_changed {
            return false;
        }
        if self.accessibility_checked {
            return self.accessibility_changed;
        }
        self.accessibility_checked = true;
        let current = terrain.count_in_radius(self.cell(terrain), self.root_radius);
        if current != self.accessible_terrain {
            self.accessibility_changed = true;
        }
        self.accessibility_changed
    }

    /// Refresh the stored census and clear the change flags
    pub fn update_accessible_terrain(&mut self, terrain: &TerrainGrid) {
        if self.accessibility_changed {
            self.accessible_terrain = terrain.count_in_radius(self.cell(terrain), self.root_radius);
        }
        self.accessibility_checked = false;
        self.accessibility_changed = false;
    }

    pub fn set_need_value(&mut self, kind: NeedKind, value: f32) {
        let Some(need) = self.needs.get_mut(&kind) else {
            debug_assert!(false, "{} food source has no need {kind:?}", self.species_name);
            tracing::error!(
                food_source = %self.species_name,
                need = ?kind,
                "update for an undeclared need ignored"
            );
            return;
        };
        need.update_value(value);
    }
}

impl Life for FoodSource {
    fn life_id(&self) -> LifeId {
        LifeId::Food(self.id)
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
