//! The simulation context object
//!
//! One explicit context owns everything: terrain, enclosures, entities, need
//! systems, events, config, and the RNG. No process-wide registries — two
//! contexts side by side never share state, which is what makes the tests
//! (and multiple simultaneous habitats) possible.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{BiodomeError, Result};
use crate::core::types::{
    CellRect, FoodSourceId, LifeId, PopulationId, RegionId, SpeciesId, Tick, Vec2, WALL_REGION,
};
use crate::enclosure::{AtmosphericComposition, EnclosureGraph};
use crate::entity::{FoodSource, Life, Population};
use crate::growth::{GrowthStrategy, SeverityWeighted};
use crate::needs::{NeedSystemKind, NeedSystems};
use crate::simulation::events::EventBus;
use crate::species::{SpeciesClass, SpeciesTable};
use crate::terrain::TerrainGrid;

/// Snapshot of one enclosed region and its residents
#[derive(Debug, Clone)]
pub struct EnclosedArea {
    pub region: RegionId,
    pub composition: AtmosphericComposition,
    pub populations: Vec<PopulationId>,
    pub food_sources: Vec<FoodSourceId>,
}

/// Owning root of one habitat simulation
pub struct SimulationContext {
    pub config: SimulationConfig,
    pub species: SpeciesTable,
    pub terrain: TerrainGrid,
    pub enclosures: EnclosureGraph,
    pub populations: Vec<Population>,
    pub food_sources: Vec<FoodSource>,
    pub need_systems: NeedSystems,
    pub events: EventBus,
    pub growth_strategy: Box<dyn GrowthStrategy>,
    pub current_tick: Tick,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) pending_edits: Vec<CellRect>,
}

impl SimulationContext {
    /// Build a context and run the startup flood fill
    pub fn new(
        species: SpeciesTable,
        terrain: TerrainGrid,
        config: SimulationConfig,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut enclosures = EnclosureGraph::new(config.region_cap);
        enclosures.full_recompute(&terrain, &mut rng, config.temperature_max);

        let mut need_systems = NeedSystems::new();
        need_systems.mark_all_dirty();

        Self {
            config,
            species,
            terrain,
            enclosures,
            populations: Vec::new(),
            food_sources: Vec::new(),
            need_systems,
            events: EventBus::new(),
            growth_strategy: Box::new(SeverityWeighted),
            current_tick: 0,
            rng,
            pending_edits: Vec::new(),
        }
    }

    /// Spawn a population of an animal species
    pub fn spawn_population(
        &mut self,
        species: SpeciesId,
        position: Vec2,
        size: u32,
    ) -> Result<PopulationId> {
        let data = self.species.get(species);
        if data.class != SpeciesClass::Animal {
            return Err(BiodomeError::WrongSpeciesClass {
                name: data.name.clone(),
                class: "food",
                wanted: "a population",
            });
        }

        let id = PopulationId(self.populations.len() as u32);
        let population = Population::new(
            id,
            data,
            position,
            size,
            self.config.death_budget_base,
            self.current_tick,
        );
        self.register_life(LifeId::Population(id), &population);
        self.populations.push(population);

        // a new population changes crowding and competition for everyone
        self.need_systems.mark_dirty(NeedSystemKind::Density);
        self.need_systems.mark_dirty(NeedSystemKind::Symbiosis);
        tracing::info!(species = %self.species.get(species).name, ?id, size, "population spawned");
        Ok(id)
    }

    /// Plant a food source of a food species
    pub fn spawn_food_source(&mut self, species: SpeciesId, position: Vec2) -> Result<FoodSourceId> {
        let data = self.species.get(species);
        if data.class != SpeciesClass::Food {
            return Err(BiodomeError::WrongSpeciesClass {
                name: data.name.clone(),
                class: "animal",
                wanted: "a food source",
            });
        }

        let id = FoodSourceId(self.food_sources.len() as u32);
        let food = FoodSource::new(id, data, position, &self.terrain);
        self.register_life(LifeId::Food(id), &food);
        self.food_sources.push(food);

        // populations eating this species must re-evaluate their supply
        self.need_systems.mark_dirty(NeedSystemKind::Food);
        tracing::info!(species = %self.species.get(species).name, ?id, "food source planted");
        Ok(id)
    }

    fn register_life(&mut self, id: LifeId, life: &dyn Life) {
        for kind in life.need_values().keys() {
            self.need_systems.register(kind.system(), id);
        }
    }

    /// Drop an entity from every need system (the external collaborator calls
    /// this when discarding an extinct population). Idempotent.
    pub fn unregister_life(&mut self, id: LifeId) {
        self.need_systems.unregister_all(id);
    }

    /// Terrain-edit hook: queue the affected rectangle for the next tick's
    /// incremental enclosure recompute
    pub fn on_terrain_changed(&mut self, rect: CellRect) {
        self.pending_edits.push(rect);
    }

    /// Edit one tile and queue the recompute if anything changed
    pub fn place_tile(&mut self, pos: crate::core::types::CellPos, kind: crate::terrain::TileKind) -> bool {
        match self.terrain.set_tile(pos, kind) {
            Some(rect) => {
                self.on_terrain_changed(rect);
                true
            }
            None => false,
        }
    }

    /// Composition of the region at a world position, None off-grid or on a wall
    pub fn atmospheric_composition(&self, position: Vec2) -> Option<AtmosphericComposition> {
        let cell = self.terrain.world_to_cell(position);
        self.enclosures.composition_at(cell).copied()
    }

    /// The enclosed region at a world position together with its residents
    pub fn enclosed_area_by_position(&self, position: Vec2) -> Option<EnclosedArea> {
        let cell = self.terrain.world_to_cell(position);
        let region = self.enclosures.region_at(cell)?;
        if region == WALL_REGION {
            return None;
        }
        let composition = *self.enclosures.composition_at(cell)?;

        let populations = self
            .populations
            .iter()
            .filter(|p| {
                let cell = self.terrain.world_to_cell(p.position);
                self.enclosures.region_at(cell) == Some(region)
            })
            .map(|p| p.id)
            .collect();
        let food_sources = self
            .food_sources
            .iter()
            .filter(|f| {
                let cell = self.terrain.world_to_cell(f.position);
                self.enclosures.region_at(cell) == Some(region)
            })
            .map(|f| f.id)
            .collect();

        Some(EnclosedArea { region, composition, populations, food_sources })
    }

    pub fn population(&self, id: PopulationId) -> &Population {
        &self.populations[id.0 as usize]
    }

    pub fn population_mut(&mut self, id: PopulationId) -> &mut Population {
        &mut self.populations[id.0 as usize]
    }

    pub fn food_source(&self, id: FoodSourceId) -> &FoodSource {
        &self.food_sources[id.0 as usize]
    }

    pub fn food_source_mut(&mut self, id: FoodSourceId) -> &mut FoodSource {
        &mut self.food_sources[id.0 as usize]
    }

    /// Uniform view of any living entity
    pub fn life(&self, id: LifeId) -> &dyn Life {
        match id {
            LifeId::Population(p) => self.population(p),
            LifeId::Food(f) => self.food_source(f),
        }
    }

    /// Uniform mutable view of any living entity
    pub fn life_mut(&mut self, id: LifeId) -> &mut dyn Life {
        match id {
            LifeId::Population(p) => self.population_mut(p),
            LifeId::Food(f) => self.food_source_mut(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CellPos;
    use crate::needs::{NeedKind, NeedThresholds};
    use crate::species::{NeedDefinition, SpeciesData};
    use crate::terrain::TileKind;

    fn table() -> SpeciesTable {
        let mut table = SpeciesTable::new();
        table.insert(SpeciesData {
            id: SpeciesId(0),
            name: "loam_vole".into(),
            class: SpeciesClass::Animal,
            dominance: 1.0,
            initial_population: 2,
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
        });
        table.insert(SpeciesData {
            id: SpeciesId(1),
            name: "saltgrass".into(),
            class: SpeciesClass::Food,
            dominance: 0.0,
            initial_population: 1,
            growth_cycles: 1,
            base_output: 40.0,
            root_radius: 2,
            needs: vec![],
            behavior_names: vec![],
            behavior_rules: vec![],
            default_behaviors: vec![],
        });
        table
    }

    fn context() -> SimulationContext {
        SimulationContext::new(
            table(),
            TerrainGrid::new(10, 10),
            SimulationConfig::default(),
            42,
        )
    }

    #[test]
    fn test_startup_runs_flood_fill() {
        let ctx = context();
        assert!(ctx.enclosures.is_initialized());
        assert_eq!(ctx.enclosures.region_count(), 1);
    }

    #[test]
    fn test_spawn_population_registers_needs() {
        let mut ctx = context();
        let id = ctx.spawn_population(SpeciesId(0), Vec2::new(2.0, 2.0), 3).unwrap();
        assert_eq!(ctx.population(id).count(), 3);
        assert!(ctx
            .need_systems
            .is_registered(NeedSystemKind::Density, LifeId::Population(id)));
    }

    #[test]
    fn test_spawn_rejects_wrong_class() {
        let mut ctx = context();
        assert!(ctx.spawn_population(SpeciesId(1), Vec2::default(), 2).is_err());
        assert!(ctx.spawn_food_source(SpeciesId(0), Vec2::default()).is_err());
    }

    #[test]
    fn test_enclosed_area_lists_residents() {
        let mut ctx = context();
        let pop = ctx.spawn_population(SpeciesId(0), Vec2::new(2.0, 2.0), 2).unwrap();
        let food = ctx.spawn_food_source(SpeciesId(1), Vec2::new(7.0, 7.0)).unwrap();

        let area = ctx.enclosed_area_by_position(Vec2::new(4.0, 4.0)).unwrap();
        assert_eq!(area.region, 0);
        assert_eq!(area.populations, vec![pop]);
        assert_eq!(area.food_sources, vec![food]);
    }

    #[test]
    fn test_area_query_on_wall_is_none() {
        let mut ctx = context();
        ctx.terrain.set_tile(CellPos::new(5, 5), TileKind::Wall);
        // the wall is only labeled after a recompute; force one through the hook
        ctx.on_terrain_changed(CellRect::from_cell(CellPos::new(5, 5)));
        crate::simulation::tick::advance(&mut ctx);
        assert!(ctx.enclosed_area_by_position(Vec2::new(5.5, 5.5)).is_none());
        assert!(ctx.atmospheric_composition(Vec2::new(5.5, 5.5)).is_none());
    }

    #[test]
    fn test_off_grid_queries_are_none() {
        let ctx = context();
        assert!(ctx.atmospheric_composition(Vec2::new(-4.0, 2.0)).is_none());
        assert!(ctx.enclosed_area_by_position(Vec2::new(50.0, 2.0)).is_none());
    }

    #[test]
    fn test_unregister_life_is_idempotent() {
        let mut ctx = context();
        let id = ctx.spawn_population(SpeciesId(0), Vec2::new(2.0, 2.0), 1).unwrap();
        ctx.unregister_life(LifeId::Population(id));
        ctx.unregister_life(LifeId::Population(id));
        assert!(!ctx
            .need_systems
            .is_registered(NeedSystemKind::Density, LifeId::Population(id)));
    }
}
