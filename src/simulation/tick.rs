//! Tick system - orchestrates one simulation step
//!
//! Fixed order per tick: queued terrain edits drive the enclosure recompute,
//! then each dirty need category recomputes its registered entities, then the
//! growth engine converts conditions into population changes, then behavior
//! selection reacts to the condition changes. Clean categories cost nothing.

use ahash::AHashMap;

use crate::core::types::{LifeId, RegionId, WALL_REGION};
use crate::entity::Life;
use crate::growth::PopulationChange;
use crate::needs::{NeedKind, NeedSystemKind};
use crate::simulation::context::SimulationContext;
use crate::simulation::events::SimulationEvent;

/// Advance the simulation one tick
///
/// Returns the events produced, after publishing each to the context's bus.
pub fn advance(ctx: &mut SimulationContext) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    let terrain_changed = apply_terrain_edits(ctx, &mut events);

    // dirty need systems, in dependency order: food outputs read atmosphere
    // and terrain conditions computed this same tick
    update_atmosphere_needs(ctx);
    update_terrain_needs(ctx, terrain_changed);
    update_density_needs(ctx);
    update_food_needs(ctx, &mut events);
    update_symbiosis_needs(ctx);

    run_growth(ctx, &mut events);
    apply_behaviors(ctx);

    ctx.current_tick += 1;

    for event in &events {
        ctx.events.publish(event);
    }
    events
}

/// Drain queued terrain edits into one incremental enclosure recompute
///
/// Edits queued within a tick coalesce into their union bounding box, the
/// same shape a tile-placement operation reports: the recompute must see the
/// whole edited rectangle at once or a freshly sealed interior would be
/// mistaken for untouched open air.
fn apply_terrain_edits(ctx: &mut SimulationContext, events: &mut Vec<SimulationEvent>) -> bool {
    let edits = std::mem::take(&mut ctx.pending_edits);
    let Some(first) = edits.first().copied() else {
        return false;
    };
    let rect = edits.iter().skip(1).fold(first, |acc, r| acc.union(r));

    let outcome = ctx.enclosures.incremental_recompute(
        rect,
        &ctx.terrain,
        &mut ctx.rng,
        ctx.config.temperature_max,
    );
    for region in outcome.new_regions {
        events.push(SimulationEvent::NewEnclosedArea { region });
    }

    // a terrain edit invalidates every spatial derivation
    ctx.need_systems.mark_all_dirty();
    for population in &mut ctx.populations {
        population.accessibility_changed = true;
    }
    true
}

/// Declared need kinds of one entity that a given category owns
fn kinds_for(ctx: &SimulationContext, id: LifeId, system: NeedSystemKind) -> Vec<NeedKind> {
    ctx.life(id)
        .need_values()
        .keys()
        .filter(|kind| kind.system() == system)
        .copied()
        .collect()
}

fn update_atmosphere_needs(ctx: &mut SimulationContext) {
    if !ctx.need_systems.begin_update(NeedSystemKind::Atmosphere) {
        return;
    }
    let ids: Vec<LifeId> = ctx.need_systems.registered(NeedSystemKind::Atmosphere).collect();

    for id in ids {
        let position = ctx.life(id).position();
        let cell = ctx.terrain.world_to_cell(position);
        let Some(composition) = ctx.enclosures.composition_at(cell).copied() else {
            tracing::debug!(?id, ?cell, "no atmosphere under entity; values kept");
            continue;
        };
        for kind in kinds_for(ctx, id, NeedSystemKind::Atmosphere) {
            if let NeedKind::Atmosphere(component) = kind {
                ctx.life_mut(id).update_need(kind, composition.component(component));
            }
        }
    }
}

fn update_terrain_needs(ctx: &mut SimulationContext, terrain_changed: bool) {
    if !ctx.need_systems.begin_update(NeedSystemKind::Terrain) {
        return;
    }
    let ids: Vec<LifeId> = ctx.need_systems.registered(NeedSystemKind::Terrain).collect();

    for id in ids {
        // food sources keep a census of their root reach; refresh it first
        if let LifeId::Food(fid) = id {
            let terrain = &ctx.terrain;
            let food = &mut ctx.food_sources[fid.0 as usize];
            food.check_accessibility(terrain, terrain_changed);
            food.update_accessible_terrain(terrain);
        }

        let position = ctx.life(id).position();
        let cell = ctx.terrain.world_to_cell(position);
        let radius = match id {
            LifeId::Population(_) => ctx.config.forage_radius,
            LifeId::Food(fid) => ctx.species.get(ctx.food_sources[fid.0 as usize].species).root_radius,
        };
        let census = ctx.terrain.count_in_radius(cell, radius);

        for kind in kinds_for(ctx, id, NeedSystemKind::Terrain) {
            if let NeedKind::Terrain(tile) = kind {
                ctx.life_mut(id).update_need(kind, census[tile.index()] as f32);
            }
        }
    }

    // census consumed; populations stop reporting stale accessibility
    for population in &mut ctx.populations {
        population.accessibility_changed = false;
    }
}

fn update_density_needs(ctx: &mut SimulationContext) {
    if !ctx.need_systems.begin_update(NeedSystemKind::Density) {
        return;
    }
    let ids: Vec<LifeId> = ctx.need_systems.registered(NeedSystemKind::Density).collect();

    // total dominance per region
    let mut dominance_of: AHashMap<RegionId, f32> = AHashMap::new();
    for population in &ctx.populations {
        let cell = ctx.terrain.world_to_cell(population.position);
        let Some(region) = ctx.enclosures.region_at(cell) else { continue };
        if region == WALL_REGION {
            continue;
        }
        let species = ctx.species.get(population.species);
        *dominance_of.entry(region).or_default() += population.dominance(species);
    }

    let mut cells_of: AHashMap<RegionId, usize> = AHashMap::new();

    for id in ids {
        let LifeId::Population(pid) = id else { continue };
        let cell = ctx.terrain.world_to_cell(ctx.population(pid).position);
        let Some(region) = ctx.enclosures.region_at(cell) else { continue };
        if region == WALL_REGION {
            continue;
        }
        let cells = *cells_of
            .entry(region)
            .or_insert_with(|| ctx.enclosures.region_cells(region))
            as f32;
        let dominance = dominance_of.get(&region).copied().unwrap_or(0.0);
        let density = if cells > 0.0 {
            dominance / cells / ctx.config.density_scale
        } else {
            0.0
        };
        ctx.population_mut(pid).set_need_value(NeedKind::Density, density);
    }
}

fn update_food_needs(ctx: &mut SimulationContext, events: &mut Vec<SimulationEvent>) {
    if !ctx.need_systems.begin_update(NeedSystemKind::Food) {
        return;
    }

    // settle every food source's output for this cycle first
    let mut outputs: Vec<(RegionId, crate::core::types::SpeciesId, f32)> = Vec::new();
    for index in 0..ctx.food_sources.len() {
        let species = ctx.species.get(ctx.food_sources[index].species);
        let output = ctx.food_sources[index].output(species);
        let food = &mut ctx.food_sources[index];
        if food.note_output(output) {
            events.push(SimulationEvent::FoodOutputChanged { food_source: food.id, output });
        }
        let cell = ctx.terrain.world_to_cell(ctx.food_sources[index].position);
        if let Some(region) = ctx.enclosures.region_at(cell) {
            if region != WALL_REGION {
                outputs.push((region, ctx.food_sources[index].species, output));
            }
        }
    }

    let ids: Vec<LifeId> = ctx.need_systems.registered(NeedSystemKind::Food).collect();
    for id in ids {
        let LifeId::Population(pid) = id else { continue };
        let cell = ctx.terrain.world_to_cell(ctx.population(pid).position);
        let Some(region) = ctx.enclosures.region_at(cell) else { continue };

        for kind in kinds_for(ctx, id, NeedSystemKind::Food) {
            if let NeedKind::Food(species) = kind {
                let supply: f32 = outputs
                    .iter()
                    .filter(|(r, s, _)| *r == region && *s == species)
                    .map(|(_, _, output)| output)
                    .sum();
                ctx.population_mut(pid).set_need_value(kind, supply);
            }
        }
    }
}

fn update_symbiosis_needs(ctx: &mut SimulationContext) {
    if !ctx.need_systems.begin_update(NeedSystemKind::Symbiosis) {
        return;
    }
    let ids: Vec<LifeId> = ctx.need_systems.registered(NeedSystemKind::Symbiosis).collect();

    // head count per (region, species)
    let mut heads: AHashMap<(RegionId, crate::core::types::SpeciesId), f32> = AHashMap::new();
    for population in &ctx.populations {
        let cell = ctx.terrain.world_to_cell(population.position);
        let Some(region) = ctx.enclosures.region_at(cell) else { continue };
        if region == WALL_REGION {
            continue;
        }
        *heads.entry((region, population.species)).or_default() += population.count() as f32;
    }

    for id in ids {
        let LifeId::Population(pid) = id else { continue };
        let cell = ctx.terrain.world_to_cell(ctx.population(pid).position);
        let Some(region) = ctx.enclosures.region_at(cell) else { continue };

        for kind in kinds_for(ctx, id, NeedSystemKind::Symbiosis) {
            if let NeedKind::Symbiosis(species) = kind {
                let count = heads.get(&(region, species)).copied().unwrap_or(0.0);
                ctx.population_mut(pid).set_need_value(kind, count);
            }
        }
    }
}

/// Growth engine: convert current conditions into at most one member gained
/// or lost per population
fn run_growth(ctx: &mut SimulationContext, events: &mut Vec<SimulationEvent>) {
    let mut size_changed = false;
    let strategy = ctx.growth_strategy.as_ref();
    let tick = ctx.current_tick;

    for population in &mut ctx.populations {
        // extinction is terminal; the object lingers until removed externally
        if population.is_extinct() {
            continue;
        }

        population.calculate_growth(strategy);
        match population.handle_growth() {
            PopulationChange::Gain => {
                population.add_member(tick);
                size_changed = true;
                events.push(SimulationEvent::PopulationCountIncreased {
                    population: population.id,
                    count: population.count(),
                });
            }
            PopulationChange::Loss => {
                let remaining = population.remove_member();
                size_changed = true;
                if remaining == 0 {
                    tracing::info!(?population.id, "population extinct");
                    events.push(SimulationEvent::PopulationExtinct { population: population.id });
                } else {
                    events.push(SimulationEvent::PopulationCountDecreased {
                        population: population.id,
                        count: remaining,
                    });
                }
            }
            PopulationChange::None => {}
        }
    }

    if size_changed {
        // crowding and symbiosis derive from head counts
        ctx.need_systems.mark_dirty(NeedSystemKind::Density);
        ctx.need_systems.mark_dirty(NeedSystemKind::Symbiosis);
    }
}

/// Run queued condition changes through each population's behavior selector
fn apply_behaviors(ctx: &mut SimulationContext) {
    let species = &ctx.species;
    for population in &mut ctx.populations {
        population.apply_behaviors(species.get(population.species));
    }
}
