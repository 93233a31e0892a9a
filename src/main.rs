//! Biodome - Entry Point
//!
//! Sets up a small demo habitat, spawns starter populations and food
//! sources from the species files, and drops into a command loop for
//! poking at the simulation by hand.

use biodome::core::config::SimulationConfig;
use biodome::core::error::Result;
use biodome::core::types::{CellPos, Vec2};
use biodome::enclosure::AtmosphericComposition;
use biodome::simulation::{advance, SimulationContext};
use biodome::species::{load_species_table, SpeciesClass};
use biodome::terrain::{TerrainGrid, TileKind};

use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("biodome=debug")
        .init();

    tracing::info!("Biodome starting...");

    let species = load_species_table(Path::new("species"))?;
    let config = SimulationConfig::default();
    let terrain = TerrainGrid::new(24, 16);
    let mut ctx = SimulationContext::new(species, terrain, config, 0xB10D);

    // breathable open-air mix; sealed rooms roll their own
    ctx.enclosures
        .set_global_atmosphere(AtmosphericComposition::new(0.32, 0.21, 0.47, 22.0));

    spawn_starters(&mut ctx)?;

    println!("\n=== BIODOME ===");
    println!("A habitat ecosystem simulation with enclosed atmospheres");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance simulation by one tick");
    println!("  run <n>         - Run n simulation ticks");
    println!("  wall <x> <y>    - Place a wall tile");
    println!("  clear <x> <y>   - Clear a tile back to open ground");
    println!("  atmo <x> <y>    - Show the atmosphere at a cell");
    println!("  status / s      - Show detailed status");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&ctx);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["tick"] | ["t"] => {
                report_events(&advance(&mut ctx));
            }
            ["run", n] => {
                let count: u64 = n.parse().unwrap_or(1);
                for _ in 0..count {
                    report_events(&advance(&mut ctx));
                }
            }
            ["wall", x, y] => place(&mut ctx, x, y, TileKind::Wall),
            ["clear", x, y] => place(&mut ctx, x, y, TileKind::Open),
            ["atmo", x, y] => {
                let pos = Vec2::new(
                    x.parse().unwrap_or(0.0),
                    y.parse().unwrap_or(0.0),
                );
                match ctx.atmospheric_composition(pos) {
                    Some(comp) => println!("{comp}"),
                    None => println!("no atmosphere there (wall or off-grid)"),
                }
            }
            ["status"] | ["s"] => {} // falls through to display_status
            _ => println!("unknown command: {input}"),
        }
    }

    tracing::info!("Biodome shutting down");
    Ok(())
}

/// One population of each animal species and one source of each food species
fn spawn_starters(ctx: &mut SimulationContext) -> Result<()> {
    let starters: Vec<_> = ctx
        .species
        .iter()
        .map(|data| (data.id, data.class, data.initial_population))
        .collect();

    let mut slot = 0.0;
    for (id, class, size) in starters {
        let position = Vec2::new(3.0 + slot * 5.0, 4.0 + slot * 2.0);
        match class {
            SpeciesClass::Animal => {
                ctx.spawn_population(id, position, size)?;
            }
            SpeciesClass::Food => {
                ctx.spawn_food_source(id, position)?;
            }
        }
        slot += 1.0;
    }
    Ok(())
}

fn place(ctx: &mut SimulationContext, x: &str, y: &str, kind: TileKind) {
    let pos = CellPos::new(x.parse().unwrap_or(0), y.parse().unwrap_or(0));
    if ctx.place_tile(pos, kind) {
        println!("{} placed at ({}, {})", kind.name(), pos.x, pos.y);
    } else {
        println!("nothing to do at ({}, {})", pos.x, pos.y);
    }
}

fn report_events(events: &[biodome::simulation::SimulationEvent]) {
    for event in events {
        println!("  event: {event:?}");
    }
}

fn display_status(ctx: &SimulationContext) {
    println!(
        "--- tick {} | regions {} ---",
        ctx.current_tick,
        ctx.enclosures.region_count()
    );
    for population in &ctx.populations {
        let species = ctx.species.get(population.species);
        println!(
            "  {:<12} x{:<3} {:?} (next growth in {})",
            species.name,
            population.count(),
            population.growth_status(),
            population.days_till_growth()
        );
    }
    for food in &ctx.food_sources {
        let species = ctx.species.get(food.species);
        println!(
            "  {:<12} output {:.1}",
            species.name,
            food.output(species)
        );
    }
}
