//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

/// Configuration for the simulation systems
///
/// These values have been tuned to produce good habitat pacing. Changing them
/// will affect how quickly populations respond to their surroundings.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === ENCLOSURE SYSTEM ===
    /// Maximum number of live atmosphere regions before an incremental
    /// recompute gives up and falls back to a full one.
    ///
    /// Region ids are bytes with 255 reserved for walls, so the hard ceiling
    /// is 254. The cap sits well below that: a board with 120+ sealed rooms
    /// is degenerate, and the full recompute renumbers from scratch.
    pub region_cap: usize,

    /// Upper bound of generated region temperatures (degrees)
    ///
    /// First-run regions get uniform random gas fractions in [0, 1] and a
    /// temperature in [0, temperature_max].
    pub temperature_max: f32,

    // === GROWTH SYSTEM ===
    /// Numerator of the severity-to-death-budget conversion
    ///
    /// A need in Bad condition kills one member after
    /// ceil(death_budget_base / severity) consecutive Bad cycles.
    /// At the default 10.0, a severity-10 need kills in a single cycle and a
    /// severity-1 need allows ten cycles of grace.
    pub death_budget_base: f32,

    // === NEED SYSTEM ===
    /// Divisor normalizing enclosure crowding into a density need value
    ///
    /// Density = sum of co-resident population dominance / region cell count,
    /// scaled by this. Larger values make the same crowd read as less dense.
    pub density_scale: f32,

    /// Terrain census radius for populations (cells)
    ///
    /// Food sources use their species root radius instead; populations share
    /// this single forage radius.
    pub forage_radius: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            region_cap: 120,
            temperature_max: 100.0,
            death_budget_base: 10.0,
            density_scale: 1.0,
            forage_radius: 3,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        // 255 is the wall sentinel; region ids must stay below it
        if self.region_cap == 0 || self.region_cap > 254 {
            return Err(format!(
                "region_cap ({}) must be in 1..=254 (255 is the wall sentinel)",
                self.region_cap
            ));
        }

        if self.death_budget_base <= 0.0 {
            return Err("death_budget_base must be positive".into());
        }

        if self.density_scale <= 0.0 {
            return Err("density_scale must be positive".into());
        }

        if self.forage_radius < 0 {
            return Err("forage_radius must be non-negative".into());
        }

        Ok(())
    }
}
