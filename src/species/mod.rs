//! Species data and the TOML loader

pub mod data;
pub mod loader;

pub use data::{BehaviorRule, NeedDefinition, SpeciesClass, SpeciesData, SpeciesTable};
pub use loader::load_species_table;
