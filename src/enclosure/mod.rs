//! Enclosed-region partitioning and per-region atmospheres

pub mod atmosphere;
pub mod graph;

pub use atmosphere::{AtmosphereComponent, AtmosphericComposition};
pub use graph::{EnclosureGraph, RecomputeOutcome};
