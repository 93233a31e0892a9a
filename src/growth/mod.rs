//! Population growth state machine

pub mod calculator;

pub use calculator::{
    GrowthCalculator, GrowthStatus, GrowthStrategy, PopulationChange, SeverityWeighted,
};
