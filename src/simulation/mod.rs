//! Simulation context, events, and the tick loop

pub mod context;
pub mod events;
pub mod tick;

pub use context::{EnclosedArea, SimulationContext};
pub use events::{EventBus, SimulationEvent};
pub use tick::advance;
