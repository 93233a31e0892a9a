//! Simulation events
//!
//! Dispatch is synchronous and fire-and-forget: `publish` walks the current
//! subscriber list immediately and nothing is queued or retried. The tick
//! also returns the events it produced, for display consumers that prefer
//! polling over callbacks.

use crate::core::types::{FoodSourceId, PopulationId, RegionId};

/// Events produced during a simulation tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A population gained a member
    PopulationCountIncreased {
        population: PopulationId,
        count: usize,
    },
    /// A population lost a member (not fired for the final one)
    PopulationCountDecreased {
        population: PopulationId,
        count: usize,
    },
    /// A population lost its final member; terminal, external cleanup owns
    /// the object from here
    PopulationExtinct { population: PopulationId },
    /// An enclosure recompute created a region
    NewEnclosedArea { region: RegionId },
    /// A food source's output moved off its tracked value
    FoodOutputChanged {
        food_source: FoodSourceId,
        output: f32,
    },
}

type Subscriber = Box<dyn FnMut(&SimulationEvent)>;

/// Synchronous event dispatch to registered subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&SimulationEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: &SimulationEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}
