//! Living entities: populations and food sources
//!
//! The two kinds share one capability set through `Life` and the `LifeId`
//! tagged id, so need systems recompute both without caring which is which.

pub mod food_source;
pub mod population;

pub use food_source::FoodSource;
pub use population::{Member, Population};

use ahash::AHashMap;

use crate::core::types::{LifeId, Vec2};
use crate::needs::{Need, NeedKind};

/// Shared capability set of populations and food sources
pub trait Life {
    fn life_id(&self) -> LifeId;
    fn position(&self) -> Vec2;
    fn need_values(&self) -> &AHashMap<NeedKind, Need>;
    /// Set a need's value and re-derive its condition. Querying a need the
    /// species never declared is a programming fault: loud in debug builds,
    /// a logged no-op in release.
    fn update_need(&mut self, kind: NeedKind, value: f32);
    /// True when a terrain edit changed what this entity can reach
    fn accessibility_status(&self) -> bool;
}
