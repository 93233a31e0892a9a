//! Need values, conditions, and the dirty-tracked category systems

pub mod need;
pub mod systems;

pub use need::{Need, NeedCondition, NeedKind, NeedSystemKind, NeedThresholds};
pub use systems::NeedSystems;
