//! Behavior selection from need conditions

pub mod selector;

pub use selector::BehaviorSelector;
