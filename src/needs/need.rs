//! Need values, threshold bands, and conditions

use serde::{Deserialize, Serialize};

use crate::core::types::SpeciesId;
use crate::enclosure::AtmosphereComponent;
use crate::terrain::TileKind;

/// Condition of a need, ordered worst-first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedCondition {
    Bad,
    Neutral,
    Good,
}

impl NeedCondition {
    pub fn name(&self) -> &'static str {
        match self {
            NeedCondition::Bad => "bad",
            NeedCondition::Neutral => "neutral",
            NeedCondition::Good => "good",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bad" => Some(NeedCondition::Bad),
            "neutral" => Some(NeedCondition::Neutral),
            "good" => Some(NeedCondition::Good),
            _ => None,
        }
    }
}

/// What a need measures, and which category system recomputes it
///
/// Needs are enumerated rather than string-keyed; species files name them by
/// their snake_case form and cross-species references are resolved to ids at
/// load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    /// One scalar of the surrounding region's atmosphere
    Atmosphere(AtmosphereComponent),
    /// Crowding of the surrounding region
    Density,
    /// Edible output of a food species in the surrounding region
    Food(SpeciesId),
    /// Count of one tile kind within the forage/root radius
    Terrain(TileKind),
    /// Head count of another animal species sharing the region
    Symbiosis(SpeciesId),
}

/// Category system responsible for recomputing a need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeedSystemKind {
    Atmosphere,
    Density,
    Food,
    Terrain,
    Symbiosis,
}

impl NeedSystemKind {
    pub const ALL: [NeedSystemKind; 5] = [
        NeedSystemKind::Atmosphere,
        NeedSystemKind::Density,
        NeedSystemKind::Food,
        NeedSystemKind::Terrain,
        NeedSystemKind::Symbiosis,
    ];

    pub fn index(&self) -> usize {
        match self {
            NeedSystemKind::Atmosphere => 0,
            NeedSystemKind::Density => 1,
            NeedSystemKind::Food => 2,
            NeedSystemKind::Terrain => 3,
            NeedSystemKind::Symbiosis => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NeedSystemKind::Atmosphere => "atmosphere",
            NeedSystemKind::Density => "density",
            NeedSystemKind::Food => "food",
            NeedSystemKind::Terrain => "terrain",
            NeedSystemKind::Symbiosis => "symbiosis",
        }
    }
}

impl NeedKind {
    /// The category system that owns recomputation of this need
    pub fn system(&self) -> NeedSystemKind {
        match self {
            NeedKind::Atmosphere(_) => NeedSystemKind::Atmosphere,
            NeedKind::Density => NeedSystemKind::Density,
            NeedKind::Food(_) => NeedSystemKind::Food,
            NeedKind::Terrain(_) => NeedSystemKind::Terrain,
            NeedKind::Symbiosis(_) => NeedSystemKind::Symbiosis,
        }
    }
}

/// Ordered threshold bands mapping a value to a condition
///
/// Bands are (upper bound, condition) pairs sorted ascending; a value maps to
/// the first band whose bound it does not exceed, and to `above` past the
/// last bound. Equal bounds sort worse-condition-first, so ties resolve to
/// the stricter condition. Good may sit between two Bad bands (temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedThresholds {
    bands: Vec<(f32, NeedCondition)>,
    above: NeedCondition,
}

impl NeedThresholds {
    pub fn new(mut bands: Vec<(f32, NeedCondition)>, above: NeedCondition) -> Self {
        bands.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        Self { bands, above }
    }

    /// Convenience for the common bad-below / good-above shape
    pub fn two_band(bad_max: f32, neutral_max: f32) -> Self {
        Self::new(
            vec![(bad_max, NeedCondition::Bad), (neutral_max, NeedCondition::Neutral)],
            NeedCondition::Good,
        )
    }

    pub fn condition(&self, value: f32) -> NeedCondition {
        for &(bound, condition) in &self.bands {
            if value <= bound {
                return condition;
            }
        }
        self.above
    }
}

/// A single need of a living entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub kind: NeedKind,
    value: f32,
    condition: NeedCondition,
    thresholds: NeedThresholds,
    /// Harm rate: how fast a Bad condition kills (larger = faster)
    pub severity: f32,
}

impl Need {
    pub fn new(kind: NeedKind, thresholds: NeedThresholds, severity: f32) -> Self {
        let condition = thresholds.condition(0.0);
        Self { kind, value: 0.0, condition, thresholds, severity }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn condition(&self) -> NeedCondition {
        self.condition
    }

    /// Set the value and re-derive the condition from the threshold bands
    pub fn update_value(&mut self, value: f32) -> NeedCondition {
        self.value = value;
        self.condition = self.thresholds.condition(value);
        self.condition
    }

    pub fn is_satisfied(&self) -> bool {
        self.condition == NeedCondition::Good
    }
}
