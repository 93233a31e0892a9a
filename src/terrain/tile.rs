//! Tile classification for the habitat grid

use serde::{Deserialize, Serialize};

/// Kind of terrain occupying a grid cell
///
/// Walls bound atmosphere regions; everything else is open to gas exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Open,
    Wall,
    Liquid,
    Rock,
}

impl TileKind {
    /// Number of tile kinds, for per-kind census arrays
    pub const COUNT: usize = 4;

    /// Walls block flood-fill propagation and movement
    pub fn is_wall(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn index(&self) -> usize {
        match self {
            TileKind::Open => 0,
            TileKind::Wall => 1,
            TileKind::Liquid => 2,
            TileKind::Rock => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileKind::Open => "open",
            TileKind::Wall => "wall",
            TileKind::Liquid => "liquid",
            TileKind::Rock => "rock",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "open" => Some(TileKind::Open),
            "wall" => Some(TileKind::Wall),
            "liquid" => Some(TileKind::Liquid),
            "rock" => Some(TileKind::Rock),
            _ => None,
        }
    }
}
