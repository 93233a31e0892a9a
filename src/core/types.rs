//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter (one tick = one evaluation cycle)
pub type Tick = u64;

/// Unique identifier for animal populations
///
/// Ids are dense: a `PopulationId` doubles as an index into the context's
/// population list. Populations are never removed by the core (extinction is
/// terminal but removal is the caller's job), so indices stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulationId(pub u32);

/// Unique identifier for food sources (dense, index-stable like populations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodSourceId(pub u32);

/// Identifier for a species, assigned at species-table load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub u32);

/// Identifier for a behavior within its species' behavior table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorId(pub u32);

/// Tagged id unifying the two living-entity kinds
///
/// Need systems treat populations and food sources uniformly through this id
/// plus the `Life` capability trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeId {
    Population(PopulationId),
    Food(FoodSourceId),
}

/// Per-cell region label. 255 marks walls and unreachable cells.
pub type RegionId = u8;

/// Region id of wall / unreachable cells
pub const WALL_REGION: RegionId = 255;

/// Region id of the open-air global region
pub const GLOBAL_REGION: RegionId = 0;

/// Grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four edge-adjacent neighbors (flood fills are 4-connected)
    pub fn neighbors4(&self) -> [CellPos; 4] {
        [
            CellPos::new(self.x - 1, self.y),
            CellPos::new(self.x + 1, self.y),
            CellPos::new(self.x, self.y - 1),
            CellPos::new(self.x, self.y + 1),
        ]
    }
}

/// Inclusive rectangle of grid cells, used as the dirty region for terrain edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub min: CellPos,
    pub max: CellPos,
}

impl CellRect {
    pub fn new(min: CellPos, max: CellPos) -> Self {
        Self { min, max }
    }

    pub fn from_cell(cell: CellPos) -> Self {
        Self { min: cell, max: cell }
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x >= self.min.x && pos.y >= self.min.y && pos.x <= self.max.x && pos.y <= self.max.y
    }

    /// Grow the rectangle by `margin` cells on every side
    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            min: CellPos::new(self.min.x - margin, self.min.y - margin),
            max: CellPos::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Smallest rectangle covering both operands
    pub fn union(&self, other: &CellRect) -> Self {
        Self {
            min: CellPos::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: CellPos::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// 2D world position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}
