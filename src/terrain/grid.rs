//! Authoritative tile grid
//!
//! Owns the per-cell tile classification. Edits return the affected cell
//! rectangle so callers can drive the incremental enclosure recompute.

use crate::core::types::{CellPos, CellRect, Vec2};
use crate::terrain::tile::TileKind;

/// 2D tile grid with a fixed footprint
///
/// Cells outside the footprint are "off-grid": unreachable but not walls.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    pub origin: Vec2,
    tiles: Vec<TileKind>,
}

impl TerrainGrid {
    /// Create a grid of all-open tiles
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cell_size: 1.0,
            origin: Vec2::default(),
            tiles: vec![TileKind::Open; width * height],
        }
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Tile at a cell, None off-grid
    #[inline]
    pub fn tile_at(&self, pos: CellPos) -> Option<TileKind> {
        if self.in_bounds(pos) {
            Some(self.tiles[pos.y as usize * self.width + pos.x as usize])
        } else {
            None
        }
    }

    /// Replace the tile at a cell
    ///
    /// Returns the dirty rectangle (the single edited cell) for the enclosure
    /// recompute, or None when the edit is off-grid or a no-op.
    pub fn set_tile(&mut self, pos: CellPos, kind: TileKind) -> Option<CellRect> {
        if !self.in_bounds(pos) {
            return None;
        }
        let slot = &mut self.tiles[pos.y as usize * self.width + pos.x as usize];
        if *slot == kind {
            return None;
        }
        *slot = kind;
        Some(CellRect::from_cell(pos))
    }

    /// Fill an inclusive rectangle with one tile kind, returning the dirty rect
    pub fn fill_rect(&mut self, rect: CellRect, kind: TileKind) -> Option<CellRect> {
        let mut dirty: Option<CellRect> = None;
        for y in rect.min.y..=rect.max.y {
            for x in rect.min.x..=rect.max.x {
                if let Some(cell) = self.set_tile(CellPos::new(x, y), kind) {
                    dirty = Some(match dirty {
                        Some(d) => d.union(&cell),
                        None => cell,
                    });
                }
            }
        }
        dirty
    }

    /// Convert world position to cell coordinates
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> CellPos {
        CellPos::new(
            ((pos.x - self.origin.x) / self.cell_size).floor() as i32,
            ((pos.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// Per-kind census of tiles within a square radius of a center cell
    ///
    /// Off-grid cells are not counted toward any kind. Food sources compare
    /// successive censuses to detect accessibility change.
    pub fn count_in_radius(&self, center: CellPos, radius: i32) -> [u32; TileKind::COUNT] {
        let mut counts = [0u32; TileKind::COUNT];
        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                if let Some(kind) = self.tile_at(CellPos::new(x, y)) {
                    counts[kind.index()] += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_open() {
        let grid = TerrainGrid::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.tile_at(CellPos::new(x, y)), Some(TileKind::Open));
            }
        }
    }

    #[test]
    fn test_off_grid_is_none() {
        let grid = TerrainGrid::new(4, 3);
        assert_eq!(grid.tile_at(CellPos::new(-1, 0)), None);
        assert_eq!(grid.tile_at(CellPos::new(4, 0)), None);
        assert_eq!(grid.tile_at(CellPos::new(0, 3)), None);
    }

    #[test]
    fn test_set_tile_returns_dirty_rect() {
        let mut grid = TerrainGrid::new(4, 3);
        let dirty = grid.set_tile(CellPos::new(2, 1), TileKind::Wall);
        assert_eq!(dirty, Some(CellRect::from_cell(CellPos::new(2, 1))));
        assert_eq!(grid.tile_at(CellPos::new(2, 1)), Some(TileKind::Wall));
    }

    #[test]
    fn test_redundant_edit_is_not_dirty() {
        let mut grid = TerrainGrid::new(4, 3);
        assert!(grid.set_tile(CellPos::new(1, 1), TileKind::Open).is_none());
        assert!(grid.set_tile(CellPos::new(-5, 0), TileKind::Wall).is_none());
    }

    #[test]
    fn test_fill_rect_unions_dirty_cells() {
        let mut grid = TerrainGrid::new(8, 8);
        let rect = CellRect::new(CellPos::new(1, 1), CellPos::new(3, 2));
        let dirty = grid.fill_rect(rect, TileKind::Wall).unwrap();
        assert_eq!(dirty, rect);
        assert_eq!(grid.tile_at(CellPos::new(2, 2)), Some(TileKind::Wall));
    }

    #[test]
    fn test_count_in_radius_clips_at_edges() {
        let mut grid = TerrainGrid::new(5, 5);
        grid.set_tile(CellPos::new(0, 1), TileKind::Liquid);
        let counts = grid.count_in_radius(CellPos::new(0, 0), 1);
        // 2x3 window survives clipping: one liquid, three open
        assert_eq!(counts[TileKind::Liquid.index()], 1);
        assert_eq!(counts[TileKind::Open.index()], 3);
    }

    #[test]
    fn test_world_to_cell_floors() {
        let grid = TerrainGrid::new(5, 5);
        assert_eq!(grid.world_to_cell(Vec2::new(2.9, 0.1)), CellPos::new(2, 0));
        assert_eq!(grid.world_to_cell(Vec2::new(-0.5, 1.0)), CellPos::new(-1, 1));
    }
}
