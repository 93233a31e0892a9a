//! Enclosure partitioning over the tile grid
//!
//! Flood-fills the grid into connected open regions bounded by walls and
//! tracks one atmospheric composition per region. The open-air region
//! reachable from the grid origin is always id 0; walls map to the 255
//! sentinel. Region ids are renumbered by every recompute, so consumers must
//! re-resolve by position across recompute boundaries and never cache ids.

use ahash::{AHashMap, AHashSet};
use rand::Rng;

use crate::core::types::{CellPos, CellRect, RegionId, GLOBAL_REGION, WALL_REGION};
use crate::enclosure::atmosphere::AtmosphericComposition;
use crate::terrain::TerrainGrid;

/// Result of a recompute pass
#[derive(Debug, Clone, Default)]
pub struct RecomputeOutcome {
    /// Region ids that owe their existence to this pass: every sealed pocket
    /// on the first fill, pockets that absorbed no prior atmosphere on later
    /// full fills, and every id allocated by an incremental pass.
    pub new_regions: Vec<RegionId>,
    /// True when the pass ran (or fell back to) the full flood fill
    pub full: bool,
}

/// Partition of the grid into atmosphere regions
pub struct EnclosureGraph {
    region_of: AHashMap<CellPos, RegionId>,
    atmospheres: Vec<AtmosphericComposition>,
    global: AtmosphericComposition,
    region_cap: usize,
    initialized: bool,
}

impl EnclosureGraph {
    pub fn new(region_cap: usize) -> Self {
        Self {
            region_of: AHashMap::new(),
            atmospheres: Vec::new(),
            global: AtmosphericComposition::default(),
            region_cap,
            initialized: false,
        }
    }

    /// Replace the open-air composition used for region 0
    pub fn set_global_atmosphere(&mut self, composition: AtmosphericComposition) {
        self.global = composition;
        if let Some(slot) = self.atmospheres.first_mut() {
            *slot = composition;
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of live regions, the global one included
    pub fn region_count(&self) -> usize {
        self.atmospheres.len()
    }

    /// All live compositions, indexed by region id
    pub fn atmospheres(&self) -> &[AtmosphericComposition] {
        &self.atmospheres
    }

    /// Region id at a cell. Walls report the 255 sentinel; off-grid is None.
    pub fn region_at(&self, pos: CellPos) -> Option<RegionId> {
        self.region_of.get(&pos).copied()
    }

    /// Composition at a cell, None for walls and off-grid probes
    ///
    /// UI picking sends arbitrary coordinates here, so the miss case is an
    /// ordinary answer rather than an error.
    pub fn composition_at(&self, pos: CellPos) -> Option<&AtmosphericComposition> {
        let region = self.region_at(pos)?;
        if region == WALL_REGION {
            return None;
        }
        self.atmospheres.get(region as usize)
    }

    /// Number of cells labeled with a region id
    pub fn region_cells(&self, region: RegionId) -> usize {
        self.region_of.values().filter(|&&r| r == region).count()
    }

    /// Flood-fill the whole grid from scratch
    ///
    /// Phase 1 claims the open-air region (id 0) from the grid origin and
    /// collects every wall met along the way. Phase 2 drains the wall
    /// worklist, flooding each unvisited open neighbor into a fresh region.
    /// On the first run new regions receive generated compositions; on later
    /// runs a region absorbing several prior regions gets their successive
    /// pairwise average in first-encountered order, except that absorbing the
    /// global region yields the global composition outright.
    pub fn full_recompute<R: Rng>(
        &mut self,
        terrain: &TerrainGrid,
        rng: &mut R,
        temperature_max: f32,
    ) -> RecomputeOutcome {
        let mut new_atmospheres = vec![self.global];
        let mut region_of_new: AHashMap<CellPos, RegionId> = AHashMap::new();

        let mut stack: Vec<CellPos> = Vec::new();
        let mut accessed: AHashSet<CellPos> = AHashSet::new();
        let mut unaccessible: AHashSet<CellPos> = AHashSet::new();
        let mut walls: Vec<CellPos> = Vec::new();

        // Open-air scan starts at the grid origin; a wall there just seeds
        // the phase-2 worklist instead.
        stack.push(CellPos::new(0, 0));

        while let Some(cur) = stack.pop() {
            if accessed.contains(&cur) || unaccessible.contains(&cur) {
                continue;
            }
            match terrain.tile_at(cur) {
                Some(tile) if !tile.is_wall() => {
                    accessed.insert(cur);
                    region_of_new.insert(cur, GLOBAL_REGION);
                    stack.extend(cur.neighbors4());
                }
                Some(_) => {
                    walls.push(cur);
                    unaccessible.insert(cur);
                    region_of_new.insert(cur, WALL_REGION);
                }
                None => {
                    unaccessible.insert(cur);
                }
            }
        }

        let mut next_region: RegionId = 1;
        let mut new_regions: Vec<RegionId> = Vec::new();

        while let Some(wall) = walls.pop() {
            stack.extend(wall.neighbors4());

            let mut claimed = false;
            let mut contained: Vec<RegionId> = Vec::new();

            while let Some(cur) = stack.pop() {
                if accessed.contains(&cur) || unaccessible.contains(&cur) {
                    continue;
                }
                match terrain.tile_at(cur) {
                    Some(tile) if !tile.is_wall() => {
                        accessed.insert(cur);
                        if let Some(&prev) = self.region_of.get(&cur) {
                            if prev != WALL_REGION && !contained.contains(&prev) {
                                contained.push(prev);
                            }
                        }
                        claimed = true;
                        region_of_new.insert(cur, next_region);
                        stack.extend(cur.neighbors4());
                    }
                    Some(_) => {
                        // walls inside walls
                        walls.push(cur);
                        unaccessible.insert(cur);
                        region_of_new.insert(cur, WALL_REGION);
                    }
                    None => {
                        unaccessible.insert(cur);
                    }
                }
            }

            if claimed {
                let composition = if self.initialized {
                    if contained.is_empty() {
                        // a pocket out of nowhere: empty atmosphere
                        new_regions.push(next_region);
                        AtmosphericComposition::default()
                    } else {
                        self.merged_composition(&contained)
                    }
                } else {
                    new_regions.push(next_region);
                    AtmosphericComposition::generate(rng, temperature_max)
                };
                new_atmospheres.push(composition);
                if next_region < WALL_REGION - 1 {
                    next_region += 1;
                } else {
                    tracing::warn!(
                        "region id space exhausted; further pockets share id {next_region}"
                    );
                }
            }
        }

        self.region_of = region_of_new;
        self.atmospheres = new_atmospheres;
        self.initialized = true;
        tracing::debug!(
            regions = self.atmospheres.len(),
            new = new_regions.len(),
            "full enclosure recompute"
        );

        RecomputeOutcome { new_regions, full: true }
    }

    /// Re-flood only an edited rectangle plus its adjacent boundary ring
    ///
    /// Reuses the existing region map: cells outside the ring that already
    /// belong to the open-air region are not re-expanded, which keeps a small
    /// wall edit from scanning the whole grid. Superseded atmosphere entries
    /// are not reclaimed here; the table grows until the cap forces the next
    /// full recompute. Falls back to the full recompute when uninitialized or
    /// at the cap.
    pub fn incremental_recompute<R: Rng>(
        &mut self,
        rect: CellRect,
        terrain: &TerrainGrid,
        rng: &mut R,
        temperature_max: f32,
    ) -> RecomputeOutcome {
        if !self.initialized || self.atmospheres.len() >= self.region_cap {
            return self.full_recompute(terrain, rng, temperature_max);
        }

        let area = rect.expanded(1);
        let mut stack: Vec<CellPos> = Vec::new();
        let mut accessed: AHashSet<CellPos> = AHashSet::new();
        let mut unaccessible: AHashSet<CellPos> = AHashSet::new();
        let mut walls: Vec<CellPos> = Vec::new();
        let mut new_regions: Vec<RegionId> = Vec::new();

        // Seed from the edited corner itself (always on-grid, unlike the ring)
        match terrain.tile_at(rect.min) {
            Some(tile) if tile.is_wall() => walls.push(rect.min),
            Some(_) => stack.push(rect.min),
            None => {}
        }

        // Phase 1: flood whatever the seed connects to
        let mut next_region = self.atmospheres.len() as RegionId;
        if let Some(contained) = self.flood_one_region(
            terrain,
            area,
            next_region,
            &mut stack,
            &mut accessed,
            &mut unaccessible,
            &mut walls,
        ) {
            let composition = self.merged_composition(&contained);
            self.atmospheres.push(composition);
            new_regions.push(next_region);
            next_region += 1;
        }

        // Phase 2: every wall met so far seeds floods of its open neighbors
        while let Some(wall) = walls.pop() {
            if next_region == WALL_REGION {
                tracing::warn!("region id space exhausted mid-pass; next full recompute renumbers");
                break;
            }
            stack.extend(wall.neighbors4());
            if let Some(contained) = self.flood_one_region(
                terrain,
                area,
                next_region,
                &mut stack,
                &mut accessed,
                &mut unaccessible,
                &mut walls,
            ) {
                let composition = self.merged_composition(&contained);
                self.atmospheres.push(composition);
                new_regions.push(next_region);
                next_region += 1;
            }
        }

        tracing::debug!(
            regions = self.atmospheres.len(),
            new = new_regions.len(),
            "incremental enclosure recompute"
        );

        RecomputeOutcome { new_regions, full: false }
    }

    /// Drain the worklist into one region labeled `region`
    ///
    /// Returns the prior region ids of claimed cells in first-encountered
    /// order, or None when no cell was claimed.
    #[allow(clippy::too_many_arguments)]
    fn flood_one_region(
        &mut self,
        terrain: &TerrainGrid,
        area: CellRect,
        region: RegionId,
        stack: &mut Vec<CellPos>,
        accessed: &mut AHashSet<CellPos>,
        unaccessible: &mut AHashSet<CellPos>,
        walls: &mut Vec<CellPos>,
    ) -> Option<Vec<RegionId>> {
        let mut claimed = false;
        let mut contained: Vec<RegionId> = Vec::new();

        while let Some(cur) = stack.pop() {
            if accessed.contains(&cur) || unaccessible.contains(&cur) {
                continue;
            }
            match terrain.tile_at(cur) {
                Some(tile) if !tile.is_wall() => {
                    accessed.insert(cur);
                    let prev = self.region_of.get(&cur).copied();
                    // Don't re-expand the open-air region beyond the edit
                    if !area.contains(cur) && prev == Some(GLOBAL_REGION) {
                        continue;
                    }
                    if let Some(p) = prev {
                        if p != WALL_REGION && !contained.contains(&p) {
                            contained.push(p);
                        }
                    }
                    claimed = true;
                    self.region_of.insert(cur, region);
                    stack.extend(cur.neighbors4());
                }
                Some(_) => {
                    self.region_of.insert(cur, WALL_REGION);
                    unaccessible.insert(cur);
                    if area.contains(cur) {
                        walls.push(cur);
                    }
                }
                None => {
                    unaccessible.insert(cur);
                }
            }
        }

        claimed.then_some(contained)
    }

    /// Composition for a region that absorbed the given prior regions
    ///
    /// First-encountered order matters: the fold is a successive pairwise
    /// average. Absorbing the global region overrides everything; absorbing
    /// nothing yields the empty default.
    fn merged_composition(&self, contained: &[RegionId]) -> AtmosphericComposition {
        if contained.contains(&GLOBAL_REGION) {
            self.atmospheres[GLOBAL_REGION as usize]
        } else if let Some((&first, rest)) = contained.split_first() {
            rest.iter().fold(self.atmospheres[first as usize], |acc, &r| {
                acc.mix(&self.atmospheres[r as usize])
            })
        } else {
            AtmosphericComposition::default()
        }
    }
}
