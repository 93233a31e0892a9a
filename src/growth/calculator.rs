//! Converts sustained need conditions into population size changes
//!
//! Each population owns one calculator. Per cycle the caller first runs
//! `calculate` (status + death-timer bookkeeping), then `handle` (at most one
//! member gained or lost). The split mirrors the two display accessors:
//! `days_till_death` reads timers that `calculate` has already advanced this
//! cycle, hence its +1 offset; `days_till_growth` reads the countdown that
//! only `handle` advances, hence none.

use ahash::AHashMap;

use crate::needs::{Need, NeedCondition, NeedKind};
use crate::species::SpeciesData;

/// Growth classification of a population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStatus {
    Growing,
    Declining,
    Stable,
}

/// Size change decided by one evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationChange {
    None,
    Gain,
    Loss,
}

/// Aggregates need conditions into a growth status
///
/// The aggregation formula is a strategy, not fixed arithmetic; swap it per
/// simulation if a species should e.g. tolerate minor deprivation.
pub trait GrowthStrategy {
    fn classify(&self, conditions: &[(NeedCondition, f32)]) -> GrowthStatus;
}

/// Default strategy: severity-weighted vote
///
/// Bad counts -severity, Good counts +severity, Neutral abstains. The sign of
/// the sum picks the status.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeverityWeighted;

impl GrowthStrategy for SeverityWeighted {
    fn classify(&self, conditions: &[(NeedCondition, f32)]) -> GrowthStatus {
        let score: f32 = conditions
            .iter()
            .map(|(condition, severity)| match condition {
                NeedCondition::Bad => -severity,
                NeedCondition::Neutral => 0.0,
                NeedCondition::Good => *severity,
            })
            .sum();
        if score > 0.0 {
            GrowthStatus::Growing
        } else if score < 0.0 {
            GrowthStatus::Declining
        } else {
            GrowthStatus::Stable
        }
    }
}

/// Per-population growth state
pub struct GrowthCalculator {
    status: GrowthStatus,
    growth_countdown: u32,
    growth_cycles: u32,
    /// Cycles a Bad need is given before it kills, derived from severity
    budgets: AHashMap<NeedKind, u32>,
    /// Live countdowns, created on first Bad, in creation order so the
    /// single removal per cycle is deterministic
    timers: Vec<(NeedKind, u32)>,
}

impl GrowthCalculator {
    pub fn new(species: &SpeciesData, death_budget_base: f32) -> Self {
        let budgets = species
            .needs
            .iter()
            .map(|need| {
                let cycles = (death_budget_base / need.severity).ceil().max(1.0) as u32;
                (need.kind, cycles)
            })
            .collect();
        Self {
            status: GrowthStatus::Stable,
            growth_countdown: species.growth_cycles,
            growth_cycles: species.growth_cycles,
            budgets,
            timers: Vec::new(),
        }
    }

    pub fn status(&self) -> GrowthStatus {
        self.status
    }

    /// Raw growth countdown, advanced by `handle`
    pub fn days_till_growth(&self) -> u32 {
        self.growth_countdown
    }

    /// Cycles until a Bad need kills, offset by one because `calculate` has
    /// already decremented the timer for the cycle being displayed
    pub fn days_till_death(&self, kind: NeedKind) -> Option<u32> {
        self.timers.iter().find(|(k, _)| *k == kind).map(|(_, t)| t + 1)
    }

    fn death_budget(&self, kind: NeedKind) -> u32 {
        self.budgets.get(&kind).copied().unwrap_or(1)
    }

    /// Update status and death timers from the current need conditions
    pub fn calculate(&mut self, needs: &AHashMap<NeedKind, Need>, strategy: &dyn GrowthStrategy) {
        let conditions: Vec<(NeedCondition, f32)> =
            needs.values().map(|n| (n.condition(), n.severity)).collect();
        self.status = strategy.classify(&conditions);

        // Leaving Bad clears the timer immediately
        self.timers
            .retain(|(kind, _)| needs.get(kind).map_or(false, |n| n.condition() == NeedCondition::Bad));

        for need in needs.values() {
            if need.condition() != NeedCondition::Bad {
                continue;
            }
            match self.timers.iter_mut().find(|(k, _)| *k == need.kind) {
                Some((_, timer)) => *timer = timer.saturating_sub(1),
                None => {
                    let budget = self.death_budget(need.kind);
                    self.timers.push((need.kind, budget.saturating_sub(1)));
                }
            }
        }
    }

    /// Apply the current status: at most one member gained or lost per cycle
    pub fn handle(&mut self) -> PopulationChange {
        match self.status {
            GrowthStatus::Growing => {
                self.growth_countdown = self.growth_countdown.saturating_sub(1);
                if self.growth_countdown == 0 {
                    self.growth_countdown = self.growth_cycles;
                    PopulationChange::Gain
                } else {
                    PopulationChange::None
                }
            }
            GrowthStatus::Declining => {
                if let Some((kind, _)) = self.timers.iter().find(|(_, t)| *t == 0).copied() {
                    // the expired timer restarts from its full budget
                    let budget = self.death_budget(kind);
                    if let Some(slot) = self.timers.iter_mut().find(|(k, _)| *k == kind) {
                        slot.1 = budget;
                    }
                    PopulationChange::Loss
                } else {
                    PopulationChange::None
                }
            }
            GrowthStatus::Stable => PopulationChange::None,
        }
    }
}
