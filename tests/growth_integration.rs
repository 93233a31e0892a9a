//! Integration tests for the growth engine and behavior selection
//!
//! These verify the full lifecycle through the tick loop: sustained Bad
//! conditions kill on schedule, sustained Good conditions breed on schedule,
//! the final member's removal is terminal, and condition changes drive the
//! behavior map.

use std::cell::RefCell;
use std::rc::Rc;

use biodome::core::config::SimulationConfig;
use biodome::core::types::{BehaviorId, SpeciesId, Vec2};
use biodome::growth::GrowthStatus;
use biodome::needs::{NeedCondition, NeedKind, NeedThresholds};
use biodome::simulation::{advance, SimulationContext, SimulationEvent};
use biodome::species::{BehaviorRule, NeedDefinition, SpeciesClass, SpeciesData, SpeciesTable};
use biodome::terrain::TerrainGrid;

/// One density need whose bands pin the condition regardless of the value
fn vole_with_condition(condition: NeedCondition, severity: f32, growth_cycles: u32) -> SpeciesData {
    SpeciesData {
        id: SpeciesId(0),
        name: "test_vole".into(),
        class: SpeciesClass::Animal,
        dominance: 1.0,
        initial_population: 3,
        growth_cycles,
        base_output: 0.0,
        root_radius: 0,
        needs: vec![NeedDefinition {
            kind: NeedKind::Density,
            thresholds: NeedThresholds::new(vec![], condition),
            severity,
        }],
        behavior_names: vec!["roam".into(), "burrow".into()],
        behavior_rules: vec![BehaviorRule {
            need: NeedKind::Density,
            condition: NeedCondition::Bad,
            behavior: BehaviorId(1),
            priority: 2,
        }],
        default_behaviors: vec![BehaviorId(0)],
    }
}

fn context_of(species: SpeciesData, size: u32) -> SimulationContext {
    let mut table = SpeciesTable::new();
    table.insert(species);
    let mut ctx =
        SimulationContext::new(table, TerrainGrid::new(10, 10), SimulationConfig::default(), 5);
    ctx.spawn_population(SpeciesId(0), Vec2::new(4.0, 4.0), size).unwrap();
    ctx
}

#[test]
fn test_bad_need_kills_exactly_at_death_budget() {
    // severity 5 against base 10: the death budget is 2 cycles
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 5.0, 4), 3);
    let budget = 2;

    for cycle in 1..=budget {
        let events = advance(&mut ctx);
        let deaths = events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::PopulationCountDecreased { .. }))
            .count();
        if cycle < budget {
            assert_eq!(deaths, 0, "no death before cycle {budget}");
        } else {
            assert_eq!(deaths, 1, "exactly one death at cycle {budget}");
        }
    }
}

#[test]
fn test_decline_loses_one_member_per_budget_period() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 5.0, 4), 3);

    let mut losses = 0;
    for _ in 0..6 {
        let events = advance(&mut ctx);
        losses += events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    SimulationEvent::PopulationCountDecreased { .. }
                        | SimulationEvent::PopulationExtinct { .. }
                )
            })
            .count();
    }
    // budget 2: deaths at cycles 2, 4, 6
    assert_eq!(losses, 3);
}

#[test]
fn test_last_member_fires_extinct_not_decreased() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 10.0, 4), 1);

    // budget 1: the single member dies on the first cycle
    let events = advance(&mut ctx);
    let extinct = events
        .iter()
        .filter(|e| matches!(e, SimulationEvent::PopulationExtinct { .. }))
        .count();
    let decreased = events
        .iter()
        .filter(|e| matches!(e, SimulationEvent::PopulationCountDecreased { .. }))
        .count();
    assert_eq!(extinct, 1, "exactly one extinction event");
    assert_eq!(decreased, 0, "the final removal is not a decrease");

    // terminal: the object lingers, nothing further happens to it
    let events = advance(&mut ctx);
    assert!(events.is_empty(), "extinct population must stay silent, got {events:?}");
    assert!(ctx.populations[0].is_extinct());
}

#[test]
fn test_good_conditions_grow_on_schedule() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Good, 2.0, 3), 2);

    let mut growth_ticks = Vec::new();
    for tick in 1..=7 {
        let events = advance(&mut ctx);
        if events
            .iter()
            .any(|e| matches!(e, SimulationEvent::PopulationCountIncreased { .. }))
        {
            growth_ticks.push(tick);
        }
    }
    assert_eq!(growth_ticks, vec![3, 6], "one member per 3 satisfied cycles");
    assert_eq!(ctx.populations[0].count(), 4);
    assert_eq!(ctx.populations[0].growth_status(), GrowthStatus::Growing);
}

#[test]
fn test_days_till_death_and_growth_displays() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 2.0, 6), 3);

    // severity 2 against base 10: budget 5
    advance(&mut ctx);
    assert_eq!(
        ctx.populations[0].days_till_death(NeedKind::Density),
        Some(5),
        "death display carries the +1 offset"
    );
    // not growing: the countdown sits untouched at its full period
    assert_eq!(ctx.populations[0].days_till_growth(), 6);
}

#[test]
fn test_bad_condition_selects_rule_behavior() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 2.0, 4), 3);
    advance(&mut ctx);

    // density landed Bad on the first recompute; the burrow rule wins
    assert_eq!(
        ctx.populations[0].behaviors().behavior_for(NeedKind::Density),
        Some(BehaviorId(1))
    );
}

#[test]
fn test_unmatched_condition_falls_back_to_default() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Good, 2.0, 4), 3);
    advance(&mut ctx);

    // no rule covers Good: the first default behavior applies
    assert_eq!(
        ctx.populations[0].behaviors().behavior_for(NeedKind::Density),
        Some(BehaviorId(0))
    );
}

#[test]
fn test_events_reach_bus_subscribers() {
    let mut ctx = context_of(vole_with_condition(NeedCondition::Bad, 10.0, 4), 2);
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        ctx.events.subscribe(move |event| seen.borrow_mut().push(event.clone()));
    }

    let returned = advance(&mut ctx);
    assert_eq!(*seen.borrow(), returned, "bus delivery mirrors the returned events");
    assert!(!returned.is_empty());
}
