//! Full encounters driven by the planners alone.

use skirmish_content::MapLayout;
use skirmish_core::{EquipSlot, Faction, ItemStats, Position, UnitSpec, WeaponType};
use skirmish_runtime::{Progress, RunSummary, Simulation, SimulationConfig};

const MAX_STEPS: usize = 20_000;

fn skirmish(seed: u64) -> Simulation {
    let config = SimulationConfig {
        seed,
        autopilot: true,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config, MapLayout::new(10, 6));
    let hero = sim
        .spawn(
            UnitSpec::new("hero", Faction::PLAYER, Position::new(1, 2))
                .human()
                .with_health(40),
        )
        .unwrap();
    sim.equip(hero, EquipSlot::MainHand, ItemStats::weapon(WeaponType::Sword, 7, 3.0));

    for (name, y) in [("cutthroat", 1), ("footpad", 4)] {
        let bandit = sim
            .spawn(UnitSpec::new(name, Faction(1), Position::new(8, y)).with_health(20))
            .unwrap();
        sim.equip(bandit, EquipSlot::MainHand, ItemStats::weapon(WeaponType::Mace, 5, 3.0));
    }
    sim
}

fn final_state(sim: &Simulation) -> Vec<(String, u32, Position)> {
    sim.world()
        .units()
        .map(|unit| (unit.name.clone(), unit.health.current, unit.position))
        .collect()
}

#[test]
fn autopilot_skirmish_ends_with_one_side_standing() {
    let mut sim = skirmish(7);
    let summary = sim.run(MAX_STEPS).unwrap();

    assert!(summary.finished, "still running after {} steps", summary.steps);
    assert!(summary.turns > 0);
    assert!(!summary.survivors.is_empty());

    let factions: Vec<Faction> = summary
        .survivors
        .iter()
        .map(|id| sim.world().get(*id).unwrap().faction)
        .collect();
    assert!(factions.iter().all(|faction| *faction == factions[0]));
    assert!(!sim.world().is_contested());
    assert_eq!(sim.advance().unwrap(), Progress::Finished);
}

#[test]
fn same_seed_replays_the_same_fight() {
    let mut first = skirmish(42);
    let mut second = skirmish(42);

    let a: RunSummary = first.run(MAX_STEPS).unwrap();
    let b: RunSummary = second.run(MAX_STEPS).unwrap();

    assert_eq!(a, b);
    assert_eq!(final_state(&first), final_state(&second));
}

#[test]
fn blows_are_exchanged_before_the_end() {
    let mut sim = skirmish(3);
    sim.run(MAX_STEPS).unwrap();

    let wounded = sim
        .world()
        .units()
        .filter(|unit| unit.health.current < unit.health.maximum)
        .count();
    assert!(wounded > 0);
}

#[test]
fn run_stops_for_the_human_without_autopilot() {
    let mut sim = Simulation::new(SimulationConfig::default(), MapLayout::new(6, 6));
    let hero = sim
        .spawn(UnitSpec::new("hero", Faction::PLAYER, Position::new(0, 0)).human())
        .unwrap();
    sim.spawn(UnitSpec::new("bandit", Faction(1), Position::new(5, 5)))
        .unwrap();

    let summary = sim.run(10).unwrap();
    assert!(!summary.finished);
    assert_eq!(summary.steps, 2);
    assert_eq!(sim.current_unit(), Some(hero));
}
