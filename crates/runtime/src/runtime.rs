//! Simulation context.
//!
//! [`Simulation`] owns everything one encounter needs: the unit registry,
//! the collaborator adapters, the event bus, the seeded RNG and one planner
//! per unit. It is driven by [`Simulation::advance`], which performs exactly
//! one step of the turn driver and reports what happened. Nothing blocks:
//! when the human-controlled unit needs input or an attack waits for
//! presentation, `advance` says so and returns.

use std::collections::{BTreeMap, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_content::{Encounter, MapLayout};
use skirmish_core::{
    Action, ActionKind, ActionTarget, CancelOutcome, Enqueued, Env, EquipSlot, EventKind,
    GameConfig, GameEngine, ItemId, ItemStats, NullPresentation, StepOutcome, TurnError, UnitId,
    UnitSpec, World, WorldEvent,
};
use tokio::sync::broadcast;

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic, drain};
use crate::oracle::{GridPathfinding, InMemoryEquipment};
use crate::providers::{AiContext, Goal, Plan, Planner, Routine};

/// Reroutes followed while enqueuing one plan (walk to a door, open it).
const MAX_REROUTES: usize = 4;

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub game_config: GameConfig,
    /// Seed of the RNG behind every roll of the encounter.
    pub seed: u64,
    pub event_buffer_size: usize,
    /// Complete in-flight attacks immediately instead of waiting for
    /// [`Simulation::resolution_complete`].
    pub auto_resolve: bool,
    /// Let the planner drive the human-controlled unit as well.
    pub autopilot: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: 0,
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            auto_resolve: true,
            autopilot: false,
        }
    }
}

/// What one call to [`Simulation::advance`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    TurnStarted(UnitId),
    /// The active unit's queue moved on.
    Stepped { unit: UnitId, outcome: StepOutcome },
    /// The planner queued actions for the active unit.
    Planned {
        unit: UnitId,
        goal: Option<Goal>,
        queued: usize,
    },
    /// The human-controlled unit has AP and an empty queue.
    AwaitingInput(UnitId),
    /// An attack is in flight and waits for its completion signal.
    AwaitingResolution { unit: UnitId, kind: ActionKind },
    TurnEnded(UnitId),
    /// One faction is left, or nobody can act any more.
    Finished,
}

/// Totals of [`Simulation::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub turns: u64,
    pub finished: bool,
    pub survivors: Vec<UnitId>,
}

pub struct Simulation {
    config: SimulationConfig,
    world: World,
    pathfinding: GridPathfinding,
    equipment: InMemoryEquipment,
    bus: EventBus,
    rng: ChaCha8Rng,
    planners: BTreeMap<UnitId, Planner>,
    /// Interactions waiting to be applied to the map.
    interactions: broadcast::Receiver<Event>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, layout: MapLayout) -> Self {
        let bus = EventBus::with_capacity(config.event_buffer_size);
        let interactions = bus.subscribe(Topic::World(EventKind::Interacted));
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            world: World::new(),
            pathfinding: GridPathfinding::new(layout),
            equipment: InMemoryEquipment::new(),
            bus,
            planners: BTreeMap::new(),
            interactions,
        }
    }

    /// Spawns every roster unit with its items and routine.
    pub fn from_encounter(
        config: SimulationConfig,
        encounter: &Encounter,
        layout: MapLayout,
    ) -> Result<Self> {
        let mut simulation = Self::new(config, layout);
        let mut ids = Vec::with_capacity(encounter.units.len());
        for entry in &encounter.units {
            let id = simulation.spawn(entry.spec.clone())?;
            for (slot, stats) in &entry.equipped {
                simulation.equip(id, *slot, *stats);
            }
            for stats in &entry.carried {
                simulation.give(id, *stats);
            }
            ids.push(id);
        }
        for (index, entry) in encounter.units.iter().enumerate() {
            let follow = match entry.follow {
                Some(leader) => Some(
                    *ids.get(leader)
                        .ok_or(RuntimeError::UnknownLeader { index, leader })?,
                ),
                None => None,
            };
            let routine = Routine {
                patrol: entry.patrol.clone(),
                follow,
            };
            simulation.set_routine(ids[index], &routine)?;
        }
        tracing::info!(map = %encounter.map, units = ids.len(), "encounter loaded");
        Ok(simulation)
    }

    pub fn spawn(&mut self, spec: UnitSpec) -> Result<UnitId> {
        let id = self.world.spawn(spec, &self.config.game_config)?;
        self.planners.insert(
            id,
            Planner::standard(id, self.bus.clone(), &Routine::default()),
        );
        Ok(id)
    }

    /// Replaces the unit's planner with one shaped by `routine`.
    pub fn set_routine(&mut self, unit: UnitId, routine: &Routine) -> Result<()> {
        self.world.get(unit)?;
        self.planners
            .insert(unit, Planner::standard(unit, self.bus.clone(), routine));
        Ok(())
    }

    pub fn equip(&mut self, unit: UnitId, slot: EquipSlot, stats: ItemStats) -> ItemId {
        self.equipment.equip_new(unit, slot, stats)
    }

    pub fn give(&mut self, unit: UnitId, stats: ItemStats) -> ItemId {
        self.equipment.give(unit, stats)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layout(&self) -> &MapLayout {
        self.pathfinding.layout()
    }

    pub fn equipment(&self) -> &InMemoryEquipment {
        &self.equipment
    }

    pub fn planner(&self, unit: UnitId) -> Option<&Planner> {
        self.planners.get(&unit)
    }

    /// Receives events of `topic` published from now on.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.world.turn.current
    }

    // ------------------------------------------------------------------
    // Player-facing API
    // ------------------------------------------------------------------

    /// Validates, prices and queues an action. A reroute is returned, not
    /// queued; the caller decides whether to queue the replacement.
    pub fn queue_action(
        &mut self,
        unit: UnitId,
        kind: ActionKind,
        target: ActionTarget,
    ) -> Result<Enqueued> {
        let (mut engine, mut env) = self.split();
        Ok(engine.enqueue(unit, Action::new(kind, target), &mut env)?)
    }

    pub fn cancel_actions(&mut self, unit: UnitId) -> Result<CancelOutcome> {
        let (mut engine, mut env) = self.split();
        Ok(engine.cancel(unit, &mut env)?)
    }

    pub fn current_ap(&self, unit: UnitId) -> Result<u32> {
        Ok(self.world.get(unit)?.ledger.ap())
    }

    pub fn selected_action(&self, unit: UnitId) -> Result<ActionKind> {
        Ok(self.world.get(unit)?.selected_action)
    }

    pub fn select_action(&mut self, unit: UnitId, kind: ActionKind) -> Result<()> {
        let (mut engine, _) = self.split();
        Ok(engine.set_selected_action(unit, kind)?)
    }

    pub fn available_actions(&mut self, unit: UnitId) -> Vec<ActionKind> {
        let (engine, env) = self.split();
        engine.available_actions(unit, &env)
    }

    /// Completion signal for the unit's in-flight action.
    pub fn resolution_complete(&mut self, unit: UnitId) -> Result<ActionKind> {
        let (mut engine, mut env) = self.split();
        Ok(engine.resolution_complete(unit, &mut env)?)
    }

    /// Ends the active unit's turn early.
    pub fn end_turn(&mut self, unit: UnitId) -> Result<()> {
        let (mut engine, mut env) = self.split();
        Ok(engine.end_turn(unit, &mut env)?)
    }

    // ------------------------------------------------------------------
    // Turn driver
    // ------------------------------------------------------------------

    /// Performs one step of the turn driver.
    ///
    /// Failures of the active unit degrade instead of propagating: a queue
    /// that cannot be stepped is cleared and the turn ends, a unit without a
    /// planner ends its turn. Only inconsistent turn bookkeeping
    /// ([`TurnError`]) is returned as an error.
    pub fn advance(&mut self) -> Result<Progress> {
        let Some(unit) = self.world.turn.current else {
            return self.start_next_turn();
        };

        let (engine, _) = self.split();
        if engine.should_end_turn(unit) {
            return self.finish_turn(unit);
        }

        let has_queue = self
            .world
            .unit(unit)
            .is_some_and(|active| !active.queue.is_empty());
        if has_queue {
            return self.step_queue(unit);
        }

        let human = self.world.unit(unit).is_some_and(|active| active.is_human());
        if human && !self.config.autopilot {
            return Ok(Progress::AwaitingInput(unit));
        }
        self.plan(unit)
    }

    /// Advances until the encounter finishes, input is needed or `max_steps`
    /// steps were taken.
    pub fn run(&mut self, max_steps: usize) -> Result<RunSummary> {
        let mut steps = 0;
        let mut finished = false;
        while steps < max_steps {
            let progress = self.advance()?;
            steps += 1;
            match progress {
                Progress::Finished => {
                    finished = true;
                    break;
                }
                Progress::AwaitingInput(_) | Progress::AwaitingResolution { .. } => break,
                _ => {}
            }
        }
        let survivors = self.world.alive().map(|unit| unit.id).collect();
        Ok(RunSummary {
            steps,
            turns: self.world.turn.turn,
            finished,
            survivors,
        })
    }

    fn start_next_turn(&mut self) -> Result<Progress> {
        if !self.world.is_contested() {
            tracing::info!(turn = self.world.turn.turn, "encounter finished");
            return Ok(Progress::Finished);
        }
        let (mut engine, mut env) = self.split();
        match engine.begin_next_turn(&mut env) {
            Ok(unit) => Ok(Progress::TurnStarted(unit)),
            Err(TurnError::NoEligibleUnits) => {
                tracing::info!("no unit can act, encounter finished");
                Ok(Progress::Finished)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn finish_turn(&mut self, unit: UnitId) -> Result<Progress> {
        let (mut engine, mut env) = self.split();
        engine.end_turn(unit, &mut env)?;
        Ok(Progress::TurnEnded(unit))
    }

    fn step_queue(&mut self, unit: UnitId) -> Result<Progress> {
        let auto_resolve = self.config.auto_resolve;
        let (mut engine, mut env) = self.split();
        let mut outcome = match engine.step(unit, &mut env) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(%unit, %error, "queue cannot be stepped, ending turn");
                engine.clear_queue(unit, true, &mut env);
                engine.end_turn(unit, &mut env)?;
                return Ok(Progress::TurnEnded(unit));
            }
        };
        if let StepOutcome::Waiting(kind) = outcome {
            if !auto_resolve {
                return Ok(Progress::AwaitingResolution { unit, kind });
            }
            outcome = match engine.resolution_complete(unit, &mut env) {
                Ok(kind) => StepOutcome::Completed(kind),
                Err(error) => {
                    tracing::warn!(%unit, %kind, %error, "resolution failed, clearing queue");
                    engine.clear_queue(unit, true, &mut env);
                    StepOutcome::Idle
                }
            };
        }
        if outcome.ends_turn() {
            engine.end_turn(unit, &mut env)?;
        }
        self.apply_interactions();
        Ok(Progress::Stepped { unit, outcome })
    }

    /// One planner decision for the active unit, enqueued right away. The
    /// turn ends when the unit is out of decisions or has nothing to do.
    fn plan(&mut self, unit: UnitId) -> Result<Progress> {
        let (mut engine, env) = self.split();
        if !engine.record_decision(&env) {
            tracing::debug!(%unit, "decision limit reached");
            return self.finish_turn(unit);
        }

        let Some(mut planner) = self.planners.remove(&unit) else {
            tracing::warn!(%unit, "no planner for unit, ending turn");
            return self.finish_turn(unit);
        };
        let plan = self.decide(unit, &mut planner);
        self.planners.insert(unit, planner);

        if plan.is_wait() {
            return self.finish_turn(unit);
        }
        {
            let (mut engine, _) = self.split();
            if let Err(error) = engine.set_movement_mode(unit, plan.movement_mode) {
                tracing::warn!(%unit, %error, "movement mode not applied");
            }
        }
        let queued = self.enqueue_all(unit, plan.actions);
        if queued == 0 {
            return self.finish_turn(unit);
        }
        Ok(Progress::Planned {
            unit,
            goal: plan.goal,
            queued,
        })
    }

    fn decide(&mut self, unit: UnitId, planner: &mut Planner) -> Plan {
        self.sync_occupancy();
        // Planning only reads the world; it has nothing to present.
        let mut silent = NullPresentation;
        let env = Env::new(
            &self.config.game_config,
            &self.pathfinding,
            &mut self.equipment,
            &mut silent,
            &mut self.rng,
        );
        let mut ctx = AiContext::new(unit, &self.world, env);
        planner.decide(&mut ctx)
    }

    /// Enqueues `actions` in order, expanding reroutes in place. Stops at
    /// the first refusal since later actions build on earlier ones.
    fn enqueue_all(&mut self, unit: UnitId, actions: Vec<Action>) -> usize {
        let mut pending: VecDeque<Action> = actions.into();
        let mut reroutes = 0;
        let mut queued = 0;
        while let Some(action) = pending.pop_front() {
            let (mut engine, mut env) = self.split();
            match engine.enqueue(unit, action, &mut env) {
                Ok(Enqueued::Queued { .. }) => queued += 1,
                Ok(Enqueued::Rerouted(replacement)) if reroutes < MAX_REROUTES => {
                    reroutes += 1;
                    for action in replacement.into_iter().rev() {
                        pending.push_front(action);
                    }
                }
                Ok(Enqueued::Rerouted(_)) => {
                    tracing::warn!(%unit, %action, "too many reroutes, plan dropped");
                    break;
                }
                Err(_) => break,
            }
        }
        queued
    }

    /// Opens doors that were interacted with.
    fn apply_interactions(&mut self) {
        for event in drain(&mut self.interactions) {
            if let Event::World(WorldEvent::Interacted { unit, cell }) = event
                && self.pathfinding.open_door(cell)
            {
                tracing::info!(%unit, %cell, "door opened");
            }
        }
    }

    fn sync_occupancy(&mut self) {
        self.pathfinding
            .set_occupied(self.world.alive().map(|unit| unit.position));
    }

    fn split(&mut self) -> (GameEngine<'_>, Env<'_>) {
        self.sync_occupancy();
        let engine = GameEngine::new(&mut self.world);
        let env = Env::new(
            &self.config.game_config,
            &self.pathfinding,
            &mut self.equipment,
            &mut self.bus,
            &mut self.rng,
        );
        (engine, env)
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Faction, Position, WeaponType};

    use super::*;

    fn sword() -> ItemStats {
        ItemStats::weapon(WeaponType::Sword, 6, 3.0)
    }

    #[test]
    fn player_api_reports_ap_and_selection() {
        let mut sim = Simulation::new(SimulationConfig::default(), MapLayout::new(8, 8));
        let hero = sim
            .spawn(UnitSpec::new("hero", Faction::PLAYER, Position::new(1, 1)).human())
            .unwrap();
        sim.spawn(UnitSpec::new("bandit", Faction(1), Position::new(6, 6)))
            .unwrap();
        sim.equip(hero, EquipSlot::MainHand, sword());

        assert_eq!(sim.advance().unwrap(), Progress::TurnStarted(hero));
        assert_eq!(sim.advance().unwrap(), Progress::AwaitingInput(hero));
        assert_eq!(sim.current_ap(hero).unwrap(), 60);
        assert_eq!(sim.selected_action(hero).unwrap(), ActionKind::Move);
        assert!(sim.available_actions(hero).contains(&ActionKind::MeleeAttack));
        sim.select_action(hero, ActionKind::MeleeAttack).unwrap();
        assert_eq!(sim.selected_action(hero).unwrap(), ActionKind::MeleeAttack);

        let queued = sim
            .queue_action(hero, ActionKind::Move, ActionTarget::Cell(Position::new(3, 1)))
            .unwrap();
        assert_eq!(queued, Enqueued::Queued { cost: 10 });
        assert_eq!(sim.cancel_actions(hero).unwrap(), CancelOutcome::Cleared(1));
        assert!(matches!(
            sim.current_ap(UnitId(9)),
            Err(RuntimeError::World(_))
        ));
    }

    #[test]
    fn waits_for_resolution_when_not_auto_resolving() {
        let config = SimulationConfig {
            auto_resolve: false,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config, MapLayout::new(8, 8));
        let hero = sim
            .spawn(UnitSpec::new("hero", Faction::PLAYER, Position::new(1, 1)).human())
            .unwrap();
        let bandit = sim
            .spawn(UnitSpec::new("bandit", Faction(1), Position::new(2, 1)))
            .unwrap();
        sim.equip(hero, EquipSlot::MainHand, sword());

        sim.advance().unwrap();
        sim.queue_action(hero, ActionKind::MeleeAttack, ActionTarget::Unit(bandit))
            .unwrap();
        assert_eq!(
            sim.advance().unwrap(),
            Progress::Stepped {
                unit: hero,
                outcome: StepOutcome::Started(ActionKind::MeleeAttack)
            }
        );
        assert_eq!(
            sim.advance().unwrap(),
            Progress::AwaitingResolution {
                unit: hero,
                kind: ActionKind::MeleeAttack
            }
        );
        assert_eq!(sim.resolution_complete(hero).unwrap(), ActionKind::MeleeAttack);
        assert!(sim.world().get(hero).unwrap().queue.is_empty());
    }

    #[test]
    fn unsteppable_queue_ends_the_turn_instead_of_failing() {
        let mut sim = Simulation::new(SimulationConfig::default(), MapLayout::new(8, 8));
        let hero = sim
            .spawn(UnitSpec::new("hero", Faction::PLAYER, Position::new(1, 1)).human())
            .unwrap();
        sim.spawn(UnitSpec::new("bandit", Faction(1), Position::new(6, 6)))
            .unwrap();

        assert_eq!(sim.advance().unwrap(), Progress::TurnStarted(hero));
        sim.queue_action(hero, ActionKind::Move, ActionTarget::Cell(Position::new(3, 1)))
            .unwrap();
        sim.world.get_mut(hero).unwrap().can_perform_actions = false;

        assert_eq!(sim.advance().unwrap(), Progress::TurnEnded(hero));
        assert!(sim.world().get(hero).unwrap().queue.is_empty());
        assert_eq!(sim.current_unit(), None);
    }
}
