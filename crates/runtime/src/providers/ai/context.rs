//! Shared view for goal behaviors.
//!
//! [`AiContext`] is the blackboard every behavior reads during one planner
//! decision: the world, the collaborators (through [`Env`]) and the action
//! kinds available to the unit, computed once per decision.

use rand::Rng;
use skirmish_core::action::{available_actions, move_cost, validate};
use skirmish_core::{
    Action, ActionKind, AiTuning, Env, GameConfig, Loadout, ObstacleMask, Position, Unit, UnitId,
    World,
};

pub struct AiContext<'a> {
    /// The unit making the decision.
    pub unit: UnitId,
    pub world: &'a World,
    pub env: Env<'a>,
    available: Vec<ActionKind>,
}

impl<'a> AiContext<'a> {
    pub fn new(unit: UnitId, world: &'a World, env: Env<'a>) -> Self {
        let available = available_actions(world, unit, &env);
        Self {
            unit,
            world,
            env,
            available,
        }
    }

    pub fn me(&self) -> Option<&'a Unit> {
        self.world.unit(self.unit)
    }

    /// Current cell; the origin for a unit that no longer exists.
    pub fn position(&self) -> Position {
        self.me().map(|unit| unit.position).unwrap_or_default()
    }

    pub fn config(&self) -> &'a GameConfig {
        self.env.config
    }

    pub fn tuning(&self) -> &'a AiTuning {
        &self.env.config.ai
    }

    pub fn available(&self) -> &[ActionKind] {
        &self.available
    }

    pub fn can(&self, kind: ActionKind) -> bool {
        self.available.contains(&kind)
    }

    pub fn loadout(&self) -> Loadout {
        Loadout::read(&*self.env.equipment, self.unit)
    }

    /// Living enemies the unit currently knows about.
    pub fn known_enemies(&self) -> Vec<&'a Unit> {
        let world = self.world;
        self.me()
            .map(|me| {
                me.known_enemies
                    .iter()
                    .filter_map(|id| world.unit(*id))
                    .filter(|enemy| enemy.alive)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Closest known enemy, lowest id on ties.
    pub fn nearest_enemy(&self) -> Option<&'a Unit> {
        let position = self.position();
        self.known_enemies()
            .into_iter()
            .min_by_key(|enemy| (position.chebyshev(enemy.position), enemy.id))
    }

    /// Living unit by id.
    pub fn living(&self, id: UnitId) -> Option<&'a Unit> {
        self.world.unit(id).filter(|unit| unit.alive)
    }

    /// Whether `action` would pass validation if taken from `origin`.
    pub fn is_valid(&self, action: &Action, origin: Position) -> bool {
        validate(self.world, self.unit, action, origin, &self.env).is_ok()
    }

    /// Uniform draw in `[0, 1)`.
    pub fn roll(&mut self) -> f32 {
        self.env.rng.gen_range(0.0..1.0)
    }

    /// Uniform draw in `[0, upper)`; zero for an empty range.
    pub fn draw(&mut self, upper: f32) -> f32 {
        if upper <= 0.0 {
            return 0.0;
        }
        self.env.rng.gen_range(0.0..upper)
    }

    /// Uniformly chosen element.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let index = self.env.rng.gen_range(0..items.len());
        items.get(index).copied()
    }

    /// Cells the unit can walk to with the AP it has left, at most `limit`
    /// cells away.
    pub fn affordable_cells(&self, limit: u32) -> Vec<Position> {
        let Some(me) = self.me() else {
            return Vec::new();
        };
        let per_cell = move_cost(1, me, self.env.config).max(1);
        let steps = (me.ledger.ap() / per_cell).min(limit);
        if steps == 0 {
            return Vec::new();
        }
        self.env
            .pathfinding
            .reachable_cells(me.position, 1, steps, ObstacleMask::all())
    }

    /// Free cell on the path to `goal` where the unit first comes within
    /// `stop_within` cells of it. `None` when already close enough or when
    /// no path exists.
    pub fn step_towards(&self, goal: Position, stop_within: u32) -> Option<Position> {
        let origin = self.position();
        if origin.chebyshev(goal) <= stop_within {
            return None;
        }
        let path = self.env.pathfinding.path(origin, goal)?;
        let last = path.len().checked_sub(1)?;
        let arrive = path
            .iter()
            .position(|cell| cell.chebyshev(goal) <= stop_within)
            .unwrap_or(last);
        path[..=arrive]
            .iter()
            .rev()
            .copied()
            .find(|cell| self.world.unit_at(*cell).is_none())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::{Faction, NullPresentation, PathfindingOracle, UnitSpec};

    use super::*;
    use crate::oracle::InMemoryEquipment;

    /// Grid whose paths always come back empty.
    struct Hollow;

    impl PathfindingOracle for Hollow {
        fn reachable_cells(
            &self,
            _origin: Position,
            _min_range: u32,
            _max_range: u32,
            _mask: ObstacleMask,
        ) -> Vec<Position> {
            Vec::new()
        }

        fn path(&self, _origin: Position, _destination: Position) -> Option<Vec<Position>> {
            Some(Vec::new())
        }

        fn is_walkable(&self, _cell: Position) -> bool {
            true
        }

        fn is_interactable(&self, _cell: Position) -> bool {
            false
        }
    }

    #[test]
    fn empty_path_gives_no_step() {
        let config = GameConfig::default();
        let mut world = World::new();
        let me = world
            .spawn(UnitSpec::new("scout", Faction(1), Position::new(0, 0)), &config)
            .unwrap();
        let mut equipment = InMemoryEquipment::new();
        let mut presentation = NullPresentation;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let env = Env::new(&config, &Hollow, &mut equipment, &mut presentation, &mut rng);
        let ctx = AiContext::new(me, &world, env);

        assert_eq!(ctx.step_towards(Position::new(5, 0), 1), None);
    }
}
