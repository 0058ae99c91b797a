//! The standard behavior set.
//!
//! Fight and SwitchStance react to known enemies, Flee only runs when Fight
//! hands off to it, and the rest are low-priority routines for quiet
//! moments.

mod fight;
mod flee;
mod follow;
mod idle;
mod inspect;
mod patrol;
mod stance;
mod wander;

pub use fight::FightBehavior;
pub use flee::FleeBehavior;
pub use follow::FollowBehavior;
pub use idle::IdleBehavior;
pub use inspect::InspectSoundBehavior;
pub use patrol::PatrolBehavior;
pub use stance::SwitchStanceBehavior;
pub use wander::WanderBehavior;

#[cfg(test)]
pub(crate) mod testing {
    //! Small world builder shared by the behavior tests.

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_content::MapLayout;
    use skirmish_core::{
        Env, EquipSlot, Faction, GameConfig, ItemStats, NullPresentation, Position, UnitId,
        UnitSpec, World,
    };

    use crate::oracle::{GridPathfinding, InMemoryEquipment};
    use crate::providers::ai::AiContext;

    pub struct Arena {
        pub config: GameConfig,
        pub world: World,
        pub pathfinding: GridPathfinding,
        pub equipment: InMemoryEquipment,
        pub rng: ChaCha8Rng,
    }

    impl Arena {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                config: GameConfig::default(),
                world: World::new(),
                pathfinding: GridPathfinding::new(MapLayout::new(width, height)),
                equipment: InMemoryEquipment::new(),
                rng: ChaCha8Rng::seed_from_u64(11),
            }
        }

        pub fn spawn(&mut self, name: &str, faction: u8, x: i32, y: i32) -> UnitId {
            let id = self
                .world
                .spawn(
                    UnitSpec::new(name, Faction(faction), Position::new(x, y)),
                    &self.config,
                )
                .unwrap();
            self.sync();
            id
        }

        pub fn equip(&mut self, unit: UnitId, slot: EquipSlot, stats: ItemStats) {
            self.equipment.equip_new(unit, slot, stats);
        }

        /// Makes `unit` aware of `enemies`.
        pub fn spot(&mut self, unit: UnitId, enemies: &[UnitId]) {
            self.world.get_mut(unit).unwrap().known_enemies = enemies.to_vec();
        }

        pub fn sync(&mut self) {
            self.pathfinding
                .set_occupied(self.world.alive().map(|unit| unit.position));
        }

        pub fn with_ctx<R>(&mut self, unit: UnitId, f: impl FnOnce(&mut AiContext<'_>) -> R) -> R {
            let mut presentation = NullPresentation;
            let env = Env::new(
                &self.config,
                &self.pathfinding,
                &mut self.equipment,
                &mut presentation,
                &mut self.rng,
            );
            let mut ctx = AiContext::new(unit, &self.world, env);
            f(&mut ctx)
        }
    }
}
