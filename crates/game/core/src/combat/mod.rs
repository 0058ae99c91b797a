//! Combat resolution.
//!
//! Pure functions computing dodge, accuracy and block chances and damage.
//! Nothing here touches the world or draws random numbers on its own: the
//! engine captures [`Combatant`] snapshots, draws [`DefenseRolls`] and applies
//! the resulting [`AttackReport`].
//!
//! # Pipeline
//!
//! 1. Hit determination: dodge (melee) or the shared accuracy roll (ranged)
//! 2. Block determination: shield first, then each weapon hand
//! 3. Damage application: `max(0, raw - block power)` or raw in full

pub mod block;
pub mod damage;
pub mod geometry;
pub mod hit;
pub mod result;

pub use block::{block_power, shield_block_chance, weapon_block_chance};
pub use damage::{apply_damage, blocked_damage, raw_damage};
pub use geometry::{Approach, approach, height_modifier};
pub use hit::{accuracy_chance, dodge_chance, encumbrance_penalty, skill_modifier};
pub use result::{
    AttackContext, AttackKind, AttackReport, BlockSource, Blocker, Combatant, Defense,
    DefenseRolls, TargetOutcome, TargetResolutionMap, resolve_target,
};
