//! Action kinds and their capability table.

use std::mem;

use bitflags::bitflags;

use crate::stance::StanceKind;

bitflags! {
    /// Static capabilities of an action kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u8 {
        /// Cancelling mid-flight truncates instead of waiting for completion.
        const INTERRUPTABLE    = 1 << 0;
        /// Completes in the same step it is paid for.
        const USED_INSTANTLY   = 1 << 1;
        /// Removed when the queue is cancelled while idle.
        const CLEARABLE        = 1 << 2;
        /// Several entries of this kind may sit in one queue.
        const QUEUE_MULTIPLE   = 1 << 3;
        /// Enqueuing resets the unit's selected action to `Move`.
        const ONE_SHOT         = 1 << 4;
    }
}

/// Closed set of actions a unit can queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Turn,
    MeleeAttack,
    RangedAttack,
    Reload,
    Equip,
    Unequip,
    Consume,
    SwapWeaponSet,
    /// Toggles the given stance.
    Stance(StanceKind),
    Interact,
}

impl ActionKind {
    pub const fn flags(self) -> ActionFlags {
        use ActionFlags as F;
        match self {
            ActionKind::Move => F::INTERRUPTABLE.union(F::CLEARABLE).union(F::QUEUE_MULTIPLE),
            ActionKind::Turn => F::USED_INSTANTLY
                .union(F::INTERRUPTABLE)
                .union(F::CLEARABLE)
                .union(F::QUEUE_MULTIPLE),
            ActionKind::MeleeAttack | ActionKind::RangedAttack => {
                F::CLEARABLE.union(F::QUEUE_MULTIPLE)
            }
            ActionKind::Reload | ActionKind::Equip | ActionKind::Unequip => {
                F::USED_INSTANTLY.union(F::ONE_SHOT)
            }
            ActionKind::SwapWeaponSet => F::USED_INSTANTLY.union(F::ONE_SHOT),
            ActionKind::Consume => F::USED_INSTANTLY
                .union(F::CLEARABLE)
                .union(F::QUEUE_MULTIPLE)
                .union(F::ONE_SHOT),
            ActionKind::Stance(_) => F::USED_INSTANTLY.union(F::CLEARABLE).union(F::ONE_SHOT),
            ActionKind::Interact => F::USED_INSTANTLY.union(F::CLEARABLE),
        }
    }

    pub const fn is_interruptable(self) -> bool {
        self.flags().contains(ActionFlags::INTERRUPTABLE)
    }

    pub const fn is_used_instantly(self) -> bool {
        self.flags().contains(ActionFlags::USED_INSTANTLY)
    }

    pub const fn can_be_cleared_from_queue(self) -> bool {
        self.flags().contains(ActionFlags::CLEARABLE)
    }

    pub const fn can_queue_multiple(self) -> bool {
        self.flags().contains(ActionFlags::QUEUE_MULTIPLE)
    }

    pub const fn resets_selection(self) -> bool {
        self.flags().contains(ActionFlags::ONE_SHOT)
    }

    pub const fn is_attack(self) -> bool {
        matches!(self, ActionKind::MeleeAttack | ActionKind::RangedAttack)
    }

    /// Same variant, ignoring payload (all stance toggles count as one kind).
    pub fn same_variant(self, other: ActionKind) -> bool {
        mem::discriminant(&self) == mem::discriminant(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_changes_cannot_be_cleared() {
        for kind in [
            ActionKind::Reload,
            ActionKind::Equip,
            ActionKind::Unequip,
            ActionKind::SwapWeaponSet,
        ] {
            assert!(!kind.can_be_cleared_from_queue(), "{kind}");
            assert!(kind.resets_selection(), "{kind}");
        }
    }

    #[test]
    fn only_movement_like_actions_are_interruptable() {
        assert!(ActionKind::Move.is_interruptable());
        assert!(!ActionKind::Move.is_used_instantly());
        assert!(!ActionKind::MeleeAttack.is_interruptable());
        assert!(!ActionKind::RangedAttack.is_used_instantly());
    }

    #[test]
    fn stance_toggles_share_a_variant() {
        let guard = ActionKind::Stance(StanceKind::RaisedGuard);
        let grip = ActionKind::Stance(StanceKind::TwoHandedGrip);
        assert!(guard.same_variant(grip));
        assert!(!guard.same_variant(ActionKind::Move));
        assert!(!guard.can_queue_multiple());
    }
}
