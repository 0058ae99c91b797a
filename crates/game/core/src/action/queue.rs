//! Per-unit FIFO of pending actions.
//!
//! Each entry carries the AP still owed for it, so the action list and the
//! cost list can never drift apart.

use std::collections::VecDeque;

use crate::state::{Position, UnitId};

use super::{Action, ActionKind, ActionTarget};

/// A queued action and the AP still to be paid for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueEntry {
    pub action: Action,
    pub cost: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionQueue {
    entries: VecDeque<QueueEntry>,
    /// Head has been paid for and is in flight.
    performing: bool,
    /// A cancel arrived while a non-interruptable head was in flight.
    cancel_requested: bool,
    /// Target of the queued attack, used by presentation for highlighting.
    pending_attack_target: Option<UnitId>,
    last_queued: Option<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn head(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn is_performing(&self) -> bool {
        self.performing
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub fn pending_attack_target(&self) -> Option<UnitId> {
        self.pending_attack_target
    }

    /// Most recently appended action, even if already executed.
    pub fn last_queued(&self) -> Option<Action> {
        self.last_queued
    }

    pub fn contains_variant(&self, kind: ActionKind) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.action.kind.same_variant(kind))
    }

    /// Where the unit will stand once every queued move has run.
    pub fn projected_position(&self, current: Position) -> Position {
        self.entries
            .iter()
            .rev()
            .find_map(|entry| match (entry.action.kind, entry.action.target) {
                (ActionKind::Move, ActionTarget::Cell(cell)) => Some(cell),
                _ => None,
            })
            .unwrap_or(current)
    }

    /// Whether the ranged weapon will be loaded once every queued shot and
    /// reload has run.
    pub fn projected_loaded(&self, current: bool) -> bool {
        self.entries
            .iter()
            .rev()
            .find_map(|entry| match entry.action.kind {
                ActionKind::Reload => Some(true),
                ActionKind::RangedAttack => Some(false),
                _ => None,
            })
            .unwrap_or(current)
    }

    pub fn push(&mut self, action: Action, cost: u32) {
        if action.kind.is_attack() {
            self.pending_attack_target = action.target.unit();
        }
        self.entries.push_back(QueueEntry { action, cost });
        self.last_queued = Some(action);
    }

    /// Lowers the cost still owed by the head after a partial payment.
    /// Returns the remaining cost.
    pub fn reduce_head_cost(&mut self, paid: u32) -> Option<u32> {
        let head = self.entries.front_mut()?;
        head.cost = head.cost.saturating_sub(paid);
        Some(head.cost)
    }

    pub fn mark_performing(&mut self) {
        self.performing = true;
    }

    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Returns and resets the pending cancel request.
    pub fn take_cancel_request(&mut self) -> bool {
        std::mem::take(&mut self.cancel_requested)
    }

    /// Removes the head once it has completed.
    pub fn complete_head(&mut self) -> Option<QueueEntry> {
        let entry = self.entries.pop_front()?;
        self.performing = false;
        if entry.action.kind.is_attack() && !self.has_attack_queued() {
            self.pending_attack_target = None;
        }
        Some(entry)
    }

    /// Empties the queue and resets the in-flight flags in one go.
    pub fn clear(&mut self) -> Vec<QueueEntry> {
        let head_is_attack = self
            .entries
            .front()
            .is_some_and(|entry| entry.action.kind.is_attack());
        if head_is_attack || !self.has_attack_queued() {
            self.pending_attack_target = None;
        }
        self.performing = false;
        self.cancel_requested = false;
        self.entries.drain(..).collect()
    }

    /// Drops every idle entry whose kind may be cleared, keeping the rest in
    /// order. Returns the removed entries.
    pub fn remove_clearable(&mut self) -> Vec<QueueEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.action.kind.can_be_cleared_from_queue());
        self.entries = kept.into();
        if !self.has_attack_queued() {
            self.pending_attack_target = None;
        }
        removed
    }

    fn has_attack_queued(&self) -> bool {
        self.entries.iter().any(|entry| entry.action.kind.is_attack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EquipSlot;

    fn reload() -> Action {
        Action::new(ActionKind::Reload, ActionTarget::Slot(EquipSlot::MainHand))
    }

    #[test]
    fn fifo_order_and_costs_stay_paired() {
        let mut queue = ActionQueue::new();
        queue.push(Action::move_to(Position::new(1, 0)), 5);
        queue.push(Action::melee(UnitId(2)), 15);
        queue.push(reload(), 10);

        let drained: Vec<_> = std::iter::from_fn(|| queue.complete_head())
            .map(|entry| (entry.action.kind, entry.cost))
            .collect();
        assert_eq!(
            drained,
            vec![
                (ActionKind::Move, 5),
                (ActionKind::MeleeAttack, 15),
                (ActionKind::Reload, 10)
            ]
        );
    }

    #[test]
    fn partial_payment_reduces_head_cost() {
        let mut queue = ActionQueue::new();
        queue.push(Action::melee(UnitId(1)), 40);
        assert_eq!(queue.reduce_head_cost(25), Some(15));
        assert_eq!(queue.head().map(|entry| entry.cost), Some(15));
    }

    #[test]
    fn clear_resets_flags_and_attack_target() {
        let mut queue = ActionQueue::new();
        queue.push(Action::melee(UnitId(4)), 15);
        queue.push(Action::move_to(Position::new(2, 2)), 5);
        queue.mark_performing();
        queue.request_cancel();
        assert_eq!(queue.pending_attack_target(), Some(UnitId(4)));

        let removed = queue.clear();
        assert_eq!(removed.len(), 2);
        assert!(queue.is_empty());
        assert!(!queue.is_performing());
        assert!(!queue.cancel_requested());
        assert_eq!(queue.pending_attack_target(), None);
        assert_eq!(
            queue.last_queued(),
            Some(Action::move_to(Position::new(2, 2)))
        );
    }

    #[test]
    fn remove_clearable_keeps_equipment_changes() {
        let mut queue = ActionQueue::new();
        queue.push(Action::move_to(Position::new(1, 0)), 5);
        queue.push(reload(), 15);
        queue.push(Action::melee(UnitId(3)), 15);

        let removed = queue.remove_clearable();
        assert_eq!(removed.len(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.head().map(|entry| entry.action), Some(reload()));
        assert_eq!(queue.pending_attack_target(), None);
    }

    #[test]
    fn projected_position_follows_last_move() {
        let mut queue = ActionQueue::new();
        let start = Position::new(0, 0);
        assert_eq!(queue.projected_position(start), start);

        queue.push(Action::move_to(Position::new(3, 1)), 15);
        queue.push(Action::melee(UnitId(1)), 15);
        assert_eq!(queue.projected_position(start), Position::new(3, 1));
    }

    #[test]
    fn projected_loaded_follows_last_shot_or_reload() {
        let mut queue = ActionQueue::new();
        assert!(queue.projected_loaded(true));
        assert!(!queue.projected_loaded(false));

        queue.push(Action::new(ActionKind::RangedAttack, ActionTarget::Unit(UnitId(2))), 20);
        assert!(!queue.projected_loaded(true));

        queue.push(reload(), 10);
        queue.push(Action::move_to(Position::new(1, 1)), 5);
        assert!(queue.projected_loaded(false));
    }
}
