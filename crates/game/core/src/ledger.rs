//! Per-unit AP and Energy accounting.
//!
//! The ledger is plain bookkeeping: it never looks at other units. Cross-unit
//! effects (AP banking into autonomous pools, per-tick world updates) are
//! orchestrated by the engine, which applies them using the values the
//! ledger reports.

use arrayvec::ArrayVec;

use crate::env::Hand;
use crate::error::{ErrorSeverity, GameError};
use crate::stance::StanceKind;

/// A stance that costs Energy every tick while it stays raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyDrain {
    pub hand: Hand,
    pub stance: StanceKind,
    pub cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerError {
    #[error("not enough energy (needed {needed}, available {available})")]
    InsufficientEnergy { needed: u32, available: u32 },
}

impl GameError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEnergy { .. } => "LEDGER_INSUFFICIENT_ENERGY",
        }
    }
}

/// AP and Energy pools of one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLedger {
    ap: u32,
    pooled_ap: u32,
    until_next_tick: u32,
    max_ap: u32,
    energy: u32,
    max_energy: u32,
    /// One slot per hand.
    drains: ArrayVec<EnergyDrain, 2>,
}

impl ResourceLedger {
    pub fn new(max_ap: u32, max_energy: u32) -> Self {
        Self {
            ap: max_ap,
            pooled_ap: 0,
            until_next_tick: max_ap,
            max_ap,
            energy: max_energy,
            max_energy,
            drains: ArrayVec::new(),
        }
    }

    pub fn ap(&self) -> u32 {
        self.ap
    }

    pub fn pooled_ap(&self) -> u32 {
        self.pooled_ap
    }

    pub fn until_next_tick(&self) -> u32 {
        self.until_next_tick
    }

    pub fn max_ap(&self) -> u32 {
        self.max_ap
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn max_energy(&self) -> u32 {
        self.max_energy
    }

    pub fn drains(&self) -> &[EnergyDrain] {
        &self.drains
    }

    /// Debits AP, clamping at zero. Returns the amount actually removed.
    pub fn debit(&mut self, amount: u32) -> u32 {
        if amount > self.ap {
            tracing::warn!(
                requested = amount,
                available = self.ap,
                "AP debit exceeds balance, clamping to zero"
            );
        }
        let paid = amount.min(self.ap);
        self.ap -= paid;
        paid
    }

    /// Counts `amount` against the tick countdown and returns how many ticks
    /// fired.
    ///
    /// Every time the countdown is exhausted it is reset to the full AP
    /// budget and counting continues with the leftover, so spending
    /// `k * max_ap` in any chunking fires exactly `k` ticks.
    pub fn advance_tick_clock(&mut self, amount: u32) -> u32 {
        if self.max_ap == 0 {
            return 0;
        }
        let mut remaining = amount;
        let mut ticks = 0;
        while remaining >= self.until_next_tick {
            remaining -= self.until_next_tick;
            self.until_next_tick = self.max_ap;
            ticks += 1;
        }
        self.until_next_tick -= remaining;
        ticks
    }

    pub fn bank(&mut self, amount: u32) {
        self.pooled_ap = self.pooled_ap.saturating_add(amount);
    }

    /// Moves pooled AP into the current balance, never above `max_ap`.
    /// Returns the amount transferred.
    pub fn draw_from_pool(&mut self) -> u32 {
        let room = self.max_ap.saturating_sub(self.ap);
        let moved = room.min(self.pooled_ap);
        self.pooled_ap -= moved;
        self.ap += moved;
        moved
    }

    pub fn refill(&mut self) {
        self.ap = self.max_ap;
    }

    /// Drops all AP, used when a unit dies or forfeits its budget.
    pub fn drain_ap(&mut self) {
        self.ap = 0;
        self.pooled_ap = 0;
    }

    pub fn spend_energy(&mut self, amount: u32) -> Result<(), LedgerError> {
        if amount > self.energy {
            return Err(LedgerError::InsufficientEnergy {
                needed: amount,
                available: self.energy,
            });
        }
        self.energy -= amount;
        Ok(())
    }

    pub fn restore_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
    }

    /// Registers a drain, replacing any drain already attached to the hand.
    pub fn register_drain(&mut self, drain: EnergyDrain) {
        self.unregister_drain(drain.hand);
        // At most one drain per hand, so the second slot is always free here.
        let _ = self.drains.try_push(drain);
    }

    pub fn unregister_drain(&mut self, hand: Hand) -> Option<EnergyDrain> {
        let index = self.drains.iter().position(|drain| drain.hand == hand)?;
        Some(self.drains.remove(index))
    }

    pub fn clear_drains(&mut self) {
        self.drains.clear();
    }

    /// Charges every registered drain once.
    ///
    /// Drains the unit cannot afford are unregistered and returned so the
    /// caller can lower the matching stances; Energy never goes negative.
    pub fn upkeep(&mut self) -> ArrayVec<EnergyDrain, 2> {
        let mut cancelled = ArrayVec::new();
        let mut kept = ArrayVec::<EnergyDrain, 2>::new();
        for drain in self.drains.drain(..) {
            if drain.cost <= self.energy {
                self.energy -= drain.cost;
                kept.push(drain);
            } else {
                cancelled.push(drain);
            }
        }
        self.drains = kept;
        cancelled
    }
}

/// AP banked into a receiver when the human-controlled unit spends `amount`:
/// `round(amount / spender_max * receiver_max)`.
pub fn banking_share(amount: u32, spender_max: u32, receiver_max: u32) -> u32 {
    if spender_max == 0 {
        return 0;
    }
    ((amount as f64 / spender_max as f64) * receiver_max as f64).round() as u32
}
