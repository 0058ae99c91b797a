//! AP spending, ticks and death.
//!
//! AP banking is the only effect one unit's spending has on another: when
//! the human-controlled unit spends AP every living autonomous unit banks a
//! proportional share into its pool, drawn at the start of its next turn.

use crate::env::Env;
use crate::event::WorldEvent;
use crate::ledger::banking_share;
use crate::state::UnitId;

use super::GameEngine;

impl<'a> GameEngine<'a> {
    /// Spends `amount` AP of `actor` and fires the ticks it crosses.
    ///
    /// Overdrafts are clamped to the balance. Returns the number of ticks
    /// fired.
    pub fn use_ap(&mut self, actor: UnitId, amount: u32, env: &mut Env<'_>) -> u32 {
        if amount == 0 {
            return 0;
        }
        let Some(unit) = self.world.unit_mut(actor) else {
            return 0;
        };
        let paid = unit.ledger.debit(amount);
        let ticks = unit.ledger.advance_tick_clock(paid);
        let spender_max = unit.ledger.max_ap();

        if unit.is_human() {
            self.bank_share(actor, paid, spender_max);
        }
        for _ in 0..ticks {
            self.on_tick(actor, env);
        }
        ticks
    }

    /// Computes every receiver's share first, then credits them all, so a
    /// single spend is applied as one unit.
    fn bank_share(&mut self, spender: UnitId, amount: u32, spender_max: u32) {
        let shares: Vec<(UnitId, u32)> = self
            .world
            .alive()
            .filter(|unit| unit.id != spender && !unit.is_human())
            .map(|unit| {
                let share = banking_share(amount, spender_max, unit.ledger.max_ap());
                (unit.id, share)
            })
            .collect();

        for (id, share) in shares {
            if let Some(unit) = self.world.unit_mut(id) {
                unit.ledger.bank(share);
            }
        }
    }

    /// Stance upkeep and Energy regen for the ticking unit, vision for all.
    fn on_tick(&mut self, actor: UnitId, env: &mut Env<'_>) {
        self.world.turn.ticks += 1;
        let tick = self.world.turn.ticks;
        let regen = env.config.ap.energy_regen_per_tick;

        if let Some(unit) = self.world.unit_mut(actor) {
            let cancelled = unit.ledger.upkeep();
            let lowered: Vec<_> = cancelled
                .into_iter()
                .filter_map(|drain| {
                    unit.stances
                        .forget(drain.hand)
                        .map(|stance| (drain.hand, stance))
                })
                .collect();
            unit.ledger.restore_energy(regen);

            for (hand, stance) in lowered {
                tracing::debug!(unit = %actor, %hand, %stance, "stance dropped, upkeep unaffordable");
                self.emit(
                    env,
                    WorldEvent::StanceLowered {
                        unit: actor,
                        hand,
                        stance,
                        forced: true,
                    },
                );
            }
        }

        self.refresh_vision(env);
        tracing::trace!(unit = %actor, tick, "tick");
        self.emit(env, WorldEvent::Tick { unit: actor, tick });
    }

    /// Recomputes every living unit's known enemies and reports newcomers.
    pub(super) fn refresh_vision(&mut self, env: &mut Env<'_>) {
        let range = env.config.perception.vision_range;
        let ids: Vec<UnitId> = self.world.alive().map(|unit| unit.id).collect();

        for id in ids {
            let seen = self.world.hostiles_near(id, range);
            let Some(unit) = self.world.unit_mut(id) else {
                continue;
            };
            let spotted: Vec<UnitId> = seen
                .iter()
                .copied()
                .filter(|enemy| !unit.known_enemies.contains(enemy))
                .collect();
            unit.known_enemies = seen;
            for enemy in spotted {
                self.emit(env, WorldEvent::EnemySpotted { unit: id, enemy });
            }
        }
    }

    /// Marks `unit` dead: its queue, stances and AP are dropped and it is
    /// never scheduled again.
    pub fn kill(&mut self, unit: UnitId, killer: Option<UnitId>, env: &mut Env<'_>) {
        let Some(victim) = self.world.unit_mut(unit) else {
            return;
        };
        if !victim.alive {
            return;
        }
        victim.kill();
        victim.queue.clear();
        victim.stances.lower_all(&mut victim.ledger);
        victim.ledger.clear_drains();
        victim.ledger.drain_ap();
        victim.known_enemies.clear();

        tracing::info!(%unit, killer = ?killer, "unit died");
        self.emit(env, WorldEvent::UnitDied { unit, killer });
    }
}
