//! Held abilities, cooldown bookkeeping and the ability effect interpreter.

use std::time::Duration;

use snake_floors_core::{
    AbilityEffect, AbilityId, AbilitySnapshot, Event, MagnetReach, SessionPhase, TimedEffect,
};
use tracing::debug;

use crate::{World, MIN_EFFECTIVE_INTERVAL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeldAbility {
    id: AbilityId,
    ready_at: Option<Duration>,
}

/// Abilities held during the run, in acquisition order.
#[derive(Debug, Default)]
pub(crate) struct AbilityLedger {
    held: Vec<HeldAbility>,
}

impl AbilityLedger {
    pub(crate) fn holds(&self, id: AbilityId) -> bool {
        self.held.iter().any(|ability| ability.id == id)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.held.iter().map(|ability| ability.id)
    }

    pub(crate) fn len(&self) -> usize {
        self.held.len()
    }

    pub(crate) fn clear(&mut self) {
        self.held.clear();
    }

    /// Records `id`; cooldown abilities start cooling down at `now`.
    fn push(&mut self, id: AbilityId, now: Duration) {
        self.held.push(HeldAbility {
            id,
            ready_at: id.cooldown().map(|cooldown| now.saturating_add(cooldown)),
        });
    }

    /// First held cooldown ability whose cooldown has elapsed.
    fn first_ready(&self, now: Duration) -> Option<AbilityId> {
        self.held
            .iter()
            .find(|ability| ability.ready_at.is_some_and(|ready_at| ready_at <= now))
            .map(|ability| ability.id)
    }

    fn restart_cooldown(&mut self, id: AbilityId, ready_at: Duration) {
        if let Some(ability) = self.held.iter_mut().find(|ability| ability.id == id) {
            ability.ready_at = Some(ready_at);
        }
    }
}

/// Persistent flags and counters granted by abilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Status {
    pub(crate) shield: bool,
    pub(crate) phase_shift_uses: u32,
    pub(crate) magnet: Option<MagnetReach>,
    pub(crate) extra_growth: u32,
    pub(crate) portal_master: bool,
    pub(crate) vampire: bool,
    pub(crate) multi_shot: bool,
}

impl World {
    /// Adds `ability` to the held set and applies its effect once.
    pub(crate) fn acquire_ability(&mut self, ability: AbilityId, out_events: &mut Vec<Event>) {
        self.abilities.push(ability, self.clock);
        debug!(?ability, "ability acquired");
        out_events.push(Event::AbilityAcquired { ability });
        self.apply_ability_effect(ability.effect());
    }

    /// Fires the first held cooldown ability that is ready, if any.
    pub(crate) fn activate_special(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let Some(ability) = self.abilities.first_ready(self.clock) else {
            return;
        };
        let Some(cooldown) = ability.cooldown() else {
            return;
        };
        self.abilities
            .restart_cooldown(ability, self.clock.saturating_add(cooldown));
        self.apply_ability_effect(ability.effect());
        debug!(?ability, "ability activated");
        out_events.push(Event::AbilityActivated { ability, cooldown });
    }

    /// Interprets a single ability effect against the session state.
    pub(crate) fn apply_ability_effect(&mut self, effect: AbilityEffect) {
        match effect {
            AbilityEffect::ScaleTickInterval(factor) => {
                self.base_tick_interval = factor
                    .apply(self.base_tick_interval)
                    .max(MIN_EFFECTIVE_INTERVAL);
            }
            AbilityEffect::GrantPhaseShift { uses } => {
                self.status.phase_shift_uses = self.status.phase_shift_uses.saturating_add(uses);
            }
            AbilityEffect::MultiplyScore { factor } => {
                self.base_multiplier = self.base_multiplier.saturating_mul(u64::from(factor));
            }
            AbilityEffect::GrantShield => self.status.shield = true,
            AbilityEffect::EnableMagnet(reach) => {
                self.status.magnet = self.status.magnet.max(Some(reach));
            }
            AbilityEffect::FreezeEnemies { duration } => {
                self.effects
                    .schedule(TimedEffect::Freeze, self.clock, duration);
            }
            AbilityEffect::ExtraGrowth { segments } => {
                self.status.extra_growth = self.status.extra_growth.saturating_add(segments);
            }
            AbilityEffect::EnablePortalCreation => {
                self.status.portal_master = true;
                if self.portals.is_empty() {
                    let _ = self.place_portal_pair();
                }
            }
            AbilityEffect::Invincibility { duration } => {
                self.effects
                    .schedule(TimedEffect::Invincibility, self.clock, duration);
            }
            AbilityEffect::EnableVampire => self.status.vampire = true,
            AbilityEffect::EnableMultiShot => self.status.multi_shot = true,
        }
    }

    /// Describes the held abilities for renderers and systems.
    pub(crate) fn ability_snapshots(&self) -> Vec<AbilitySnapshot> {
        self.abilities
            .held
            .iter()
            .map(|ability| AbilitySnapshot {
                id: ability.id,
                uses_remaining: ability
                    .id
                    .uses()
                    .map(|granted| self.charges_left(ability.id.effect(), granted)),
                cooldown_remaining: ability
                    .ready_at
                    .map(|ready_at| ready_at.saturating_sub(self.clock)),
            })
            .collect()
    }

    fn charges_left(&self, effect: AbilityEffect, granted: u32) -> u32 {
        match effect {
            AbilityEffect::GrantPhaseShift { .. } => self.status.phase_shift_uses,
            AbilityEffect::GrantShield => u32::from(self.status.shield),
            _ => granted,
        }
    }
}
