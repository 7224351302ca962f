//! Ledger of timed effects measured on the simulated clock.
//!
//! Each transient modifier is an independent entry. The effective tick
//! interval and score multiplier are recomputed from the permanent base values
//! and whatever entries are live, so overlapping effects expire independently.

use std::time::Duration;

use snake_floors_core::{SpeedFactor, TimedEffect};

const SCORE_FRENZY_FACTOR: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveEffect {
    effect: TimedEffect,
    expires_at: Duration,
}

/// Scheduled expirations of every live timed effect.
#[derive(Debug, Default)]
pub(crate) struct EffectLedger {
    entries: Vec<ActiveEffect>,
}

impl EffectLedger {
    /// Installs `effect` until `now + duration`.
    pub(crate) fn schedule(&mut self, effect: TimedEffect, now: Duration, duration: Duration) {
        self.entries.push(ActiveEffect {
            effect,
            expires_at: now.saturating_add(duration),
        });
    }

    /// Drops every entry whose expiry is not after `now`, reporting them in scheduling order.
    pub(crate) fn expire(&mut self, now: Duration) -> Vec<TimedEffect> {
        let (expired, live): (Vec<ActiveEffect>, Vec<ActiveEffect>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.expires_at <= now);
        self.entries = live;
        expired.into_iter().map(|entry| entry.effect).collect()
    }

    /// Reports whether at least one entry of `effect` is live.
    pub(crate) fn is_active(&self, effect: TimedEffect) -> bool {
        self.entries.iter().any(|entry| entry.effect == effect)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Applies every live haste and slow entry to `base`.
    pub(crate) fn scale_interval(&self, base: Duration) -> Duration {
        self.entries
            .iter()
            .fold(base, |interval, entry| match entry.effect {
                TimedEffect::Haste => SpeedFactor::Halve.apply(interval),
                TimedEffect::Slow => SpeedFactor::Double.apply(interval),
                _ => interval,
            })
    }

    /// Applies every live score frenzy entry to `base`.
    pub(crate) fn scale_multiplier(&self, base: u64) -> u64 {
        self.entries
            .iter()
            .filter(|entry| entry.effect == TimedEffect::ScoreFrenzy)
            .fold(base, |multiplier, _| {
                multiplier.saturating_mul(SCORE_FRENZY_FACTOR)
            })
    }
}
