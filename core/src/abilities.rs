//! Static catalog of unlockable abilities.
//!
//! Every ability describes its mechanics as an [`AbilityEffect`] value; the
//! world owns the single interpreter that turns effects into state changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Presentation tier of an ability. Has no mechanical meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Most frequently seen tier.
    Common,
    /// Second tier.
    Rare,
    /// Third tier.
    Epic,
    /// Highest tier.
    Legendary,
}

/// Scaling applied to the tick interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedFactor {
    /// Interval halved; the snake moves twice as often.
    Halve,
    /// Interval doubled; the snake moves half as often.
    Double,
}

impl SpeedFactor {
    /// Applies the factor to an interval.
    #[must_use]
    pub fn apply(self, interval: Duration) -> Duration {
        match self {
            Self::Halve => interval / 2,
            Self::Double => interval.saturating_mul(2),
        }
    }
}

/// Reach of the magnet attraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MagnetReach {
    /// Pulls the food when it is close to the head.
    Near,
    /// Pulls the food and every coin across the whole board.
    Board,
}

/// Mechanical effect applied when an ability is acquired or activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbilityEffect {
    /// Permanently rescales the base tick interval.
    ScaleTickInterval(SpeedFactor),
    /// Grants charges that turn out-of-bounds moves into tracked wraps.
    GrantPhaseShift {
        /// Charges granted.
        uses: u32,
    },
    /// Permanently multiplies the base score multiplier.
    MultiplyScore {
        /// Multiplication factor.
        factor: u32,
    },
    /// Raises a shield that absorbs one collision.
    GrantShield,
    /// Turns on magnet attraction.
    EnableMagnet(MagnetReach),
    /// Stops enemy snakes for a while.
    FreezeEnemies {
        /// How long enemies stay frozen.
        duration: Duration,
    },
    /// Extra segments appended whenever food is eaten.
    ExtraGrowth {
        /// Segments appended per food.
        segments: u32,
    },
    /// Adds a portal pair to every floor.
    EnablePortalCreation,
    /// Collisions do not kill for a while.
    Invincibility {
        /// How long invincibility lasts.
        duration: Duration,
    },
    /// Marks the snake as a vampire.
    EnableVampire,
    /// Marks the snake as spawning clones.
    EnableMultiShot,
}

/// Identity of every ability in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityId {
    /// Halves the base tick interval.
    SpeedBoost,
    /// Three tracked passes across the board edge.
    PhaseShift,
    /// Triples scoring.
    DoublePoints,
    /// Absorbs one collision.
    Shield,
    /// Doubles the base tick interval.
    TimeSlow,
    /// Pulls nearby food.
    Magnet,
    /// Freezes enemies on demand.
    Freeze,
    /// Five extra segments per food.
    ExplosiveGrowth,
    /// Portal pair on every floor.
    PortalMaster,
    /// Ten seconds of invincibility on demand.
    Invincible,
    /// Pulls food and coins from anywhere.
    MegaMagnet,
    /// Vampire flag.
    Vampire,
    /// Clone flag.
    MultiShot,
}

const PHASE_SHIFT_USES: u32 = 3;
const SHIELD_USES: u32 = 1;
const FREEZE_COOLDOWN: Duration = Duration::from_secs(10);
const INVINCIBLE_COOLDOWN: Duration = Duration::from_secs(20);

impl AbilityId {
    /// Complete catalog in presentation order.
    pub const ALL: [AbilityId; 13] = [
        Self::SpeedBoost,
        Self::PhaseShift,
        Self::DoublePoints,
        Self::Shield,
        Self::TimeSlow,
        Self::Magnet,
        Self::Freeze,
        Self::ExplosiveGrowth,
        Self::PortalMaster,
        Self::Invincible,
        Self::MegaMagnet,
        Self::Vampire,
        Self::MultiShot,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpeedBoost => "Speed Boost",
            Self::PhaseShift => "Phase Shift",
            Self::DoublePoints => "Point Burst",
            Self::Shield => "Shield",
            Self::TimeSlow => "Bullet Time",
            Self::Magnet => "Magnet",
            Self::Freeze => "Freeze",
            Self::ExplosiveGrowth => "Explosive Growth",
            Self::PortalMaster => "Portal Master",
            Self::Invincible => "Undying",
            Self::MegaMagnet => "Mega Magnet",
            Self::Vampire => "Vampire",
            Self::MultiShot => "Multi Shot",
        }
    }

    /// One-line description for a selection UI.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SpeedBoost => "Move twice as often",
            Self::PhaseShift => "Slip across the board edge 3 times",
            Self::DoublePoints => "Score x3",
            Self::Shield => "Survive one collision",
            Self::TimeSlow => "Move half as often",
            Self::Magnet => "Pull nearby food toward you",
            Self::Freeze => "Freeze enemy snakes for 3 seconds",
            Self::ExplosiveGrowth => "Grow 5 extra segments per food",
            Self::PortalMaster => "A portal pair appears on every floor",
            Self::Invincible => "10 seconds of invincibility",
            Self::MegaMagnet => "Pull all food and coins from anywhere",
            Self::Vampire => "Feed on walls and obstacles",
            Self::MultiShot => "Each food spawns two clones",
        }
    }

    /// Presentation tier.
    #[must_use]
    pub const fn rarity(self) -> Rarity {
        match self {
            Self::SpeedBoost | Self::TimeSlow => Rarity::Common,
            Self::PhaseShift | Self::DoublePoints | Self::Freeze => Rarity::Rare,
            Self::Shield | Self::Magnet | Self::ExplosiveGrowth | Self::MegaMagnet => Rarity::Epic,
            Self::PortalMaster | Self::Invincible | Self::Vampire | Self::MultiShot => {
                Rarity::Legendary
            }
        }
    }

    /// Charges granted on acquisition, for uses-limited abilities.
    #[must_use]
    pub const fn uses(self) -> Option<u32> {
        match self {
            Self::PhaseShift => Some(PHASE_SHIFT_USES),
            Self::Shield => Some(SHIELD_USES),
            _ => None,
        }
    }

    /// Time between activations, for abilities the player can re-trigger.
    #[must_use]
    pub const fn cooldown(self) -> Option<Duration> {
        match self {
            Self::Freeze => Some(FREEZE_COOLDOWN),
            Self::Invincible => Some(INVINCIBLE_COOLDOWN),
            _ => None,
        }
    }

    /// Mechanical effect of the ability.
    #[must_use]
    pub const fn effect(self) -> AbilityEffect {
        match self {
            Self::SpeedBoost => AbilityEffect::ScaleTickInterval(SpeedFactor::Halve),
            Self::PhaseShift => AbilityEffect::GrantPhaseShift {
                uses: PHASE_SHIFT_USES,
            },
            Self::DoublePoints => AbilityEffect::MultiplyScore { factor: 3 },
            Self::Shield => AbilityEffect::GrantShield,
            Self::TimeSlow => AbilityEffect::ScaleTickInterval(SpeedFactor::Double),
            Self::Magnet => AbilityEffect::EnableMagnet(MagnetReach::Near),
            Self::Freeze => AbilityEffect::FreezeEnemies {
                duration: Duration::from_secs(3),
            },
            Self::ExplosiveGrowth => AbilityEffect::ExtraGrowth { segments: 5 },
            Self::PortalMaster => AbilityEffect::EnablePortalCreation,
            Self::Invincible => AbilityEffect::Invincibility {
                duration: Duration::from_secs(10),
            },
            Self::MegaMagnet => AbilityEffect::EnableMagnet(MagnetReach::Board),
            Self::Vampire => AbilityEffect::EnableVampire,
            Self::MultiShot => AbilityEffect::EnableMultiShot,
        }
    }
}
