#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure policy table mapping a severity level to HUD mutation commands.
//!
//! Each defined level selects exactly one category of mutation; codes that
//! name no defined level emit nothing, so a corrupt stored exception degrades
//! to "mitigation not applied" rather than an error.

use hudshield_core::{
    Command, HudSlot, LevelCode, PlayerId, Rgb, SeverityLevel, COLOR_ENEMY, COLOR_FRIENDLY,
    COLOR_NEUTRAL,
};
use rand::Rng;

/// Color-jitter range for the passive level, expressed in the 0-255 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    min: f32,
    max: f32,
}

impl Thresholds {
    /// Largest permitted lower bound for the jitter range.
    ///
    /// A channel at byte value `b` can absorb an offset of at most
    /// `max(b, 255 - b)`, which bottoms out at half the byte range. Keeping
    /// `min` at or below that floor means magnitudes near `min` fit every
    /// channel, so the redraw loop in [`Policy::apply`] always has a
    /// feasible draw to land on.
    pub const MIN_CEILING: f32 = 255.0 / 2.0;

    /// Creates a validated jitter range.
    ///
    /// Returns `None` unless `0 <= min <= max <= 255` and
    /// `min <= `[`Thresholds::MIN_CEILING`]; anything looser could leave the
    /// rejection loop in [`Policy::apply`] without a valid draw for some
    /// channel.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Option<Self> {
        if (0.0..=Self::MIN_CEILING).contains(&min) && (0.0..=255.0).contains(&max) && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Smallest jitter magnitude that may be drawn.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Largest jitter magnitude that may be drawn.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min: 20.0,
            max: 80.0,
        }
    }
}

/// Pure system that translates an effective severity level into engine
/// mutation commands for a single player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Policy {
    thresholds: Thresholds,
}

impl Policy {
    /// Creates a policy table using the provided jitter range.
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Jitter range currently in effect for the passive level.
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Emits the mutation commands for applying `code` to `player`.
    ///
    /// `Off` and undefined codes emit nothing.
    pub fn apply<R: Rng>(
        &self,
        player: PlayerId,
        code: LevelCode,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        match SeverityLevel::from_code(code) {
            Some(SeverityLevel::Aggressive) => {
                out.push(Command::SetTargetingEnabled {
                    player,
                    enabled: false,
                });
            }
            Some(SeverityLevel::High) => {
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Friendly,
                    color: COLOR_ENEMY,
                });
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Neutral,
                    color: COLOR_ENEMY,
                });
            }
            Some(SeverityLevel::Medium) => {
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Friendly,
                    color: COLOR_NEUTRAL,
                });
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Enemy,
                    color: COLOR_NEUTRAL,
                });
            }
            Some(SeverityLevel::Low) => {
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Enemy,
                    color: COLOR_FRIENDLY,
                });
            }
            Some(SeverityLevel::Passive) => {
                let color = self.jitter(COLOR_ENEMY, rng);
                out.push(Command::SetHudColor {
                    player,
                    slot: HudSlot::Enemy,
                    color,
                });
            }
            Some(SeverityLevel::Off) | None => {}
        }
    }

    /// Perturbs each channel of `base` by an independent random offset drawn
    /// from the configured range, defeating pixel-exact color matching while
    /// staying imperceptible to a human.
    fn jitter<R: Rng>(&self, base: Rgb, rng: &mut R) -> Rgb {
        Rgb::new(
            self.jitter_channel(base.red(), rng),
            self.jitter_channel(base.green(), rng),
            self.jitter_channel(base.blue(), rng),
        )
    }

    fn jitter_channel<R: Rng>(&self, base: f32, rng: &mut R) -> f32 {
        let base_byte = base * 255.0;
        loop {
            let magnitude = rng.gen_range(self.thresholds.min..=self.thresholds.max);
            let raise_fits = base_byte + magnitude <= 255.0;
            let lower_fits = base_byte - magnitude >= 0.0;
            let offset = match (raise_fits, lower_fits) {
                (true, true) => {
                    if rng.gen_bool(0.5) {
                        magnitude
                    } else {
                        -magnitude
                    }
                }
                (true, false) => magnitude,
                (false, true) => -magnitude,
                // Magnitude exceeds the headroom on both sides; redraw.
                // Thresholds validation keeps min at or below the smallest
                // headroom any channel can have, so a feasible draw exists.
                (false, false) => continue,
            };
            return (base_byte + offset).abs() / 255.0;
        }
    }
}

/// Emits the commands restoring engine defaults for targeting and all three
/// HUD colors, so a changed policy never leaves stale mutations behind.
pub fn reset(player: PlayerId, out: &mut Vec<Command>) {
    out.push(Command::SetTargetingEnabled {
        player,
        enabled: true,
    });
    out.push(Command::SetHudColor {
        player,
        slot: HudSlot::Friendly,
        color: COLOR_FRIENDLY,
    });
    out.push(Command::SetHudColor {
        player,
        slot: HudSlot::Enemy,
        color: COLOR_ENEMY,
    });
    out.push(Command::SetHudColor {
        player,
        slot: HudSlot::Neutral,
        color: COLOR_NEUTRAL,
    });
}
