#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the HUD Shield crates.
//!
//! This crate defines the message surface that connects the simulated host
//! server, the mitigation systems, and the console adapter. Adapters and the
//! plugin controller submit [`Command`] values describing desired mutations,
//! the world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values describing what actually changed. Systems
//! consume immutable snapshots and respond exclusively with new command
//! batches.

use serde::{Deserialize, Serialize};

/// Canonical enemy reticle color shipped with the stock HUD (200, 0, 0).
pub const COLOR_ENEMY: Rgb = Rgb::from_bytes(200, 0, 0);

/// Canonical friendly reticle color shipped with the stock HUD (0, 225, 0).
pub const COLOR_FRIENDLY: Rgb = Rgb::from_bytes(0, 225, 0);

/// Canonical neutral reticle color shipped with the stock HUD (125, 150, 125).
pub const COLOR_NEUTRAL: Rgb = Rgb::from_bytes(125, 150, 125);

/// Unique identifier the host server assigns to a connected player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(i32);

impl PlayerId {
    /// Creates a new player identifier from the host-assigned integer.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Normalized RGB color as consumed by the host HUD mutators.
///
/// Channels live in the `0.0..=1.0` range; the engine-facing API never sees
/// byte values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    red: f32,
    green: f32,
    blue: f32,
}

impl Rgb {
    /// Creates a color from normalized floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from byte channels in the 0-255 scale.
    #[must_use]
    pub const fn from_bytes(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Normalized red channel.
    #[must_use]
    pub const fn red(&self) -> f32 {
        self.red
    }

    /// Normalized green channel.
    #[must_use]
    pub const fn green(&self) -> f32 {
        self.green
    }

    /// Normalized blue channel.
    #[must_use]
    pub const fn blue(&self) -> f32 {
        self.blue
    }
}

/// Raw numeric severity level as stored in exception files and parsed from
/// console arguments.
///
/// A code may name a value outside the defined [`SeverityLevel`] range; such
/// codes are carried verbatim and fall through the policy table as no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelCode(i64);

impl LevelCode {
    /// Wraps a raw numeric level.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Raw integer value of the code.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Reports whether the code names one of the defined severity levels.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        0 <= self.0 && self.0 < SeverityLevel::COUNT as i64
    }
}

/// Mitigation strength applied to a player, ordered from no mitigation to
/// most aggressive.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    /// No mutation is performed.
    #[default]
    Off,
    /// The enemy color is perturbed by an imperceptible per-player offset.
    Passive,
    /// The enemy color is replaced with the friendly color.
    Low,
    /// Friendly and enemy colors are both replaced with the neutral color.
    Medium,
    /// Friendly and neutral colors are both replaced with the enemy color.
    High,
    /// Global hostile targeting is disabled for the player.
    Aggressive,
}

impl SeverityLevel {
    /// Number of defined levels; also the exclusive upper bound for valid
    /// numeric codes.
    pub const COUNT: usize = 6;

    /// All defined levels in ascending order of strength.
    pub const ALL: [SeverityLevel; SeverityLevel::COUNT] = [
        SeverityLevel::Off,
        SeverityLevel::Passive,
        SeverityLevel::Low,
        SeverityLevel::Medium,
        SeverityLevel::High,
        SeverityLevel::Aggressive,
    ];

    /// Parses a level from its configuration name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        SeverityLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
    }

    /// Resolves a numeric code to a defined level, if it names one.
    #[must_use]
    pub fn from_code(code: LevelCode) -> Option<Self> {
        match code.get() {
            0 => Some(SeverityLevel::Off),
            1 => Some(SeverityLevel::Passive),
            2 => Some(SeverityLevel::Low),
            3 => Some(SeverityLevel::Medium),
            4 => Some(SeverityLevel::High),
            5 => Some(SeverityLevel::Aggressive),
            _ => None,
        }
    }

    /// Numeric code under which the level is stored and transported.
    #[must_use]
    pub const fn code(&self) -> LevelCode {
        LevelCode::new(*self as i64)
    }

    /// Configuration name of the level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SeverityLevel::Off => "Off",
            SeverityLevel::Passive => "Passive",
            SeverityLevel::Low => "Low",
            SeverityLevel::Medium => "Medium",
            SeverityLevel::High => "High",
            SeverityLevel::Aggressive => "Aggressive",
        }
    }
}

/// HUD color slot addressed by a mutation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HudSlot {
    /// Reticle color shown over friendly entities.
    Friendly,
    /// Reticle color shown over hostile entities.
    Enemy,
    /// Reticle color shown over neutral entities.
    Neutral,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a newly connected player in the roster.
    ConnectPlayer {
        /// Identifier assigned by the host.
        id: PlayerId,
        /// Case-sensitive player name used as the natural key.
        name: String,
    },
    /// Marks a connected player as having completed the join handshake.
    EnterGame {
        /// Identifier of the player that entered the game.
        id: PlayerId,
    },
    /// Grants a connected player a live game-world object.
    SpawnAvatar {
        /// Identifier of the player receiving an avatar.
        id: PlayerId,
    },
    /// Removes a player from the roster.
    DisconnectPlayer {
        /// Identifier of the departing player.
        id: PlayerId,
    },
    /// Advances the simulation by one server tick.
    Tick,
    /// Replaces one of a player's HUD reticle colors.
    SetHudColor {
        /// Player whose HUD is mutated.
        player: PlayerId,
        /// Slot receiving the new color.
        slot: HudSlot,
        /// Normalized replacement color.
        color: Rgb,
    },
    /// Enables or disables global hostile targeting for a player.
    SetTargetingEnabled {
        /// Player whose targeting capability is mutated.
        player: PlayerId,
        /// Whether targeting remains available.
        enabled: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A player connected and was added to the roster.
    PlayerJoined {
        /// Identifier of the new player.
        id: PlayerId,
        /// Name the player connected under.
        name: String,
    },
    /// A player completed the join handshake.
    PlayerEntered {
        /// Identifier of the player now in game.
        id: PlayerId,
    },
    /// A player received a live game-world object.
    AvatarSpawned {
        /// Identifier of the player that spawned.
        id: PlayerId,
    },
    /// A player disconnected and left the roster.
    PlayerLeft {
        /// Identifier of the departed player.
        id: PlayerId,
    },
    /// The simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// One of a player's HUD colors changed.
    HudColorChanged {
        /// Player whose HUD changed.
        player: PlayerId,
        /// Slot that received the new color.
        slot: HudSlot,
        /// Color now occupying the slot.
        color: Rgb,
    },
    /// A player's targeting capability changed.
    TargetingChanged {
        /// Player whose targeting capability changed.
        player: PlayerId,
        /// Whether targeting is now available.
        enabled: bool,
    },
}

/// Immutable representation of a single connected player used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identifier assigned by the host.
    pub id: PlayerId,
    /// Case-sensitive player name.
    pub name: String,
    /// Whether the player completed the join handshake.
    pub in_game: bool,
    /// Whether the player owns a live game-world object.
    pub has_avatar: bool,
}

impl PlayerSnapshot {
    /// Reports whether mitigation can meaningfully be applied to the player.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.in_game && self.has_avatar
    }
}

/// Read-only snapshot describing all connected players.
#[derive(Clone, Debug, Default)]
pub struct PlayerView {
    snapshots: Vec<PlayerSnapshot>,
}

impl PlayerView {
    /// Creates a view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlayerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Looks up the snapshot for the provided identifier.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Iterator over the captured snapshots in identifier order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of connected players in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a player's HUD and targeting state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Whether global hostile targeting is available to the player.
    pub targeting_enabled: bool,
    /// Reticle color currently shown over friendly entities.
    pub friendly: Rgb,
    /// Reticle color currently shown over hostile entities.
    pub enemy: Rgb,
    /// Reticle color currently shown over neutral entities.
    pub neutral: Rgb,
}

impl Default for HudSnapshot {
    fn default() -> Self {
        Self {
            targeting_enabled: true,
            friendly: COLOR_FRIENDLY,
            enemy: COLOR_ENEMY,
            neutral: COLOR_NEUTRAL,
        }
    }
}
