#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulated host-server state for HUD Shield.
//!
//! The world stands in for the game engine the plugin is embedded in: a
//! roster of connected players, each with join-handshake status, a possible
//! game-world object, and the HUD/targeting state the engine mutators
//! expose. All mutation flows through [`apply`]; reads go through [`query`].

use hudshield_core::{Command, Event, HudSlot, HudSnapshot, PlayerId};

#[derive(Clone, Debug)]
struct Player {
    id: PlayerId,
    name: String,
    in_game: bool,
    has_avatar: bool,
    hud: HudSnapshot,
}

impl Player {
    fn connect(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            in_game: false,
            has_avatar: false,
            hud: HudSnapshot::default(),
        }
    }
}

/// Represents the authoritative host-server state.
#[derive(Clone, Debug, Default)]
pub struct World {
    players: Vec<Player>,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with no connected players.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.id == id)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// HUD and targeting mutations against an unknown player or a player without
/// a live game-world object are inert, mirroring an engine call against an
/// invalid handle.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConnectPlayer { id, name } => {
            if world.player(id).is_some() {
                return;
            }
            world.players.push(Player::connect(id, name.clone()));
            out_events.push(Event::PlayerJoined { id, name });
        }
        Command::EnterGame { id } => {
            if let Some(player) = world.player_mut(id) {
                if !player.in_game {
                    player.in_game = true;
                    out_events.push(Event::PlayerEntered { id });
                }
            }
        }
        Command::SpawnAvatar { id } => {
            if let Some(player) = world.player_mut(id) {
                if !player.has_avatar {
                    player.has_avatar = true;
                    out_events.push(Event::AvatarSpawned { id });
                }
            }
        }
        Command::DisconnectPlayer { id } => {
            if let Some(index) = world.player_index(id) {
                let _ = world.players.remove(index);
                out_events.push(Event::PlayerLeft { id });
            }
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SetHudColor {
            player,
            slot,
            color,
        } => {
            if let Some(entry) = world.player_mut(player) {
                if !entry.has_avatar {
                    return;
                }
                match slot {
                    HudSlot::Friendly => entry.hud.friendly = color,
                    HudSlot::Enemy => entry.hud.enemy = color,
                    HudSlot::Neutral => entry.hud.neutral = color,
                }
                out_events.push(Event::HudColorChanged {
                    player,
                    slot,
                    color,
                });
            }
        }
        Command::SetTargetingEnabled { player, enabled } => {
            if let Some(entry) = world.player_mut(player) {
                if !entry.has_avatar {
                    return;
                }
                entry.hud.targeting_enabled = enabled;
                out_events.push(Event::TargetingChanged { player, enabled });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use hudshield_core::{HudSnapshot, PlayerId, PlayerSnapshot, PlayerView};

    /// Captures a read-only view of every connected player.
    #[must_use]
    pub fn players(world: &World) -> PlayerView {
        PlayerView::from_snapshots(
            world
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id,
                    name: player.name.clone(),
                    in_game: player.in_game,
                    has_avatar: player.has_avatar,
                })
                .collect(),
        )
    }

    /// Retrieves the snapshot of a single connected player.
    #[must_use]
    pub fn player(world: &World, id: PlayerId) -> Option<PlayerSnapshot> {
        world.player(id).map(|player| PlayerSnapshot {
            id: player.id,
            name: player.name.clone(),
            in_game: player.in_game,
            has_avatar: player.has_avatar,
        })
    }

    /// Resolves a connected player's identifier from their exact name.
    #[must_use]
    pub fn player_id_by_name(world: &World, name: &str) -> Option<PlayerId> {
        world
            .players
            .iter()
            .find(|player| player.name == name)
            .map(|player| player.id)
    }

    /// Retrieves the HUD and targeting state of a connected player.
    #[must_use]
    pub fn hud(world: &World, id: PlayerId) -> Option<HudSnapshot> {
        world.player(id).map(|player| player.hud)
    }

    /// Index of the most recently completed tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
