#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deferred-application queue for players that joined but are not yet fully
//! present in the game world.
//!
//! Mutating HUD state before a player owns a live game-world object is
//! meaningless, so newly joined players wait here until a per-tick poll
//! observes both the completed join handshake and a spawned avatar. Each
//! player transitions out of the queue exactly once per join.

use hudshield_core::{PlayerId, PlayerView};

/// Ordered collection of players awaiting their one-shot mitigation.
#[derive(Clone, Debug, Default)]
pub struct WaitingPlayers {
    queue: Vec<PlayerId>,
}

impl WaitingPlayers {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a player to the tail of the queue.
    ///
    /// A player already queued is not enqueued again, so the queue holds a
    /// given player at most once.
    pub fn enqueue(&mut self, id: PlayerId) {
        if !self.queue.contains(&id) {
            self.queue.push(id);
        }
    }

    /// Enqueues every player currently in the view, in identifier order.
    ///
    /// Called at level start so players who connected during the load are
    /// picked up alongside future joiners.
    pub fn seed(&mut self, players: &PlayerView) {
        for snapshot in players.iter() {
            self.enqueue(snapshot.id);
        }
    }

    /// Scans the queue once against the current player view.
    ///
    /// Players that disconnected are dropped silently; players that became
    /// fully present are removed and appended to `ready`. Everyone else
    /// remains queued for the next tick. Removal is index-based so the scan
    /// stays valid mid-pass, and every eligible player resolves within the
    /// one call regardless of queue order.
    pub fn poll(&mut self, players: &PlayerView, ready: &mut Vec<PlayerId>) {
        let mut index = 0;
        while index < self.queue.len() {
            let id = self.queue[index];
            match players.get(id) {
                None => {
                    let _ = self.queue.remove(index);
                }
                Some(snapshot) if snapshot.is_ready() => {
                    ready.push(id);
                    let _ = self.queue.remove(index);
                }
                Some(_) => index += 1,
            }
        }
    }

    /// Discards all waiting players without applying mitigation.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Reports whether the provided player is currently waiting.
    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.queue.contains(&id)
    }

    /// Number of players currently waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether no players are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
