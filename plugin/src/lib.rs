#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifecycle controller that wires the mitigation systems to host events.
//!
//! The controller owns all level-scoped state: the global severity level and
//! jitter thresholds from the settings file, the per-player exception store,
//! and the queue of players awaiting their one-shot mitigation. Host
//! callbacks drive every transition; the controller never acts on its own
//! clock. Mutations are returned as command batches for the caller to apply
//! to the world, keeping the controller free of engine side effects.

pub mod exceptions;
mod settings;

use std::path::{Path, PathBuf};

use hudshield_core::{Command, LevelCode, PlayerId, SeverityLevel};
use hudshield_system_policy::{reset, Policy, Thresholds};
use hudshield_system_readiness::WaitingPlayers;
use hudshield_world::{query, World};
use ini::Ini;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use exceptions::{coerce_level, ExceptionStore, StoreError};

/// Factory entry point the host loader calls to obtain the plugin instance.
#[must_use]
pub fn init(exceptions_path: impl Into<PathBuf>) -> MitigationPlugin {
    MitigationPlugin::new(exceptions_path)
}

/// Runtime behavior-modification plugin countering triggerbot cheats.
#[derive(Debug)]
pub struct MitigationPlugin {
    level: SeverityLevel,
    policy: Policy,
    exceptions: ExceptionStore,
    waiting: WaitingPlayers,
    exceptions_path: PathBuf,
    level_loaded: bool,
    rng: ChaCha8Rng,
}

impl MitigationPlugin {
    /// Creates the plugin with defaults: level `Off`, thresholds 20-80, an
    /// empty exception store, and an entropy-seeded jitter generator.
    #[must_use]
    pub fn new(exceptions_path: impl Into<PathBuf>) -> Self {
        Self::with_rng(exceptions_path, ChaCha8Rng::from_entropy())
    }

    /// Creates the plugin with a fixed jitter seed for deterministic runs.
    #[must_use]
    pub fn with_seed(exceptions_path: impl Into<PathBuf>, seed: u64) -> Self {
        Self::with_rng(exceptions_path, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(exceptions_path: impl Into<PathBuf>, rng: ChaCha8Rng) -> Self {
        Self {
            level: SeverityLevel::Off,
            policy: Policy::default(),
            exceptions: ExceptionStore::new(),
            waiting: WaitingPlayers::new(),
            exceptions_path: exceptions_path.into(),
            level_loaded: false,
            rng,
        }
    }

    /// Ingests the host settings file and reloads the exception store.
    ///
    /// Unrecognized level names and malformed threshold ranges are logged
    /// and leave the prior configuration in place. The exception file is
    /// read only if it exists; a missing file is not an error.
    pub fn on_settings_load(&mut self, file: &Ini) {
        let update = settings::read(file);
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(thresholds) = update.thresholds {
            self.policy = Policy::new(thresholds);
        }

        if self.exceptions_path.exists() {
            if let Err(error) = self.exceptions.load(&self.exceptions_path) {
                tracing::warn!(%error, path = %self.exceptions_path.display(), "exception file not loaded");
            }
        }

        tracing::info!(
            level = self.level.name(),
            exceptions = self.exceptions.len(),
            "settings loaded"
        );
    }

    /// Marks the level as live and queues every already-connected player.
    pub fn on_level_load(&mut self, world: &World) {
        self.level_loaded = true;
        self.waiting.seed(&query::players(world));
        tracing::debug!(waiting = self.waiting.len(), "level loaded");
    }

    /// Queues a newly joined player for mitigation once they are fully
    /// present in the game world.
    pub fn on_player_join(&mut self, world: &World, id: PlayerId) {
        if query::player(world, id).is_some() {
            self.waiting.enqueue(id);
        }
    }

    /// Advances the readiness queue by one poll and returns the mitigation
    /// commands for every player that became fully present this tick.
    pub fn on_think(&mut self, world: &World) -> Vec<Command> {
        let view = query::players(world);
        let mut ready = Vec::new();
        self.waiting.poll(&view, &mut ready);

        let mut commands = Vec::new();
        for id in ready {
            let Some(snapshot) = view.get(id) else {
                continue;
            };
            let code = self.effective_level(&snapshot.name);
            tracing::debug!(player = %snapshot.name, code = code.get(), "applying mitigation");
            self.policy.apply(id, code, &mut self.rng, &mut commands);
        }
        commands
    }

    /// Tears down level-scoped state: defaults restored, exception store and
    /// readiness queue cleared.
    ///
    /// The store is not flushed here; persistence is only ever explicit.
    pub fn on_map_unload(&mut self) {
        self.level = SeverityLevel::Off;
        self.policy = Policy::default();
        self.exceptions.clear();
        self.waiting.clear();
        self.level_loaded = false;
        tracing::debug!("map unloaded, configuration reset");
    }

    /// Inserts or overwrites an exception and, when the player is connected,
    /// returns the reset-then-apply batch that makes it effective at once.
    pub fn add_exception(&mut self, world: &World, name: &str, code: LevelCode) -> Vec<Command> {
        self.exceptions.set(name, code);
        tracing::info!(player = name, code = code.get(), "exception added");
        self.reapply(world, name)
    }

    /// Removes an exception and, when the player is connected, returns the
    /// batch that reverts them to the global level at once.
    pub fn remove_exception(&mut self, world: &World, name: &str) -> Vec<Command> {
        self.exceptions.remove(name);
        tracing::info!(player = name, "exception removed");
        self.reapply(world, name)
    }

    fn reapply(&mut self, world: &World, name: &str) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(id) = query::player_id_by_name(world, name) {
            reset(id, &mut commands);
            let code = self.effective_level(name);
            self.policy.apply(id, code, &mut self.rng, &mut commands);
        }
        commands
    }

    /// Persists the exception store to its backing file.
    pub fn flush_exceptions(&self) -> Result<(), StoreError> {
        self.exceptions.flush(&self.exceptions_path)
    }

    /// Level actually applied to the named player: their exception if one
    /// exists, otherwise the global level.
    #[must_use]
    pub fn effective_level(&self, name: &str) -> LevelCode {
        self.exceptions.get(name).unwrap_or(self.level.code())
    }

    /// Currently configured global severity level.
    #[must_use]
    pub fn global_level(&self) -> SeverityLevel {
        self.level
    }

    /// Currently configured passive-jitter range.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        self.policy.thresholds()
    }

    /// Iterator over all exception entries in unspecified order.
    #[must_use]
    pub fn exceptions(&self) -> impl Iterator<Item = (&str, LevelCode)> {
        self.exceptions.iter()
    }

    /// Path of the backing exception file.
    #[must_use]
    pub fn exceptions_path(&self) -> &Path {
        &self.exceptions_path
    }

    /// Whether a level is currently live.
    #[must_use]
    pub fn is_level_loaded(&self) -> bool {
        self.level_loaded
    }

    /// Number of players still awaiting mitigation.
    #[must_use]
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }
}
