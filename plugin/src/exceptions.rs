//! Hashed store of per-player severity overrides with INI persistence.
//!
//! The exception file carries one `<player-name> = <integer level>` entry per
//! override under an `[Exceptions]` section. Values are coerced with C
//! `atoi` semantics at load time and stored unvalidated; a code outside the
//! defined range simply falls through the policy table later.

use std::collections::HashMap;
use std::path::Path;

use hudshield_core::LevelCode;
use ini::Ini;
use thiserror::Error;

const EXCEPTIONS_SECTION: &str = "Exceptions";

/// Failure modes for exception-file persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The exception file could not be read or parsed.
    #[error("failed to read exception file: {0}")]
    Read(#[from] ini::Error),
    /// The exception file could not be written.
    #[error("failed to write exception file: {0}")]
    Write(#[from] std::io::Error),
}

/// Mapping from player name to overridden severity code.
///
/// Iteration order is the hash map's internal order and deliberately
/// unspecified.
#[derive(Clone, Debug, Default)]
pub struct ExceptionStore {
    entries: HashMap<String, LevelCode>,
}

impl ExceptionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the override for the given player name, if any.
    ///
    /// Absence means the global level applies.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<LevelCode> {
        self.entries.get(name).copied()
    }

    /// Inserts or overwrites the override for the given player name.
    pub fn set(&mut self, name: &str, code: LevelCode) {
        let _ = self.entries.insert(name.to_string(), code);
    }

    /// Removes the override for the given player name, if present.
    pub fn remove(&mut self, name: &str) {
        let _ = self.entries.remove(name);
    }

    /// Discards every override without touching the backing file.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterator over all overrides in unspecified order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, LevelCode)> {
        self.entries.iter().map(|(name, code)| (name.as_str(), *code))
    }

    /// Number of stored overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no overrides are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the store's contents with the `[Exceptions]` section of the
    /// file at `path`.
    ///
    /// Values that are not clean integers are coerced, not rejected; see
    /// [`coerce_level`].
    pub fn load(&mut self, path: &Path) -> Result<(), StoreError> {
        let file = Ini::load_from_file(path)?;
        self.entries.clear();
        if let Some(section) = file.section(Some(EXCEPTIONS_SECTION)) {
            for (name, value) in section.iter() {
                self.set(name, coerce_level(value));
            }
        }
        Ok(())
    }

    /// Serializes every override to the file at `path`, overwriting it.
    pub fn flush(&self, path: &Path) -> Result<(), StoreError> {
        let mut file = Ini::new();
        for (name, code) in &self.entries {
            let _ = file
                .with_section(Some(EXCEPTIONS_SECTION))
                .set(name.as_str(), code.get().to_string());
        }
        file.write_to_file(path)?;
        Ok(())
    }
}

/// Coerces free text to a level code with C `atoi` semantics: an optional
/// sign followed by the longest leading digit run, anything else yielding 0.
#[must_use]
pub fn coerce_level(raw: &str) -> LevelCode {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    LevelCode::new(sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_follows_atoi() {
        assert_eq!(coerce_level("3").get(), 3);
        assert_eq!(coerce_level("  5 trailing").get(), 5);
        assert_eq!(coerce_level("-2").get(), -2);
        assert_eq!(coerce_level("+4").get(), 4);
        assert_eq!(coerce_level("garbage").get(), 0);
        assert_eq!(coerce_level("").get(), 0);
        assert_eq!(coerce_level("12abc").get(), 12);
    }

    #[test]
    fn set_overwrites_existing_entries() {
        let mut store = ExceptionStore::new();
        store.set("Alice", LevelCode::new(2));
        store.set("Alice", LevelCode::new(5));
        assert_eq!(store.get("Alice"), Some(LevelCode::new(5)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut store = ExceptionStore::new();
        store.set("Alice", LevelCode::new(2));
        assert_eq!(store.get("alice"), None);
    }

    #[test]
    fn remove_is_a_noop_for_missing_entries() {
        let mut store = ExceptionStore::new();
        store.set("Alice", LevelCode::new(2));
        store.remove("Bob");
        store.remove("Alice");
        assert!(store.is_empty());
    }
}
