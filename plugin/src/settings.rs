//! Parsing of the host-provided `[General]` settings section.

use hudshield_core::SeverityLevel;
use hudshield_system_policy::Thresholds;
use ini::Ini;

const GENERAL_SECTION: &str = "General";
const LEVEL_KEY: &str = "MitigationLevel";
const THRESHOLD_KEY: &str = "ColorThreshold";

/// Values the settings file asks the controller to adopt.
///
/// A `None` field means "keep whatever is currently configured": either the
/// key was absent or its value did not parse (which is logged here).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SettingsUpdate {
    pub(crate) level: Option<SeverityLevel>,
    pub(crate) thresholds: Option<Thresholds>,
}

/// Reads the `[General]` section of the host settings file.
///
/// An absent `MitigationLevel` key behaves as the literal name `Off`, so a
/// bare settings file disables mitigation rather than inheriting whatever the
/// previous map configured.
pub(crate) fn read(file: &Ini) -> SettingsUpdate {
    let section = file.section(Some(GENERAL_SECTION));
    let mut update = SettingsUpdate::default();

    let name = section
        .and_then(|section| section.get(LEVEL_KEY))
        .unwrap_or(SeverityLevel::Off.name());
    match SeverityLevel::from_name(name) {
        Some(level) => update.level = Some(level),
        None => tracing::error!(name, "unrecognized mitigation level, keeping previous"),
    }

    if let Some(raw) = section.and_then(|section| section.get(THRESHOLD_KEY)) {
        match parse_thresholds(raw) {
            Some(thresholds) => update.thresholds = Some(thresholds),
            None => tracing::error!(raw, "malformed color threshold range, keeping previous"),
        }
    }

    update
}

/// Parses a `"<min>-<max>"` jitter range in the 0-255 scale.
fn parse_thresholds(raw: &str) -> Option<Thresholds> {
    let (min, max) = raw.split_once('-')?;
    let min = min.trim().parse::<f32>().ok()?;
    let max = max.trim().parse::<f32>().ok()?;
    Thresholds::new(min, max)
}
