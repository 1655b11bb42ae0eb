//! Game settings
//!
//! Held in memory only. The browser build reads them from the page's query
//! string, the native build from command-line flags. Both hand decoded
//! `(key, value)` pairs to [`Settings::apply`], which does all validation.

use serde::{Deserialize, Serialize};

use crate::puzzle::{GridSize, ShuffleMode};
use crate::racing::CollisionTiming;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value {value:?} for setting {key:?}")]
    InvalidValue { key: String, value: String },
    #[error("Setting {0:?} is missing a value")]
    MissingValue(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Puzzle ===
    /// Board size used when the puzzle is opened
    pub puzzle_size: GridSize,
    /// How boards are scrambled
    pub shuffle: ShuffleMode,

    // === Racing ===
    /// Which obstacle positions the collision test sees
    pub collision_timing: CollisionTiming,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    /// Fixed RNG seed; None picks one from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle_size: GridSize::Three,
            shuffle: ShuffleMode::Naive,
            collision_timing: CollisionTiming::Lagged,
            master_volume: 0.8,
            muted: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Keys understood by [`Settings::apply`]
    pub const KEYS: [&'static str; 6] =
        ["size", "shuffle", "collision", "volume", "muted", "seed"];

    /// Build from already-decoded `(key, value)` pairs, applied in order on
    /// top of the defaults. Unknown keys are skipped with a warning.
    pub fn from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, SettingsError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            settings.apply(key.as_ref().trim(), value.as_ref().trim())?;
        }
        Ok(settings)
    }

    /// Apply a single `key=value` setting
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        if value.is_empty() && Self::KEYS.iter().any(|k| *k == key) {
            return Err(SettingsError::MissingValue(key.to_string()));
        }
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "size" => {
                self.puzzle_size = value
                    .parse::<usize>()
                    .ok()
                    .and_then(GridSize::from_side)
                    .ok_or_else(invalid)?;
            }
            "shuffle" => {
                self.shuffle = ShuffleMode::from_name(value).ok_or_else(invalid)?;
            }
            "collision" => {
                self.collision_timing = CollisionTiming::from_name(value).ok_or_else(invalid)?;
            }
            "volume" => {
                let volume = value.parse::<f32>().map_err(|_| invalid())?;
                if !volume.is_finite() {
                    return Err(invalid());
                }
                self.master_volume = volume.clamp(0.0, 1.0);
            }
            "muted" => {
                self.muted = parse_flag(value).ok_or_else(invalid)?;
            }
            "seed" => {
                self.seed = Some(value.parse::<u64>().map_err(|_| invalid())?);
            }
            _ => log::warn!("Ignoring unknown setting {:?}", key),
        }
        Ok(())
    }

    /// Volume after mute
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Configured seed, or `fallback` if none was set
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        Settings::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_no_pairs_is_default() {
        assert_eq!(parse(&[]), Ok(Settings::default()));
    }

    #[test]
    fn test_every_key() {
        let settings = parse(&[
            ("size", "5"),
            ("shuffle", "solvable"),
            ("collision", "current"),
            ("volume", "0.5"),
            ("muted", "yes"),
            ("seed", "99"),
        ])
        .unwrap();
        assert_eq!(settings.puzzle_size, GridSize::Five);
        assert_eq!(settings.shuffle, ShuffleMode::Solvable);
        assert_eq!(settings.collision_timing, CollisionTiming::Current);
        assert_eq!(settings.master_volume, 0.5);
        assert!(settings.muted);
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.seed_or(1), 99);
    }

    #[test]
    fn test_values_are_trimmed_and_later_pairs_win() {
        let settings = parse(&[("size", " 4 "), ("size", "3"), ("volume", "0.25")]).unwrap();
        assert_eq!(settings.puzzle_size, GridSize::Three);
        assert_eq!(settings.master_volume, 0.25);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = parse(&[("theme", "dark"), ("theme", ""), ("size", "4")]).unwrap();
        assert_eq!(settings.puzzle_size, GridSize::Four);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(
            parse(&[("size", "6")]),
            Err(SettingsError::InvalidValue {
                key: "size".into(),
                value: "6".into()
            })
        );
        assert!(parse(&[("volume", "loud")]).is_err());
        assert!(parse(&[("volume", "NaN")]).is_err());
        assert!(parse(&[("muted", "maybe")]).is_err());
        assert!(parse(&[("shuffle", "sorted")]).is_err());
    }

    #[test]
    fn test_empty_value_is_missing() {
        assert_eq!(
            parse(&[("seed", "")]),
            Err(SettingsError::MissingValue("seed".into()))
        );
    }

    #[test]
    fn test_volume_clamped() {
        let settings = parse(&[("volume", "3")]).unwrap();
        assert_eq!(settings.master_volume, 1.0);
    }
}
