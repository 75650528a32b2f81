//! Game settings and the on-disk record that carries them with the best score

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::spawn::SpawnChances;
use crate::types::{
    DEFAULT_BOARD_SIZE, DEFAULT_MAX_MOVE_HISTORY, DEFAULT_QUANTUM_BONUS_CHANCE,
    DEFAULT_SPECIAL_SPAWN_CHANCE, DEFAULT_STARTING_CRYSTALS, DEFAULT_STARTING_TILES,
    MAX_BOARD_SIZE, MAX_MOVE_HISTORY_LIMIT, MIN_BOARD_SIZE,
};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "QUANTUM2048_SETTINGS_PATH";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown setting `{0}`")]
    UnknownField(String),
    #[error("invalid value `{value}` for setting `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub board_size: usize,
    pub starting_crystals: u32,
    pub starting_tiles: usize,
    /// Probability (0..=1) that an eligible diagonal pair jumps
    pub quantum_bonus_chance: f64,
    pub max_move_history: usize,
    #[serde(rename = "phaseShiftSpawnChance")]
    pub phase_spawn_chance: f64,
    #[serde(rename = "echoDuplicateSpawnChance")]
    pub echo_spawn_chance: f64,
    #[serde(rename = "nexusPortalSpawnChance")]
    pub portal_spawn_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            starting_crystals: DEFAULT_STARTING_CRYSTALS,
            starting_tiles: DEFAULT_STARTING_TILES,
            quantum_bonus_chance: DEFAULT_QUANTUM_BONUS_CHANCE,
            max_move_history: DEFAULT_MAX_MOVE_HISTORY,
            phase_spawn_chance: DEFAULT_SPECIAL_SPAWN_CHANCE,
            echo_spawn_chance: DEFAULT_SPECIAL_SPAWN_CHANCE,
            portal_spawn_chance: DEFAULT_SPECIAL_SPAWN_CHANCE,
        }
    }
}

fn clamp_chance(p: f64, fallback: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        self.board_size = self.board_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        self.starting_tiles = self
            .starting_tiles
            .clamp(1, self.board_size * self.board_size);
        self.max_move_history = self.max_move_history.clamp(1, MAX_MOVE_HISTORY_LIMIT);
        self.quantum_bonus_chance =
            clamp_chance(self.quantum_bonus_chance, DEFAULT_QUANTUM_BONUS_CHANCE);
        self.phase_spawn_chance = clamp_chance(self.phase_spawn_chance, DEFAULT_SPECIAL_SPAWN_CHANCE);
        self.echo_spawn_chance = clamp_chance(self.echo_spawn_chance, DEFAULT_SPECIAL_SPAWN_CHANCE);
        self.portal_spawn_chance =
            clamp_chance(self.portal_spawn_chance, DEFAULT_SPECIAL_SPAWN_CHANCE);
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn spawn_chances(&self) -> SpawnChances {
        SpawnChances {
            phase: self.phase_spawn_chance,
            echo: self.echo_spawn_chance,
            portal: self.portal_spawn_chance,
        }
    }

    /// Build settings from a loosely-typed JSON object.
    ///
    /// Each field is read on its own: a missing or malformed field falls back
    /// to its default without discarding the others.
    pub fn from_json_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = value.as_object() else {
            log::warn!("settings record is not an object, using defaults");
            return defaults;
        };
        Self {
            board_size: field(map, "boardSize", defaults.board_size),
            starting_crystals: field(map, "startingCrystals", defaults.starting_crystals),
            starting_tiles: field(map, "startingTiles", defaults.starting_tiles),
            quantum_bonus_chance: field(map, "quantumBonusChance", defaults.quantum_bonus_chance),
            max_move_history: field(map, "maxMoveHistory", defaults.max_move_history),
            phase_spawn_chance: field(map, "phaseShiftSpawnChance", defaults.phase_spawn_chance),
            echo_spawn_chance: field(map, "echoDuplicateSpawnChance", defaults.echo_spawn_chance),
            portal_spawn_chance: field(map, "nexusPortalSpawnChance", defaults.portal_spawn_chance),
        }
        .sanitized()
    }

    /// Override one field from user input.
    ///
    /// Keys are accepted in camelCase or snake_case. Probabilities are entered
    /// as percentages (`"10"` or `"10%"` means 0.1). On error nothing changes.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), SettingsError> {
        let raw = raw.trim();
        let mut next = *self;
        match key {
            "boardSize" | "board_size" => next.board_size = parse(raw, "boardSize")?,
            "startingCrystals" | "starting_crystals" => {
                next.starting_crystals = parse(raw, "startingCrystals")?
            }
            "startingTiles" | "starting_tiles" => next.starting_tiles = parse(raw, "startingTiles")?,
            "quantumBonusChance" | "quantum_bonus_chance" => {
                next.quantum_bonus_chance = parse_percent(raw, "quantumBonusChance")?
            }
            "maxMoveHistory" | "max_move_history" => {
                next.max_move_history = parse(raw, "maxMoveHistory")?
            }
            "phaseShiftSpawnChance" | "phase_spawn_chance" => {
                next.phase_spawn_chance = parse_percent(raw, "phaseShiftSpawnChance")?
            }
            "echoDuplicateSpawnChance" | "echo_spawn_chance" => {
                next.echo_spawn_chance = parse_percent(raw, "echoDuplicateSpawnChance")?
            }
            "nexusPortalSpawnChance" | "portal_spawn_chance" => {
                next.portal_spawn_chance = parse_percent(raw, "nexusPortalSpawnChance")?
            }
            other => return Err(SettingsError::UnknownField(other.to_string())),
        }
        *self = next.sanitized();
        Ok(())
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    let Some(raw) = map.get(key) else {
        return default;
    };
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(v) => v,
        Err(err) => {
            log::warn!("setting `{}` is invalid ({}), using default", key, err);
            default
        }
    }
}

fn parse<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, SettingsError> {
    raw.parse::<T>().map_err(|_| SettingsError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

fn parse_percent(raw: &str, field: &'static str) -> Result<f64, SettingsError> {
    let percent: f64 = parse(raw.trim_end_matches('%').trim_end(), field)?;
    if !percent.is_finite() {
        return Err(SettingsError::InvalidValue {
            field,
            value: raw.to_string(),
        });
    }
    Ok(percent / 100.0)
}

/// Everything that survives between sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(default)]
    pub best_score: u64,
}

impl SavedRecord {
    pub fn from_json_value(value: &Value) -> Self {
        let best_score = value
            .get("bestScore")
            .and_then(Value::as_u64)
            .unwrap_or_default();
        Self {
            settings: Settings::from_json_value(value),
            best_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("quantum2048");
        path.push("settings.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved record. A missing or unreadable file yields defaults.
    pub fn load(&self) -> SavedRecord {
        let Ok(bytes) = fs::read(&self.path) else {
            return SavedRecord::default();
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => SavedRecord::from_json_value(&value),
            Err(err) => {
                log::warn!("ignoring malformed settings at {}: {}", self.path.display(), err);
                SavedRecord::default()
            }
        }
    }

    pub fn save(&self, record: &SavedRecord) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("quantum2048-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn default_settings_values() {
        let s = Settings::default();
        assert_eq!(s.board_size, 6);
        assert_eq!(s.starting_crystals, 3);
        assert_eq!(s.starting_tiles, 2);
        assert_eq!(s.max_move_history, 3);
    }

    #[test]
    fn sanitized_clamps_expected_fields() {
        let s = Settings {
            board_size: 40,
            starting_tiles: 0,
            quantum_bonus_chance: 3.0,
            echo_spawn_chance: f64::NAN,
            max_move_history: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.board_size, MAX_BOARD_SIZE);
        assert_eq!(s.starting_tiles, 1);
        assert_eq!(s.quantum_bonus_chance, 1.0);
        assert_eq!(s.echo_spawn_chance, DEFAULT_SPECIAL_SPAWN_CHANCE);
        assert_eq!(s.max_move_history, 1);
    }

    #[test]
    fn corrupt_fields_fall_back_individually() {
        let value = json!({
            "boardSize": 8,
            "startingCrystals": "lots",
            "startingTiles": 5,
            "quantumBonusChance": null,
        });
        let s = Settings::from_json_value(&value);
        assert_eq!(s.board_size, 8);
        assert_eq!(s.starting_crystals, DEFAULT_STARTING_CRYSTALS);
        assert_eq!(s.starting_tiles, 5);
        assert_eq!(s.quantum_bonus_chance, DEFAULT_QUANTUM_BONUS_CHANCE);
    }

    #[test]
    fn non_object_record_is_default() {
        assert_eq!(Settings::from_json_value(&json!([1, 2, 3])), Settings::default());
    }

    #[test]
    fn invalid_override_leaves_settings_unchanged() {
        let mut s = Settings::default();
        let before = s;
        assert!(matches!(
            s.set_field("boardSize", "abc"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(s.set_field("quantumBonusChance", "--").is_err());
        assert!(s.set_field("maxMoveHistory", "NaN").is_err());
        assert!(matches!(
            s.set_field("colour", "red"),
            Err(SettingsError::UnknownField(_))
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn starting_tiles_clamped_to_board_capacity() {
        let mut s = Settings::default();
        s.set_field("boardSize", "4").unwrap();
        s.set_field("startingTiles", "99").unwrap();
        assert_eq!(s.starting_tiles, 16);
    }

    #[test]
    fn chance_entered_as_percent() {
        let mut s = Settings::default();
        s.set_field("quantum_bonus_chance", "25").unwrap();
        assert!((s.quantum_bonus_chance - 0.25).abs() < 1e-9);
        s.set_field("portal_spawn_chance", "100%").unwrap();
        assert_eq!(s.portal_spawn_chance, 1.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = Settings {
            board_size: 8,
            starting_tiles: 5,
            ..Settings::default()
        };
        s.reset();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn record_serializes_flat() {
        let record = SavedRecord {
            settings: Settings::default(),
            best_score: 512,
        };
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["boardSize"], json!(6));
        assert_eq!(value["bestScore"], json!(512));
        assert_eq!(SavedRecord::from_json_value(&value), record);
    }

    #[test]
    fn store_round_trip_and_missing_file() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);
        let store = SettingsStore::at(&path);
        assert_eq!(store.load(), SavedRecord::default());

        let mut record = SavedRecord::default();
        record.settings.board_size = 7;
        record.settings.starting_tiles = 4;
        record.best_score = 2048;
        store.save(&record).unwrap();
        assert_eq!(store.load(), record);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn store_ignores_garbage() {
        let path = temp_path("garbage");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"{not json").unwrap();
        assert_eq!(SettingsStore::at(&path).load(), SavedRecord::default());
        let _ = fs::remove_file(&path);
    }
}
