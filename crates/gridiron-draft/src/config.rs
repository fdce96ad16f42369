// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::draft::state::DraftSettings;

/// The one league file, looked up under `config/` and seeded from `defaults/`.
const DRAFT_FILE: &str = "draft.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub draft: DraftConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
}

/// Raw layout of draft.toml.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    league: LeagueConfig,
    #[serde(default)]
    draft: DraftConfig,
    database: DatabaseConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Draft year; future picks are valued relative to it.
    pub year: u32,
    /// Team ids in first-round order (worst record first).
    pub teams: Vec<String>,
    /// Team the human controls. Omit to let the AI run every team.
    #[serde(default)]
    pub user_team: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_pick_time")]
    pub pick_time_seconds: u32,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default)]
    pub quick_mode: bool,
    #[serde(default = "default_true")]
    pub ai_trades: bool,
    /// Seed for AI randomness. Omit for a different draft every run.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_rounds() -> u32 {
    crate::draft::pick::DEFAULT_ROUNDS
}

fn default_pick_time() -> u32 {
    crate::draft::clock::DEFAULT_PICK_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            rounds: default_rounds(),
            pick_time_seconds: default_pick_time(),
            auto_advance: true,
            quick_mode: false,
            ai_trades: true,
            seed: None,
        }
    }
}

impl DraftConfig {
    pub fn settings(&self) -> DraftSettings {
        DraftSettings {
            rounds: self.rounds,
            pick_time_seconds: self.pick_time_seconds,
            auto_advance: self.auto_advance,
            quick_mode: self.quick_mode,
            ai_trades_enabled: self.ai_trades,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseConfig {
    path: String,
}

/// CSV inputs, relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub prospects: String,
    pub needs: String,
    pub signings: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draft.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(DRAFT_FILE);
    let text = read_file(&path)?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        draft: file.draft,
        db_path: file.database.path,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/draft.toml` from `defaults/draft.toml` when it is missing.
///
/// Returns the path written, or `None` when the league file was already in
/// place. An existing file is never overwritten.
pub fn ensure_draft_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(DRAFT_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(DRAFT_FILE);
    let copy_error = |what: &str, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{what}: {e}"),
    };
    let defaults = match std::fs::read(&source) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "no config/{DRAFT_FILE} or defaults/{DRAFT_FILE} in {}; run from the crate root",
                    base_dir.display()
                ),
            });
        }
        Err(e) => return Err(copy_error(&format!("reading {}", source.display()), e)),
    };

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| copy_error("creating config/", e))?;
    }

    // create_new so a league file written concurrently is left alone.
    match std::fs::OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, &defaults)
                .map_err(|e| copy_error(&format!("writing {}", target.display()), e))?;
            info!("Seeded {} from defaults", target.display());
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(copy_error(&format!("creating {}", target.display()), e)),
    }
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_draft_file(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let teams = &config.league.teams;
    if teams.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.teams".into(),
            message: "must list at least one team".into(),
        });
    }

    for (i, team) in teams.iter().enumerate() {
        if team.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "league.teams".into(),
                message: format!("entry {i} is blank"),
            });
        }
        if teams[..i].contains(team) {
            return Err(ConfigError::ValidationError {
                field: "league.teams".into(),
                message: format!("team `{team}` is listed twice"),
            });
        }
    }

    if let Some(user) = &config.league.user_team {
        if !teams.contains(user) {
            return Err(ConfigError::ValidationError {
                field: "league.user_team".into(),
                message: format!("`{user}` is not one of league.teams"),
            });
        }
    }

    if config.draft.rounds == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.rounds".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.draft.pick_time_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.pick_time_seconds".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// Write `toml` as config/draft.toml under a fresh temp dir.
    fn temp_config(name: &str, toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/draft.toml"), toml).unwrap();
        tmp
    }

    const MINIMAL: &str = r#"
[league]
name = "Test League"
year = 2026
teams = ["NE", "KC", "DAL"]
user_team = "KC"

[database]
path = "test.db"

[data_paths]
prospects = "data/prospects.csv"
needs = "data/needs.csv"
signings = "data/signings.csv"
"#;

    #[test]
    fn load_default_config_file() {
        let tmp = std::env::temp_dir().join("gridiron_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(crate_root().join("defaults/draft.toml"), tmp.join("config/draft.toml")).unwrap();

        let config = load_config_from(&tmp).expect("defaults should be valid");
        assert_eq!(config.league.teams.len(), 32);
        assert_eq!(config.draft.rounds, 7);
        assert_eq!(config.draft.pick_time_seconds, 120);
        assert!(config.draft.ai_trades);
        let user = config.league.user_team.as_ref().unwrap();
        assert!(config.league.teams.contains(user));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn draft_section_defaults_when_omitted() {
        let tmp = temp_config("gridiron_config_minimal", MINIMAL);
        let config = load_config_from(&tmp).unwrap();
        let settings = config.draft.settings();
        assert_eq!(settings, DraftSettings::default());
        assert_eq!(config.db_path, "test.db");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_user_team() {
        let toml = MINIMAL.replace("user_team = \"KC\"", "user_team = \"SEA\"");
        let tmp = temp_config("gridiron_config_bad_user", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.user_team"),
            other => panic!("expected validation error, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_teams() {
        let toml = MINIMAL.replace("[\"NE\", \"KC\", \"DAL\"]", "[\"NE\", \"KC\", \"NE\"]");
        let tmp = temp_config("gridiron_config_dupe", &toml);
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ValidationError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_rounds() {
        let toml = format!("{MINIMAL}\n[draft]\nrounds = 0\n");
        let tmp = temp_config("gridiron_config_zero_rounds", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "draft.rounds"),
            other => panic!("expected validation error, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("gridiron_config_garbage", "[league\nname = ");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_without_config() {
        let tmp = std::env::temp_dir().join("gridiron_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::FileNotFound { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn draft_file_is_seeded_once() {
        let tmp = std::env::temp_dir().join("gridiron_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(crate_root().join("defaults/draft.toml"), tmp.join("defaults/draft.toml")).unwrap();

        let seeded = ensure_draft_file(&tmp).unwrap();
        assert_eq!(seeded, Some(tmp.join("config/draft.toml")));
        assert!(load_config_from(&tmp).is_ok());

        fs::write(tmp.join("config/draft.toml"), "# custom\n").unwrap();
        assert_eq!(ensure_draft_file(&tmp).unwrap(), None);
        assert_eq!(fs::read_to_string(tmp.join("config/draft.toml")).unwrap(), "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_draft_file_needs_no_defaults() {
        let tmp = temp_config("gridiron_config_no_defaults", "# hand written\n");
        assert_eq!(ensure_draft_file(&tmp).unwrap(), None);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_draft_file_and_defaults_is_an_error() {
        let tmp = std::env::temp_dir().join("gridiron_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match ensure_draft_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("defaults/draft.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
