use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::vault::path::escapes_vault;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub editor: EditorConfig,
    #[serde(default)]
    pub people: PeopleSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub vault_path: String,
    pub scratch_file: String,
    pub auto_save_debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    pub scroll_off: u16,
}

/// Everything the people autosuggest reads at runtime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PeopleSettings {
    pub trigger_prefix: String,
    /// Selector handed to the roster: `""`, `"Folder/Sub"` or `#tag`.
    pub entity_source: String,
    /// Cap for the empty-query listing.
    pub suggestions_limit: usize,
    pub create_if_not_exists: bool,
    pub new_person_location: String,
    pub open_in_split_pane: bool,
    /// Normalised similarity cut-off; lower scores are better matches.
    pub match_threshold: f64,
    /// Cap handed to the matcher for non-empty queries.
    pub search_limit: usize,
    pub offer_new_when_create_disabled: bool,
    pub use_markdown_links: bool,
}

impl Default for PeopleSettings {
    fn default() -> Self {
        Self {
            trigger_prefix: "@".to_string(),
            entity_source: String::new(),
            suggestions_limit: 5,
            create_if_not_exists: true,
            new_person_location: String::new(),
            open_in_split_pane: true,
            match_threshold: 0.3,
            search_limit: 5,
            offer_new_when_create_disabled: true,
            use_markdown_links: false,
        }
    }
}

impl PeopleSettings {
    /// Apply a single `key value` change, as typed in `:set people.<key> <value>`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.strip_prefix("people.").unwrap_or(key);
        match key {
            "trigger_prefix" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "prefix cannot be empty"));
                }
                self.trigger_prefix = value.to_string();
            }
            "entity_source" => self.entity_source = vault_relative(key, value)?,
            "new_person_location" => self.new_person_location = vault_relative(key, value)?,
            "suggestions_limit" => {
                self.suggestions_limit = parse_limit(key, value)?;
            }
            "search_limit" => {
                self.search_limit = parse_limit(key, value)?;
            }
            "match_threshold" => {
                let threshold: f64 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a number"))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(invalid(key, value, "must be between 0 and 1"));
                }
                self.match_threshold = threshold;
            }
            "create_if_not_exists" => self.create_if_not_exists = parse_bool(key, value)?,
            "open_in_split_pane" => self.open_in_split_pane = parse_bool(key, value)?,
            "offer_new_when_create_disabled" => {
                self.offer_new_when_create_disabled = parse_bool(key, value)?;
            }
            "use_markdown_links" => self.use_markdown_links = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Whether the synthetic "create new" entry should be offered at all.
    pub fn offers_new_entities(&self) -> bool {
        self.create_if_not_exists || self.offer_new_when_create_disabled
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_prefix.is_empty() {
            return Err(invalid("trigger_prefix", "", "prefix cannot be empty"));
        }
        if self.suggestions_limit == 0 {
            return Err(invalid("suggestions_limit", "0", "must be at least 1"));
        }
        if self.search_limit == 0 {
            return Err(invalid("search_limit", "0", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(invalid(
                "match_threshold",
                &self.match_threshold.to_string(),
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

fn vault_relative(key: &str, value: &str) -> Result<String, ConfigError> {
    if escapes_vault(value) {
        return Err(invalid(key, value, "must stay inside the vault"));
    }
    Ok(value.trim().to_string())
}

fn parse_limit(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(0) => Err(invalid(key, value, "must be at least 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(key, value, "expected a positive integer")),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::defaults()?;

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "peoplelink") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                let user_str = fs::read_to_string(&config_path)?;
                config = toml::from_str(&user_str)?;
            }
        }

        config.expand_vault_path()?;
        config.people.validate()?;
        Ok(config)
    }

    pub fn defaults() -> Result<Self, ConfigError> {
        let defaults = include_str!("../../config/default.toml");
        Ok(toml::from_str(defaults)?)
    }

    pub fn vault_path(&self) -> PathBuf {
        PathBuf::from(&self.general.vault_path)
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.vault_path().join(&self.general.scratch_file)
    }

    fn expand_vault_path(&mut self) -> Result<(), ConfigError> {
        if self.general.vault_path.starts_with('~') {
            let home = dirs_home().ok_or(ConfigError::NoHome)?;
            self.general.vault_path =
                self.general
                    .vault_path
                    .replacen('~', &home.to_string_lossy(), 1);
        }
        Ok(())
    }
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
