//! Configuration system (layered: defaults < config file < env < code).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::calendar::DEFAULT_TIME_ZONE;
use crate::error::AgendaError;
use crate::models::DEFAULT_MODEL;

/// Model calls allowed per turn before the controller gives up.
pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Session used when none is given.
pub const DEFAULT_SESSION_ID: &str = "1";

/// Credential key for the calendar access token.
pub const CALENDAR_CREDENTIAL: &str = "google-calendar";

const API_KEY_ENV: [(&str, &str); 3] = [
    ("GROQ_API_KEY", "groq"),
    ("OPENAI_API_KEY", "openai"),
    ("GOOGLE_CALENDAR_ACCESS_TOKEN", CALENDAR_CREDENTIAL),
];

const BASE_URL_ENV: [(&str, &str); 3] = [
    ("GROQ_BASE_URL", "groq"),
    ("OPENAI_BASE_URL", "openai"),
    ("GOOGLE_CALENDAR_BASE_URL", CALENDAR_CREDENTIAL),
];

/// Tunables for the agent itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    /// `provider:model` selector.
    pub model: String,
    pub system_prompt: Option<String>,
    pub session_id: String,
    pub max_iterations: usize,
    /// Zone stamped on every created event.
    pub time_zone: String,
    pub calendar_id: String,
    /// Directory for file-backed history; in-memory when unset.
    pub store_dir: Option<PathBuf>,
    pub temperature: Option<f64>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            session_id: DEFAULT_SESSION_ID.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            calendar_id: "primary".to_string(),
            store_dir: None,
            temperature: None,
        }
    }
}

/// On-disk shape of `~/.agenda/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    agent: AgentSettings,
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
}

/// Layered configuration for Agenda.
///
/// Resolution order, lowest first: built-in defaults, the TOML config file,
/// environment variables (after loading `.env`), then explicit setters.
#[derive(Clone)]
pub struct AgendaConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    settings: AgentSettings,
}

impl fmt::Debug for AgendaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<String> = self
            .api_keys
            .read()
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("AgendaConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AgendaConfig {
    /// Empty config with default settings.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            settings: AgentSettings::default(),
        }
    }

    /// Load every layer: config file (if present), `.env`, environment.
    ///
    /// The file is `$AGENDA_CONFIG` when set, else `~/.agenda/config.toml`.
    pub fn load() -> Result<Self, AgendaError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var_os("AGENDA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::new()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, AgendaError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgendaError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            AgendaError::Configuration(format!("invalid {}: {e}", path.display()))
        })?;
        if file.agent.max_iterations == 0 {
            return Err(AgendaError::Configuration(format!(
                "invalid {}: [agent] max_iterations must be a positive integer",
                path.display()
            )));
        }

        let config = Self::new().with_settings(file.agent);
        for (provider, key) in file.api_keys {
            config.set_api_key(&provider, key);
        }
        for (provider, url) in file.base_urls {
            config.set_base_url(&provider, url);
        }
        Ok(config)
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AgendaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (env_var, provider) in API_KEY_ENV {
            if let Some(key) = lookup(env_var).filter(|v| !v.is_empty()) {
                self.set_api_key(provider, key);
            }
        }
        for (env_var, provider) in BASE_URL_ENV {
            if let Some(url) = lookup(env_var).filter(|v| !v.is_empty()) {
                self.set_base_url(provider, url);
            }
        }

        let settings = &mut self.settings;
        if let Some(model) = lookup("AGENDA_MODEL") {
            settings.model = model;
        }
        if let Some(prompt) = lookup("AGENDA_SYSTEM_PROMPT") {
            settings.system_prompt = Some(prompt);
        }
        if let Some(session_id) = lookup("AGENDA_SESSION_ID") {
            settings.session_id = session_id;
        }
        if let Some(raw) = lookup("AGENDA_MAX_ITERATIONS") {
            settings.max_iterations = parse_max_iterations(&raw)?;
        }
        if let Some(time_zone) = lookup("AGENDA_TIME_ZONE") {
            settings.time_zone = time_zone;
        }
        if let Some(calendar_id) = lookup("GOOGLE_CALENDAR_ID") {
            settings.calendar_id = calendar_id;
        }
        if let Some(dir) = lookup("AGENDA_STORE_DIR") {
            settings.store_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AgentSettings {
        &mut self.settings
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        if let Ok(mut keys) = self.api_keys.write() {
            keys.insert(provider.to_string(), key);
        }
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.read().ok()?.get(provider).cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        if let Ok(mut urls) = self.base_urls.write() {
            urls.insert(provider.to_string(), url);
        }
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.read().ok()?.get(provider).cloned()
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }
}

/// Parse and bound a max-iteration value.
pub fn parse_max_iterations(raw: &str) -> Result<usize, AgendaError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AgendaError::Configuration(format!(
            "max iterations must be a positive integer, got '{raw}'"
        ))),
    }
}

/// `~/.agenda`, or `.agenda` when no home directory is known.
pub fn default_agenda_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".agenda"))
        .unwrap_or_else(|| PathBuf::from(".agenda"))
}

pub fn default_config_path() -> PathBuf {
    default_agenda_dir().join("config.toml")
}
