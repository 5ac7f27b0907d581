//! Tests for configuration loading.

use std::sync::{Mutex, OnceLock};

use agenda::config::{AgendaConfig, CALENDAR_CREDENTIAL};
use agenda::error::AgendaError;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 14] = [
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
    "GOOGLE_CALENDAR_ACCESS_TOKEN",
    "GROQ_BASE_URL",
    "OPENAI_BASE_URL",
    "GOOGLE_CALENDAR_BASE_URL",
    "GOOGLE_CALENDAR_ID",
    "AGENDA_MODEL",
    "AGENDA_SYSTEM_PROMPT",
    "AGENDA_SESSION_ID",
    "AGENDA_MAX_ITERATIONS",
    "AGENDA_TIME_ZONE",
    "AGENDA_STORE_DIR",
    "AGENDA_CONFIG",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clean_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn config_set_get_api_key() {
    let config = AgendaConfig::new();
    config.set_api_key("groq", "gsk-test-123".to_string());
    assert_eq!(config.get_api_key("groq"), Some("gsk-test-123".to_string()));
    assert_eq!(config.get_api_key("openai"), None);
}

#[test]
fn config_clones_share_credentials() {
    let config = AgendaConfig::new();
    let clone = config.clone();
    config.set_base_url("groq", "http://localhost:8080".to_string());
    assert_eq!(
        clone.get_base_url("groq"),
        Some("http://localhost:8080".to_string())
    );
}

#[test]
fn config_load_maps_env_keys_urls_and_settings() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("AGENDA_CONFIG", dir.path().join("missing.toml"));

    std::env::set_var("GROQ_API_KEY", "test-groq-key");
    std::env::set_var("GOOGLE_CALENDAR_ACCESS_TOKEN", "test-calendar-token");
    std::env::set_var("GOOGLE_CALENDAR_BASE_URL", "http://localhost:9999");
    std::env::set_var("GOOGLE_CALENDAR_ID", "team@example.com");
    std::env::set_var("AGENDA_SESSION_ID", "work");

    let config = AgendaConfig::load().unwrap();

    assert_eq!(config.get_api_key("groq"), Some("test-groq-key".to_string()));
    assert_eq!(
        config.get_api_key(CALENDAR_CREDENTIAL),
        Some("test-calendar-token".to_string())
    );
    assert_eq!(
        config.get_base_url(CALENDAR_CREDENTIAL),
        Some("http://localhost:9999".to_string())
    );
    assert_eq!(config.settings().calendar_id, "team@example.com");
    assert_eq!(config.settings().session_id, "work");
    assert_eq!(config.settings().model, "groq:llama3-70b-8192");
}

#[test]
fn config_load_rejects_bad_iteration_cap() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("AGENDA_CONFIG", dir.path().join("missing.toml"));
    std::env::set_var("AGENDA_MAX_ITERATIONS", "zero");

    assert!(matches!(
        AgendaConfig::load(),
        Err(AgendaError::Configuration(_))
    ));
}

#[test]
fn config_load_reads_file_named_by_agenda_config() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.toml");
    std::fs::write(
        &path,
        "[agent]\nmodel = \"openai:gpt-4o\"\nmax_iterations = 8\n\n[api_keys]\nopenai = \"sk-file\"\n",
    )
    .unwrap();
    std::env::set_var("AGENDA_CONFIG", &path);
    std::env::set_var("AGENDA_MAX_ITERATIONS", "3");

    let config = AgendaConfig::load().unwrap();

    assert_eq!(config.settings().model, "openai:gpt-4o");
    assert_eq!(config.settings().max_iterations, 3);
    assert_eq!(config.get_api_key("openai"), Some("sk-file".to_string()));
}

#[test]
fn config_load_without_file_uses_defaults() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("AGENDA_CONFIG", dir.path().join("missing.toml"));

    let config = AgendaConfig::load().unwrap();
    assert_eq!(config.settings().max_iterations, 25);
    assert_eq!(config.settings().time_zone, "America/Los_Angeles");
}
