//! Configuration loading, validation, and credential resolution for Dost.
//!
//! Loads configuration from `~/.dost/config.toml` with environment variable
//! overrides. Validates all settings at startup; a missing credential or model
//! identifier is fatal before any turn is processed.

pub mod secrets;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use secrets::{ConfigValue, EnvVar, FnSource, SecretResolver, SecretSource, SecretsFile};

/// The root configuration structure.
///
/// Maps directly to `~/.dost/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key. Usually left empty in favor of secrets.toml or the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider preset
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per reply; unset lets the provider decide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Context window and conversation text
    #[serde(default)]
    pub context: ContextConfig,

    /// Transcript export settings
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_provider() -> String {
    "groq".into()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_temperature() -> f32 {
    0.7
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("context", &self.context)
            .field("export", &self.export)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// How many trailing transcript turns are sent with each request
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Inline instruction text replacing the built-in tutor policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    /// File holding the instruction text (relative paths resolve against the config dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_file: Option<String>,

    /// Seed turn every session starts with
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Text recorded in the transcript when a completion call fails
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

fn default_window_size() -> usize {
    12
}
fn default_greeting() -> String {
    "Hello! Main aapka AI-DSA Assistant hoon. Mujhse koi bhi DSA-related sawal poochein, \
     jaise Binary Search ya Merge Sort."
        .into()
}
fn default_error_message() -> String {
    "Error: Response fetch nahi ho paya. Please try again.".into()
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            instruction: None,
            instruction_file: None,
            greeting: default_greeting(),
            error_message: default_error_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_title")]
    pub title: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Supplementary font used for every glyph when the file exists
    #[serde(default = "default_font_path")]
    pub font_path: String,

    #[serde(default = "default_page_width_mm")]
    pub page_width_mm: f32,

    #[serde(default = "default_page_height_mm")]
    pub page_height_mm: f32,

    #[serde(default = "default_margin_mm")]
    pub margin_left_mm: f32,

    #[serde(default = "default_margin_mm")]
    pub margin_right_mm: f32,

    #[serde(default = "default_margin_mm")]
    pub margin_top_mm: f32,

    #[serde(default = "default_margin_mm")]
    pub margin_bottom_mm: f32,
}

fn default_export_title() -> String {
    "DSA Dost - Chat Export (Temporary)".into()
}
fn default_file_name() -> String {
    "dsa_chat_history.pdf".into()
}
fn default_font_path() -> String {
    "fonts/NotoSansDevanagari-Regular.ttf".into()
}
// A4
fn default_page_width_mm() -> f32 {
    210.0
}
fn default_page_height_mm() -> f32 {
    297.0
}
fn default_margin_mm() -> f32 {
    20.0
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: default_export_title(),
            file_name: default_file_name(),
            font_path: default_font_path(),
            page_width_mm: default_page_width_mm(),
            page_height_mm: default_page_height_mm(),
            margin_left_mm: default_margin_mm(),
            margin_right_mm: default_margin_mm(),
            margin_top_mm: default_margin_mm(),
            margin_bottom_mm: default_margin_mm(),
        }
    }
}

/// The two values the session cannot start without.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
    /// Label of the source the key came from
    pub source: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("source", &self.source)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.dost/config.toml).
    ///
    /// Environment overrides:
    /// - `DOST_PROVIDER` replaces `provider`
    /// - `DOST_MODEL` replaces `model`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path, |name| std::env::var(name).ok())
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, apply overrides looked up through `env`, then validate.
    pub fn load_with_env(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;

        if let Some(provider) = env("DOST_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = env("DOST_MODEL") {
            config.model = model;
        }

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path (`$DOST_CONFIG_DIR` or `~/.dost`).
    pub fn config_dir() -> PathBuf {
        match std::env::var("DOST_CONFIG_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs_home().join(".dost"),
        }
    }

    /// Path of the TOML secrets file.
    pub fn secrets_path() -> PathBuf {
        Self::config_dir().join("secrets.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails the range check too.
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.provider.trim().is_empty() {
            return Err(ConfigError::ValidationError("provider must not be empty".into()));
        }

        let e = &self.export;
        if e.page_width_mm <= e.margin_left_mm + e.margin_right_mm {
            return Err(ConfigError::ValidationError(
                "export.page_width_mm must exceed the left + right margins".into(),
            ));
        }
        if e.page_height_mm <= e.margin_top_mm + e.margin_bottom_mm {
            return Err(ConfigError::ValidationError(
                "export.page_height_mm must exceed the top + bottom margins".into(),
            ));
        }

        Ok(())
    }

    /// The standard credential chain for this config:
    /// config.toml → secrets.toml `[<provider>] api_key` → `$<PROVIDER>_API_KEY` → `$DOST_API_KEY`.
    pub fn credential_resolver(&self, secrets_path: &Path) -> SecretResolver {
        let key_path = [self.provider.as_str(), "api_key"];
        SecretResolver::new()
            .with(ConfigValue::new(self.api_key.clone()))
            .with(SecretsFile::new(secrets_path, &key_path))
            .with(EnvVar::for_key_path(&key_path))
            .with(EnvVar::new("DOST_API_KEY"))
    }

    /// Resolve the credential and model through the given chain.
    pub fn resolve_credentials(
        &self,
        resolver: &SecretResolver,
    ) -> Result<Credentials, ConfigError> {
        let model = self.model.trim();
        if model.is_empty() {
            return Err(ConfigError::MissingModel);
        }

        let (api_key, source) = resolver.resolve().ok_or_else(|| ConfigError::MissingCredential {
            tried: resolver.labels(),
        })?;

        Ok(Credentials {
            api_key,
            model: model.to_string(),
            source,
        })
    }

    /// The instruction override, if one is configured.
    ///
    /// Inline text wins over `instruction_file`. `None` means the built-in policy applies.
    pub fn instruction_override(&self) -> Result<Option<String>, ConfigError> {
        if let Some(text) = &self.context.instruction {
            return Ok(Some(text.clone()));
        }
        let Some(file) = &self.context.instruction_file else {
            return Ok(None);
        };
        let path = self.resolve_path(file);
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ConfigError::ReadError {
                path,
                reason: e.to_string(),
            })
    }

    /// Where the supplementary export font is expected.
    pub fn font_path(&self) -> PathBuf {
        self.resolve_path(&self.export.font_path)
    }

    fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            path
        } else {
            Self::config_dir().join(path)
        }
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            context: ContextConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key found (tried: {})", tried.join(", "))]
    MissingCredential { tried: Vec<String> },

    #[error("No model identifier configured")]
    MissingModel,
}

impl From<ConfigError> for dost_core::Error {
    fn from(err: ConfigError) -> Self {
        dost_core::Error::Config {
            message: err.to_string(),
        }
    }
}
