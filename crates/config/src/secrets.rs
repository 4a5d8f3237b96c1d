//! Ordered credential resolution.
//!
//! A [`SecretResolver`] holds a list of [`SecretSource`]s and returns the
//! first non-empty value. There is deliberately no literal fallback at the
//! end of the chain: if every source comes up empty, resolution fails.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One place a secret might live.
pub trait SecretSource: Send + Sync {
    /// Label used in logs and error messages. Never includes the value.
    fn label(&self) -> String;

    /// Look the secret up. Empty or whitespace-only values count as absent.
    fn fetch(&self) -> Option<String>;
}

/// A value already present in the loaded config file.
pub struct ConfigValue {
    value: Option<String>,
}

impl ConfigValue {
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }
}

impl SecretSource for ConfigValue {
    fn label(&self) -> String {
        "config.toml api_key".into()
    }

    fn fetch(&self) -> Option<String> {
        self.value.clone()
    }
}

/// A key path inside a TOML secrets file, e.g. `[groq] api_key`.
pub struct SecretsFile {
    path: PathBuf,
    key_path: Vec<String>,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>, key_path: &[&str]) -> Self {
        Self {
            path: path.into(),
            key_path: key_path.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn lookup(path: &Path, key_path: &[String]) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        let root: toml::Table = match toml::from_str(&content) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unparseable secrets file");
                return None;
            }
        };

        let (last, parents) = key_path.split_last()?;
        let mut table = &root;
        for key in parents {
            table = table.get(key)?.as_table()?;
        }
        table.get(last)?.as_str().map(String::from)
    }
}

impl SecretSource for SecretsFile {
    fn label(&self) -> String {
        format!("{} [{}]", self.path.display(), self.key_path.join("."))
    }

    fn fetch(&self) -> Option<String> {
        Self::lookup(&self.path, &self.key_path)
    }
}

/// An environment variable.
pub struct EnvVar {
    name: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The variable a secrets key path falls back to: `["groq", "api_key"]` → `GROQ_API_KEY`.
    pub fn for_key_path(key_path: &[&str]) -> Self {
        Self::new(key_path.join("_").to_uppercase())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SecretSource for EnvVar {
    fn label(&self) -> String {
        format!("${}", self.name)
    }

    fn fetch(&self) -> Option<String> {
        std::env::var(&self.name).ok()
    }
}

/// A source backed by a closure; handy for tests and embedding callers.
pub struct FnSource<F> {
    label: String,
    f: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<F> SecretSource for FnSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn label(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self) -> Option<String> {
        (self.f)()
    }
}

/// Tries sources in order; the first non-empty value wins.
#[derive(Default)]
pub struct SecretResolver {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the end of the chain.
    pub fn with(mut self, source: impl SecretSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Labels of every source, in lookup order.
    pub fn labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    /// Resolve the secret, returning the value and the label of its source.
    pub fn resolve(&self) -> Option<(String, String)> {
        for source in &self.sources {
            let label = source.label();
            match source.fetch().map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => {
                    debug!(source = %label, "Credential resolved");
                    return Some((value, label));
                }
                _ => debug!(source = %label, "Credential source empty"),
            }
        }
        None
    }
}
