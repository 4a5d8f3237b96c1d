//! Subcommand implementations and the startup path they share.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod init;

use std::path::{Path, PathBuf};

use dost_agent::ChatSession;
use dost_config::{AppConfig, ConfigError};
use dost_export::DocumentRenderer;

/// Everything a chat needs, built once before the first turn.
pub struct Startup {
    pub config: AppConfig,
    pub session: ChatSession,
    pub renderer: DocumentRenderer,
    pub credential_source: String,
}

/// Load config, resolve the credential and model, and build the session.
///
/// Any failure here is fatal: no turn is processed without a credential.
pub fn start() -> dost_core::Result<Startup> {
    let config = AppConfig::load()?;
    let resolver = config.credential_resolver(&AppConfig::secrets_path());

    let credentials = match config.resolve_credentials(&resolver) {
        Ok(credentials) => credentials,
        Err(e @ ConfigError::MissingCredential { .. }) => {
            print_credential_help(&config);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(
        source = %credentials.source,
        model = %credentials.model,
        "Credentials resolved"
    );

    let provider = dost_providers::build_from_config(&config, &credentials.api_key);
    let session = ChatSession::from_config(&config, provider, credentials.model)?;
    let renderer = DocumentRenderer::from_config(&config);

    Ok(Startup {
        config,
        session,
        renderer,
        credential_source: credentials.source,
    })
}

fn print_credential_help(config: &AppConfig) {
    let env_name = format!("{}_API_KEY", config.provider.to_uppercase());
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Provide one in any of these places (first match wins):");
    eprintln!("    api_key in {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!("    [{}] api_key in {}", config.provider, AppConfig::secrets_path().display());
    eprintln!("    ${env_name}");
    eprintln!("    $DOST_API_KEY");
    eprintln!();
    eprintln!("  Run `dost init` to create both files.");
    eprintln!();
}

/// Render the session's transcript and write it to `path`.
///
/// The file is only written after rendering succeeds.
pub fn export(
    session: &ChatSession,
    renderer: &DocumentRenderer,
    title: &str,
    path: &Path,
) -> dost_core::Result<PathBuf> {
    let bytes = renderer.render(&session.snapshot(), title)?;
    std::fs::write(path, &bytes).map_err(|source| dost_core::Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Transcript exported");
    Ok(path.to_path_buf())
}
