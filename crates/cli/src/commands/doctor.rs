//! `dost doctor`: diagnose configuration and connectivity.

use dost_config::AppConfig;
use dost_core::provider::Provider;
use dost_export::{DocumentRenderer, FontMode};

pub async fn run() -> dost_core::Result<()> {
    println!("🩺 Dost Doctor: System Diagnostics");
    println!("==================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults. Run `dost init` to create one");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (provider: {}, model: {})", config.provider, config.model);
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  Fix the config file before running other checks.");
            return Ok(());
        }
    };

    // Only the source label is shown, never the value.
    let resolver = config.credential_resolver(&AppConfig::secrets_path());
    let credentials = match config.resolve_credentials(&resolver) {
        Ok(credentials) => {
            println!("  ✅ API key found ({})", credentials.source);
            Some(credentials)
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
            None
        }
    };

    let renderer = DocumentRenderer::from_config(&config);
    match renderer.font_mode() {
        FontMode::Embedded => {
            println!("  ✅ Export font found: {}", config.font_path().display());
        }
        FontMode::Builtin => {
            println!(
                "  ⚠️  No export font at {}, PDFs will use Helvetica (Latin text only)",
                config.font_path().display()
            );
            issues += 1;
        }
    }

    if let Some(credentials) = credentials {
        let provider = dost_providers::build_from_config(&config, &credentials.api_key);
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider {} reachable", provider.name()),
            Ok(false) => {
                println!("  ⚠️  Provider {} responded but reported unhealthy", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider {} unreachable: {e}", provider.name());
                issues += 1;
            }
        }
    } else {
        println!("  ⏭️  Provider check skipped (no API key)");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
