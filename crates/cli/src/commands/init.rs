//! `dost init`: first-time setup.

use std::path::Path;

use dost_config::AppConfig;

const SECRETS_TEMPLATE: &str = concat!(
    "# Dost secrets. Keep this file out of version control.\n",
    "# The table name matches `provider` in config.toml.\n",
    "\n",
    "# [groq]\n",
    "# api_key = \"gsk_...\"\n",
);

pub async fn run() -> dost_core::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let secrets_path = AppConfig::secrets_path();

    println!("Dost: First-Time Setup");
    println!("======================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
    } else {
        write(&config_path, &AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    if secrets_path.exists() {
        println!("⚠️  Secrets file already exists at: {}", secrets_path.display());
    } else {
        write(&secrets_path, SECRETS_TEMPLATE)?;
        println!("✅ Created secrets.toml at: {}", secrets_path.display());
    }

    let font_path = AppConfig::load()?.font_path();
    println!("\n📝 Next steps:");
    println!("   1. Put your API key in {} (or set GROQ_API_KEY)", secrets_path.display());
    println!(
        "   2. Optional: place a TrueType font at {} for non-Latin PDF text",
        font_path.display()
    );
    println!("   3. Run: dost chat\n");

    Ok(())
}

fn write(path: &Path, contents: &str) -> dost_core::Result<()> {
    std::fs::write(path, contents).map_err(|source| dost_core::Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
