//! `thinkloop onboard` — First-time setup.

use std::path::Path;
use thinkloop_config::AppConfig;

use super::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let config_path = ctx.config_file();

    println!("Thinkloop — First-Time Setup");
    println!("============================\n");

    if write_default_config(&config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Edit {} and add your API key", config_path.display());
        println!("      (or export THINKLOOP_API_KEY / OPENAI_API_KEY)");
        println!("   2. Run: thinkloop tools");
        println!("   3. Run: thinkloop run \"Calculate 15% of 200\"\n");
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    }

    Ok(())
}

/// Write the default config unless the file exists. Returns whether it wrote.
pub fn write_default_config(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}
