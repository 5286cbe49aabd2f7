//! `thinkloop tools` — show the tool catalog.
//!
//! Needs no credentials: only the registry is built.

use super::{Context, build_registry};

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let registry = build_registry(&config)?;

    println!("\n  Available tools ({}):\n", registry.len());
    for name in registry.names() {
        let Some(tool) = registry.get(name) else {
            continue;
        };
        println!("  • {name}");
        println!("    {}", tool.description());
        if ctx.verbose {
            println!("    {}", tool.signature());
        }
        println!();
    }
    Ok(())
}
