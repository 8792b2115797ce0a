use anyhow::Context;
use roster_core::config::EngineConfig;
use roster_core::{io, paths};
use std::path::Path;

const DIRECTORY_TEMPLATE: &str = "\
# Flight, crew and passenger master data read by `roster`.
flights: []
pilots: []
attendants: []
recipes: []
passengers: []
";

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing roster in: {}", root.display());

    let dir = paths::roster_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        EngineConfig::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let config = EngineConfig::load(root).context("failed to load config")?;
    let directory_file = paths::directory_path(root, &config.directory_file);
    if io::write_if_missing(&directory_file, DIRECTORY_TEMPLATE.as_bytes())? {
        println!("  created: {}", config.directory_file.display());
    } else {
        println!("  exists:  {}", config.directory_file.display());
    }

    println!("\nRoster initialized.");
    println!("Next: fill in {} and run `roster flights`", config.directory_file.display());
    Ok(())
}
