pub mod config;
pub mod flight;
pub mod init;
pub mod roster;
pub mod seat;

use anyhow::Context;
use roster_core::config::EngineConfig;
use roster_core::db::RosterDb;
use roster_core::directory::FixtureDirectory;
use roster_core::{paths, RosterAssembler};
use std::path::Path;
use std::sync::Arc;

/// Wire the engine to the project's config, directory file and roster store.
pub fn open_engine(root: &Path) -> anyhow::Result<RosterAssembler> {
    let config = EngineConfig::load(root).context("failed to load config")?;
    let directory_file = paths::directory_path(root, &config.directory_file);
    let directory = FixtureDirectory::load(&directory_file)
        .with_context(|| format!("failed to load {}", directory_file.display()))?;
    let db = RosterDb::open(&paths::db_path(root)).context("failed to open roster store")?;
    Ok(RosterAssembler::from_fixture(Arc::new(directory), db, config))
}
