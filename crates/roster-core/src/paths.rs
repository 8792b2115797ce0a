use crate::error::{Result, RosterError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROSTER_DIR: &str = ".roster";
pub const CONFIG_FILE: &str = ".roster/config.yaml";
pub const DB_FILE: &str = ".roster/rosters.redb";
pub const DIRECTORY_FILE: &str = ".roster/directory.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn roster_dir(root: &Path) -> PathBuf {
    root.join(ROSTER_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn db_path(root: &Path) -> PathBuf {
    root.join(DB_FILE)
}

/// Resolve a directory file path from config: relative paths hang off `root`.
pub fn directory_path(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

// ---------------------------------------------------------------------------
// Flight number validation
// ---------------------------------------------------------------------------

static FLIGHT_RE: OnceLock<Regex> = OnceLock::new();

fn flight_re() -> &'static Regex {
    FLIGHT_RE.get_or_init(|| Regex::new(r"^[A-Z0-9]+$").unwrap())
}

/// Flight numbers key the roster store, so they must be short and plain.
pub fn validate_flight_number(flight_number: &str) -> Result<()> {
    if flight_number.is_empty() || flight_number.len() > 10 || !flight_re().is_match(flight_number)
    {
        return Err(RosterError::InvalidFlightNumber(flight_number.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
