//! Roster record storage on redb.
//!
//! # Table design
//!
//! A single `ROSTERS` table keyed by
//! ```text
//! [ flight_number bytes | 0x00 | created_ms: u64 big-endian | uuid: 16 bytes ]
//! ```
//!
//! Flight numbers are uppercase ASCII alphanumerics, so the 0x00 separator
//! keeps each flight's records in one contiguous range and `TK1` never
//! overlaps `TK10`. Within a flight, key order is creation order: the first
//! key in the range is the record that survives de-duplication.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, Table, TableDefinition};
use uuid::Uuid;

use crate::error::{Result, RosterError};
use crate::record::RosterRecord;

// ---------------------------------------------------------------------------
// Table definition
// ---------------------------------------------------------------------------

/// Value: JSON-encoded RosterRecord
const ROSTERS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("rosters");

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn record_key(flight: &str, created: DateTime<Utc>, id: Uuid) -> Vec<u8> {
    let mut key = Vec::with_capacity(flight.len() + 25);
    key.extend_from_slice(flight.as_bytes());
    key.push(0x00);
    let ms = created.timestamp_millis().max(0) as u64;
    key.extend_from_slice(&ms.to_be_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

/// Half-open key range covering every record of `flight`.
fn flight_bounds(flight: &str) -> (Vec<u8>, Vec<u8>) {
    let mut lower = flight.as_bytes().to_vec();
    lower.push(0x00);
    let mut upper = flight.as_bytes().to_vec();
    upper.push(0x01);
    (lower, upper)
}

fn db_err(e: impl std::fmt::Display) -> RosterError {
    RosterError::RosterDb(e.to_string())
}

type RosterTable<'txn> = Table<'txn, &'static [u8], &'static [u8]>;

fn put(table: &mut RosterTable<'_>, record: &RosterRecord) -> Result<()> {
    let key = record_key(&record.flight_number, record.created_at, record.id);
    let value = serde_json::to_vec(record).map_err(db_err)?;
    table
        .insert(key.as_slice(), value.as_slice())
        .map_err(db_err)?;
    Ok(())
}

/// Keep the earliest record for `flight` and remove the rest.
///
/// Returns the survivor (if any) and how many duplicates were removed.
fn heal(table: &mut RosterTable<'_>, flight: &str) -> Result<(Option<RosterRecord>, usize)> {
    let (lower, upper) = flight_bounds(flight);
    let mut keys: Vec<Vec<u8>> = Vec::new();
    let mut survivor: Option<RosterRecord> = None;
    for entry in table
        .range(lower.as_slice()..upper.as_slice())
        .map_err(db_err)?
    {
        let (k, v) = entry.map_err(db_err)?;
        if survivor.is_none() {
            survivor = Some(serde_json::from_slice(v.value()).map_err(db_err)?);
        } else {
            keys.push(k.value().to_vec());
        }
    }
    for key in &keys {
        table.remove(key.as_slice()).map_err(db_err)?;
    }
    Ok((survivor, keys.len()))
}

// ---------------------------------------------------------------------------
// RosterDb
// ---------------------------------------------------------------------------

/// Outcome of [`RosterDb::claim`].
#[derive(Debug, Clone)]
pub struct Claim {
    pub record: RosterRecord,
    /// Duplicate records removed while claiming.
    pub healed: usize,
    /// True when no record existed and a fresh one was created.
    pub created: bool,
}

pub struct RosterDb {
    db: Database,
}

impl RosterDb {
    /// Open or create the database at `path`, creating the table if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(ROSTERS).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    /// Write `record` under its own key without touching other records.
    pub fn insert(&self, record: &RosterRecord) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(ROSTERS).map_err(db_err)?;
            put(&mut table, record)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// Overwrite a record previously obtained from this store.
    pub fn store(&self, record: &RosterRecord) -> Result<()> {
        self.insert(record)
    }

    /// Get-or-create the single record for `flight` in one write transaction.
    ///
    /// Duplicates found along the way are deleted, keeping the earliest.
    /// redb serializes write transactions, so concurrent callers converge on
    /// the same record.
    pub fn claim(&self, flight: &str) -> Result<Claim> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let claim = {
            let mut table = wt.open_table(ROSTERS).map_err(db_err)?;
            match heal(&mut table, flight)? {
                (Some(record), healed) => Claim {
                    record,
                    healed,
                    created: false,
                },
                (None, _) => {
                    let record = RosterRecord::new(flight);
                    put(&mut table, &record)?;
                    Claim {
                        record,
                        healed: 0,
                        created: true,
                    }
                }
            }
        };
        wt.commit().map_err(db_err)?;
        Ok(claim)
    }

    /// The single record for `flight`, healing duplicates if present.
    pub fn resolve(&self, flight: &str) -> Result<RosterRecord> {
        self.resolve_healed(flight).map(|(record, _)| record)
    }

    /// Like [`resolve`](Self::resolve), also reporting how many duplicates were removed.
    pub fn resolve_healed(&self, flight: &str) -> Result<(RosterRecord, usize)> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let (survivor, healed) = {
            let mut table = wt.open_table(ROSTERS).map_err(db_err)?;
            heal(&mut table, flight)?
        };
        match survivor {
            Some(record) => {
                wt.commit().map_err(db_err)?;
                Ok((record, healed))
            }
            None => {
                wt.abort().map_err(db_err)?;
                Err(RosterError::RosterNotFound(flight.to_string()))
            }
        }
    }

    /// Every stored record for `flight` in creation order, duplicates included.
    pub fn list_for(&self, flight: &str) -> Result<Vec<RosterRecord>> {
        let (lower, upper) = flight_bounds(flight);
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ROSTERS).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table
            .range(lower.as_slice()..upper.as_slice())
            .map_err(db_err)?
        {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice(v.value()).map_err(db_err)?);
        }
        Ok(result)
    }

    /// All records, ordered by flight number then creation time.
    pub fn list(&self) -> Result<Vec<RosterRecord>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ROSTERS).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice(v.value()).map_err(db_err)?);
        }
        Ok(result)
    }

    /// Remove every record for `flight`. Returns how many were removed.
    pub fn delete(&self, flight: &str) -> Result<usize> {
        let (lower, upper) = flight_bounds(flight);
        let wt = self.db.begin_write().map_err(db_err)?;
        let removed = {
            let mut table = wt.open_table(ROSTERS).map_err(db_err)?;
            let mut keys: Vec<Vec<u8>> = Vec::new();
            for entry in table
                .range(lower.as_slice()..upper.as_slice())
                .map_err(db_err)?
            {
                let (k, _) = entry.map_err(db_err)?;
                keys.push(k.value().to_vec());
            }
            for key in &keys {
                table.remove(key.as_slice()).map_err(db_err)?;
            }
            keys.len()
        };
        wt.commit().map_err(db_err)?;
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as CDur;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, RosterDb) {
        let dir = TempDir::new().unwrap();
        let db = RosterDb::open(&dir.path().join(".roster/rosters.redb")).unwrap();
        (dir, db)
    }

    fn created_at(flight: &str, ts: DateTime<Utc>) -> RosterRecord {
        let mut record = RosterRecord::new(flight);
        record.created_at = ts;
        record.updated_at = ts;
        record
    }

    #[test]
    fn claim_creates_then_reuses() {
        let (_dir, db) = open_tmp();
        let first = db.claim("TK1001").unwrap();
        assert!(first.created);
        assert_eq!(first.healed, 0);

        let second = db.claim("TK1001").unwrap();
        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(db.list_for("TK1001").unwrap().len(), 1);
    }

    #[test]
    fn claim_keeps_earliest_and_removes_duplicates() {
        let (_dir, db) = open_tmp();
        let now = Utc::now();
        // inserted out of order on purpose
        let middle = created_at("TK1001", now - CDur::seconds(20));
        let newest = created_at("TK1001", now);
        let oldest = created_at("TK1001", now - CDur::seconds(60));
        for r in [&middle, &newest, &oldest] {
            db.insert(r).unwrap();
        }
        assert_eq!(db.list_for("TK1001").unwrap().len(), 3);

        let claim = db.claim("TK1001").unwrap();
        assert_eq!(claim.record.id, oldest.id);
        assert_eq!(claim.healed, 2);

        let remaining = db.list_for("TK1001").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, oldest.id);
    }

    #[test]
    fn resolve_heals_and_reports_missing() {
        let (_dir, db) = open_tmp();
        let err = db.resolve("BA9").unwrap_err();
        assert!(matches!(err, RosterError::RosterNotFound(ref f) if f == "BA9"));

        let now = Utc::now();
        let a = created_at("BA9", now - CDur::seconds(5));
        let b = created_at("BA9", now);
        db.insert(&b).unwrap();
        db.insert(&a).unwrap();

        let (record, healed) = db.resolve_healed("BA9").unwrap();
        assert_eq!(record.id, a.id);
        assert_eq!(healed, 1);
        assert_eq!(db.resolve("BA9").unwrap().id, a.id);
    }

    #[test]
    fn store_overwrites_in_place() {
        let (_dir, db) = open_tmp();
        let mut record = db.claim("TK1001").unwrap().record;
        record.menu = Some("Lamb Tagine (Prepared by Chef Mert Aydin)".into());
        db.store(&record).unwrap();

        let stored = db.list_for("TK1001").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].menu, record.menu);
    }

    #[test]
    fn flight_prefixes_do_not_overlap() {
        let (_dir, db) = open_tmp();
        db.claim("TK1").unwrap();
        db.claim("TK10").unwrap();
        db.claim("TK2").unwrap();

        assert_eq!(db.list_for("TK1").unwrap().len(), 1);
        assert_eq!(db.delete("TK1").unwrap(), 1);
        let flights: Vec<String> = db
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.flight_number)
            .collect();
        assert_eq!(flights, vec!["TK10", "TK2"]);
    }

    #[test]
    fn delete_missing_flight_is_zero() {
        let (_dir, db) = open_tmp();
        assert_eq!(db.delete("NOPE").unwrap(), 0);
    }

    #[test]
    fn concurrent_claims_converge() {
        let (_dir, db) = open_tmp();
        let db = Arc::new(db);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || db.claim("TK1001").unwrap().record.id)
            })
            .collect();
        let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(db.list_for("TK1001").unwrap().len(), 1);
    }
}
