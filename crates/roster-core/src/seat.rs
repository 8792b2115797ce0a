//! Seat codes, cabin layout, and the per-class seat pool.
//!
//! Business occupies rows 1–5 in a 2-2 layout (`A C | D F`); economy occupies
//! rows 6–30 in a 3-3 layout (`A B C | D E F`). The row ranges are disjoint,
//! so membership in a class pool is enough to guarantee class containment.

use crate::error::{Result, RosterError};
use crate::types::SeatClass;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::OnceLock;

pub const STANDBY: &str = "STANDBY";
pub const INFANT: &str = "INFANT";

const BUSINESS_COLUMNS: &[char] = &['A', 'C', 'D', 'F'];
const ECONOMY_COLUMNS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F'];

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

impl SeatClass {
    pub fn rows(self) -> RangeInclusive<u16> {
        match self {
            SeatClass::Business => 1..=5,
            SeatClass::Economy => 6..=30,
        }
    }

    /// Columns left to right.
    pub fn columns(self) -> &'static [char] {
        match self {
            SeatClass::Business => BUSINESS_COLUMNS,
            SeatClass::Economy => ECONOMY_COLUMNS,
        }
    }

    /// Class a seat belongs to by row, if any.
    pub fn of(seat: SeatCode) -> Option<SeatClass> {
        [SeatClass::Business, SeatClass::Economy]
            .into_iter()
            .find(|class| {
                class.rows().contains(&seat.row) && class.columns().contains(&seat.column)
            })
    }
}

// ---------------------------------------------------------------------------
// SeatCode
// ---------------------------------------------------------------------------

/// A concrete seat: row number and column letter, e.g. `10A`.
///
/// Ordering is row-major, which keeps pools and storage deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatCode {
    pub row: u16,
    pub column: char,
}

impl SeatCode {
    pub fn new(row: u16, column: char) -> Self {
        Self { row, column }
    }
}

fn seat_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)([A-Z])$").unwrap())
}

impl FromStr for SeatCode {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = seat_re()
            .captures(s.trim())
            .ok_or_else(|| RosterError::InvalidSeat(s.to_string()))?;
        let row: u16 = caps[1]
            .parse()
            .map_err(|_| RosterError::InvalidSeat(s.to_string()))?;
        if row == 0 {
            return Err(RosterError::InvalidSeat(s.to_string()));
        }
        let column = caps[2]
            .chars()
            .next()
            .ok_or_else(|| RosterError::InvalidSeat(s.to_string()))?;
        Ok(Self { row, column })
    }
}

impl fmt::Display for SeatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl Serialize for SeatCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// SeatState
// ---------------------------------------------------------------------------

/// Seat held by a passenger on a roster.
///
/// `Standby` and `Infant` are placeholders and never occupy a seat. On the
/// wire they are the strings `"STANDBY"` and `"INFANT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatState {
    Assigned(SeatCode),
    Standby,
    Infant,
}

impl SeatState {
    pub fn seat(&self) -> Option<SeatCode> {
        match self {
            SeatState::Assigned(code) => Some(*code),
            SeatState::Standby | SeatState::Infant => None,
        }
    }
}

impl fmt::Display for SeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatState::Assigned(code) => fmt::Display::fmt(code, f),
            SeatState::Standby => f.write_str(STANDBY),
            SeatState::Infant => f.write_str(INFANT),
        }
    }
}

impl FromStr for SeatState {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            STANDBY => Ok(SeatState::Standby),
            INFANT => Ok(SeatState::Infant),
            other => other.parse().map(SeatState::Assigned),
        }
    }
}

impl Serialize for SeatState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// SeatPool
// ---------------------------------------------------------------------------

/// Free seats of one class.
#[derive(Debug, Clone)]
pub struct SeatPool {
    class: SeatClass,
    free: BTreeSet<SeatCode>,
}

impl SeatPool {
    /// Every seat of `class`, minus `occupied`.
    pub fn new<'a>(class: SeatClass, occupied: impl IntoIterator<Item = &'a SeatCode>) -> Self {
        let mut free: BTreeSet<SeatCode> = class
            .rows()
            .flat_map(|row| class.columns().iter().map(move |&col| SeatCode::new(row, col)))
            .collect();
        for seat in occupied {
            free.remove(seat);
        }
        Self { class, free }
    }

    pub fn contains(&self, seat: SeatCode) -> bool {
        self.free.contains(&seat)
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Same-row neighbours of `seat` within this class's columns, left first.
    ///
    /// Returns nothing when the column is not part of the class layout.
    pub fn side_neighbours(&self, seat: SeatCode) -> Vec<SeatCode> {
        let cols = self.class.columns();
        let Some(idx) = cols.iter().position(|&c| c == seat.column) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(2);
        if idx > 0 {
            out.push(SeatCode::new(seat.row, cols[idx - 1]));
        }
        if idx + 1 < cols.len() {
            out.push(SeatCode::new(seat.row, cols[idx + 1]));
        }
        out
    }

    /// Same-column seats one row in front, then one row behind.
    ///
    /// Only rows of this class are considered, so a seat far outside the cabin
    /// yields nothing.
    pub fn row_neighbours(&self, seat: SeatCode) -> Vec<SeatCode> {
        if !self.class.columns().contains(&seat.column) {
            return Vec::new();
        }
        let rows = self.class.rows();
        [seat.row.checked_sub(1), seat.row.checked_add(1)]
            .into_iter()
            .flatten()
            .filter(|row| rows.contains(row))
            .map(|row| SeatCode::new(row, seat.column))
            .collect()
    }

    /// Uniformly random free seat.
    pub fn pick_random(&self, rng: &mut impl Rng) -> Option<SeatCode> {
        if self.free.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.free.len());
        self.free.iter().nth(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seat(s: &str) -> SeatCode {
        s.parse().unwrap()
    }

    fn full(class: SeatClass) -> SeatPool {
        SeatPool::new(class, std::iter::empty())
    }

    #[test]
    fn parse_and_display() {
        let code = seat("10A");
        assert_eq!(code, SeatCode::new(10, 'A'));
        assert_eq!(code.to_string(), "10A");
        assert!("A10".parse::<SeatCode>().is_err());
        assert!("10".parse::<SeatCode>().is_err());
        assert!("0A".parse::<SeatCode>().is_err());
        assert!("10a".parse::<SeatCode>().is_err());
    }

    #[test]
    fn seat_state_uses_sentinels_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&SeatState::Standby).unwrap(),
            "\"STANDBY\""
        );
        let s: SeatState = serde_json::from_str("\"INFANT\"").unwrap();
        assert_eq!(s, SeatState::Infant);
        let s: SeatState = serde_json::from_str("\"12C\"").unwrap();
        assert_eq!(s.seat(), Some(SeatCode::new(12, 'C')));
    }

    #[test]
    fn pool_sizes_match_layout() {
        let business = full(SeatClass::Business);
        assert_eq!(business.free.len(), 5 * 4);
        let economy = full(SeatClass::Economy);
        assert_eq!(economy.free.len(), 25 * 6);
    }

    #[test]
    fn pool_excludes_occupied() {
        let occupied = [seat("6A"), seat("1A")];
        let pool = SeatPool::new(SeatClass::Economy, &occupied);
        assert!(!pool.contains(seat("6A")));
        assert!(pool.contains(seat("6B")));
        assert!(!pool.contains(seat("1A")));
        assert_eq!(pool.free.len(), 149);
    }

    #[test]
    fn business_pool_never_holds_economy_rows() {
        let pool = full(SeatClass::Business);
        assert!(!pool.contains(seat("6A")));
        assert!(!pool.contains(seat("1B")));
        assert!(pool.contains(seat("5F")));
    }

    #[test]
    fn side_neighbours_respect_layout() {
        let business = full(SeatClass::Business);
        assert_eq!(
            business.side_neighbours(seat("2C")),
            vec![seat("2A"), seat("2D")]
        );
        assert_eq!(business.side_neighbours(seat("2A")), vec![seat("2C")]);
        assert!(business.side_neighbours(seat("2B")).is_empty());

        let economy = full(SeatClass::Economy);
        assert_eq!(economy.side_neighbours(seat("10F")), vec![seat("10E")]);
    }

    #[test]
    fn class_of_seat() {
        assert_eq!(SeatClass::of(seat("3D")), Some(SeatClass::Business));
        assert_eq!(SeatClass::of(seat("3B")), None);
        assert_eq!(SeatClass::of(seat("30F")), Some(SeatClass::Economy));
        assert_eq!(SeatClass::of(seat("31A")), None);
    }

    #[test]
    fn random_pick_is_seeded_and_in_pool() {
        let pool = full(SeatClass::Economy);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first = pool.pick_random(&mut a).unwrap();
        assert_eq!(Some(first), pool.pick_random(&mut b));
        assert!(pool.contains(first));
    }

    #[test]
    fn row_neighbours_stay_inside_the_class() {
        let economy = full(SeatClass::Economy);
        assert_eq!(economy.row_neighbours(seat("10A")), vec![seat("9A"), seat("11A")]);
        assert_eq!(economy.row_neighbours(seat("6A")), vec![seat("7A")]);
        assert_eq!(economy.row_neighbours(seat("30F")), vec![seat("29F")]);

        let business = full(SeatClass::Business);
        assert_eq!(business.row_neighbours(seat("5C")), vec![seat("4C")]);
        assert!(business.row_neighbours(seat("3B")).is_empty());
    }

    #[test]
    fn row_neighbours_of_last_row_number_do_not_overflow() {
        let economy = full(SeatClass::Economy);
        assert!(economy.row_neighbours(SeatCode::new(u16::MAX, 'A')).is_empty());
        assert!(economy.row_neighbours(SeatCode::new(1, 'A')).is_empty());
    }
}
