//! Seat allocation for a single passenger.
//!
//! The allocator builds the free pool for the passenger's class, tries to
//! seat them next to an affiliate, and otherwise draws a random free seat.
//! It never crosses classes: an exhausted pool is an error, not an upgrade.

use crate::error::{Result, RosterError};
use crate::record::{directory_seat_state, RosterRecord};
use crate::seat::{SeatCode, SeatPool, SeatState};
use crate::types::{PassengerId, PassengerRecord};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// CabinSnapshot
// ---------------------------------------------------------------------------

/// Who sits where on one flight, merged from the passenger directory and the
/// roster record.
///
/// A seat recorded on the roster wins over the directory's seat for the same
/// passenger, but both count as occupied: a seat the directory still holds is
/// never handed to someone else.
#[derive(Debug, Clone, Default)]
pub struct CabinSnapshot {
    seats: HashMap<PassengerId, SeatCode>,
    occupied: BTreeSet<SeatCode>,
}

impl CabinSnapshot {
    pub fn new(passengers: &[PassengerRecord], record: Option<&RosterRecord>) -> Self {
        let mut snapshot = Self::default();
        for p in passengers {
            if let SeatState::Assigned(code) = directory_seat_state(p) {
                snapshot.seats.insert(p.id, code);
                snapshot.occupied.insert(code);
            }
        }
        if let Some(record) = record {
            for row in &record.passengers {
                if let SeatState::Assigned(code) = row.seat {
                    snapshot.seats.insert(row.passenger_id, code);
                    snapshot.occupied.insert(code);
                }
            }
        }
        snapshot
    }

    pub fn seat_of(&self, passenger_id: PassengerId) -> Option<SeatCode> {
        self.seats.get(&passenger_id).copied()
    }

    pub fn occupied(&self) -> impl Iterator<Item = &SeatCode> {
        self.occupied.iter()
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Same row, adjacent column to an affiliate.
    Beside(PassengerId),
    /// Same column, one row in front of or behind an affiliate.
    Near(PassengerId),
    /// No affiliate seat was usable.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub seat: SeatCode,
    pub placement: Placement,
}

/// Choose a seat for `target` in its own class.
///
/// Affiliates are tried in the order listed on the passenger. For each, the
/// left then right neighbour is tried; only when no affiliate has a free
/// side-by-side seat are the seats in front and behind considered. The
/// fallback is a uniformly random free seat of the class.
pub fn allocate(
    target: &PassengerRecord,
    cabin: &CabinSnapshot,
    rng: &mut impl Rng,
) -> Result<Allocation> {
    let pool = SeatPool::new(target.seat_class, cabin.occupied());
    if pool.is_empty() {
        return Err(RosterError::SeatPoolExhausted(target.seat_class.to_string()));
    }

    let affiliates: Vec<(PassengerId, SeatCode)> = target
        .affiliated_passengers
        .iter()
        .filter_map(|&id| cabin.seat_of(id).map(|seat| (id, seat)))
        .collect();

    for &(id, seat) in &affiliates {
        if let Some(found) = first_free(&pool, pool.side_neighbours(seat)) {
            return Ok(Allocation {
                seat: found,
                placement: Placement::Beside(id),
            });
        }
    }
    for &(id, seat) in &affiliates {
        if let Some(found) = first_free(&pool, pool.row_neighbours(seat)) {
            return Ok(Allocation {
                seat: found,
                placement: Placement::Near(id),
            });
        }
    }

    pool.pick_random(rng)
        .map(|seat| Allocation {
            seat,
            placement: Placement::Random,
        })
        .ok_or_else(|| RosterError::SeatPoolExhausted(target.seat_class.to_string()))
}

fn first_free(pool: &SeatPool, candidates: Vec<SeatCode>) -> Option<SeatCode> {
    candidates.into_iter().find(|s| pool.contains(*s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeatClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn passenger(id: PassengerId, class: SeatClass, seat: Option<&str>) -> PassengerRecord {
        PassengerRecord {
            id,
            flight_number: "TK1001".into(),
            name: format!("Passenger {id}"),
            seat_class: class,
            seat_number: seat.map(str::to_string),
            is_infant: false,
            affiliated_passengers: Vec::new(),
            parent_id: None,
            age: None,
            gender: None,
            nationality: None,
        }
    }

    fn with_affiliates(mut p: PassengerRecord, ids: &[PassengerId]) -> PassengerRecord {
        p.affiliated_passengers = ids.to_vec();
        p
    }

    fn seat(s: &str) -> SeatCode {
        s.parse().unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn sits_beside_affiliate() {
        let parent = passenger(1, SeatClass::Economy, Some("10A"));
        let child = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![parent, child.clone()];
        let cabin = CabinSnapshot::new(&all, None);

        let got = allocate(&child, &cabin, &mut rng()).unwrap();
        assert_eq!(got.seat, seat("10B"));
        assert_eq!(got.placement, Placement::Beside(1));
    }

    #[test]
    fn left_is_preferred_over_right() {
        let friend = passenger(1, SeatClass::Economy, Some("12C"));
        let me = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![friend, me.clone()];
        let got = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.seat, seat("12B"));
    }

    #[test]
    fn falls_back_to_front_or_behind_when_row_is_full() {
        let parent = passenger(1, SeatClass::Economy, Some("10A"));
        let blocker = passenger(3, SeatClass::Economy, Some("10B"));
        let child = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![parent, blocker, child.clone()];

        let got = allocate(&child, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.seat, seat("9A"));
        assert_eq!(got.placement, Placement::Near(1));

        let front = passenger(4, SeatClass::Economy, Some("9A"));
        let all = vec![
            all[0].clone(),
            all[1].clone(),
            front,
            child.clone(),
        ];
        let got = allocate(&child, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.seat, seat("11A"));
    }

    #[test]
    fn random_when_no_adjacent_seat_is_free() {
        let parent = passenger(1, SeatClass::Economy, Some("10A"));
        let mut all = vec![parent];
        for (i, s) in ["10B", "9A", "11A"].into_iter().enumerate() {
            all.push(passenger(10 + i as u64, SeatClass::Economy, Some(s)));
        }
        let child = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        all.push(child.clone());

        let got = allocate(&child, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.placement, Placement::Random);
        assert!(SeatClass::Economy.rows().contains(&got.seat.row));
        for taken in ["10A", "10B", "9A", "11A"] {
            assert_ne!(got.seat, seat(taken));
        }
    }

    #[test]
    fn affiliate_in_other_class_is_not_followed() {
        // a business affiliate must not pull an economy passenger forward
        let boss = passenger(1, SeatClass::Business, Some("5A"));
        let me = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![boss, me.clone()];
        let got = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert!(got.seat.row >= 6, "got {}", got.seat);
        assert_ne!(got.placement, Placement::Beside(1));
    }

    #[test]
    fn business_column_outside_layout_is_skipped() {
        let friend = passenger(1, SeatClass::Economy, Some("10B"));
        let me = with_affiliates(passenger(2, SeatClass::Business, None), &[1]);
        let all = vec![friend, me.clone()];
        let got = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.placement, Placement::Random);
        assert!(got.seat.row <= 5);
    }

    #[test]
    fn affiliates_tried_in_order() {
        let a = passenger(1, SeatClass::Economy, Some("20A"));
        let b = passenger(3, SeatClass::Economy, Some("25F"));
        let me = with_affiliates(passenger(2, SeatClass::Economy, None), &[3, 1]);
        let all = vec![a, b, me.clone()];
        let got = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.seat, seat("25E"));
        assert_eq!(got.placement, Placement::Beside(3));
    }

    #[test]
    fn exhausted_business_is_capacity_error() {
        let mut all: Vec<PassengerRecord> = Vec::new();
        let mut id = 100;
        for row in SeatClass::Business.rows() {
            for &col in SeatClass::Business.columns() {
                all.push(passenger(
                    id,
                    SeatClass::Business,
                    Some(&SeatCode::new(row, col).to_string()),
                ));
                id += 1;
            }
        }
        let me = passenger(1, SeatClass::Business, None);
        all.push(me.clone());
        let err = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap_err();
        assert!(matches!(err, RosterError::SeatPoolExhausted(ref c) if c == "business"));
    }

    #[test]
    fn roster_seats_count_as_occupied() {
        let mut record = RosterRecord::new("TK1001");
        let friend = passenger(1, SeatClass::Economy, None);
        record.passengers = vec![crate::record::PassengerAssignment::from_directory(&friend)];
        record.set_seat(1, seat("15D"));

        let me = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![friend, me.clone()];
        let cabin = CabinSnapshot::new(&all, Some(&record));
        assert!(cabin.occupied.contains(&seat("15D")));

        let got = allocate(&me, &cabin, &mut rng()).unwrap();
        assert_eq!(got.seat, seat("15C"));
    }

    #[test]
    fn affiliate_far_outside_the_cabin_falls_back_to_random() {
        let friend = passenger(1, SeatClass::Economy, Some("65535A"));
        let me = with_affiliates(passenger(2, SeatClass::Economy, None), &[1]);
        let all = vec![friend, me.clone()];

        let got = allocate(&me, &CabinSnapshot::new(&all, None), &mut rng()).unwrap();
        assert_eq!(got.placement, Placement::Random);
        assert_eq!(SeatClass::of(got.seat), Some(SeatClass::Economy));
    }

    #[test]
    fn infants_and_standby_occupy_nothing() {
        let mut infant = passenger(1, SeatClass::Economy, Some("6A"));
        infant.is_infant = true;
        let standby = passenger(2, SeatClass::Economy, None);
        let cabin = CabinSnapshot::new(&[infant, standby], None);
        assert_eq!(cabin.occupied().count(), 0);
    }

    #[test]
    fn seeded_fallback_is_deterministic() {
        let me = passenger(1, SeatClass::Economy, None);
        let cabin = CabinSnapshot::new(std::slice::from_ref(&me), None);
        let a = allocate(&me, &cabin, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = allocate(&me, &cabin, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
