use crate::seat::{SeatCode, SeatState};
use crate::types::{Attendant, CrewCategory, CrewId, PassengerId, PassengerRecord, Pilot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CrewAssignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewAssignment {
    pub original_id: CrewId,
    pub name: String,
    /// Seniority for pilots, attendant type for cabin crew.
    pub role: String,
    #[serde(rename = "type")]
    pub category: CrewCategory,
}

impl CrewAssignment {
    pub fn pilot(p: &Pilot) -> Self {
        Self {
            original_id: p.id,
            name: p.name.clone(),
            role: p.seniority.to_string(),
            category: CrewCategory::Pilot,
        }
    }

    pub fn cabin(a: &Attendant) -> Self {
        Self {
            original_id: a.id,
            name: a.name.clone(),
            role: a.kind.to_string(),
            category: CrewCategory::Cabin,
        }
    }
}

// ---------------------------------------------------------------------------
// PassengerAssignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerAssignment {
    pub passenger_id: PassengerId,
    pub name: String,
    pub seat: SeatState,
}

impl PassengerAssignment {
    /// Normalize directory seat state for a rebuild: infants get `INFANT`,
    /// a known seat is kept, everyone else is `STANDBY`.
    pub fn from_directory(p: &PassengerRecord) -> Self {
        Self {
            passenger_id: p.id,
            name: p.name.clone(),
            seat: directory_seat_state(p),
        }
    }
}

/// Seat state as the passenger directory reports it.
///
/// A seat string that is not a valid code is treated as no seat.
pub fn directory_seat_state(p: &PassengerRecord) -> SeatState {
    if p.is_infant {
        return SeatState::Infant;
    }
    match p.seat_number.as_deref().map(str::parse::<SeatCode>) {
        Some(Ok(code)) => SeatState::Assigned(code),
        Some(Err(_)) => {
            tracing::warn!(
                passenger = p.id,
                seat = p.seat_number.as_deref().unwrap_or_default(),
                "ignoring malformed directory seat"
            );
            SeatState::Standby
        }
        None => SeatState::Standby,
    }
}

// ---------------------------------------------------------------------------
// RosterRecord
// ---------------------------------------------------------------------------

/// The engine's own state for one flight.
///
/// Exactly one record per flight number is expected at rest; the store heals
/// duplicates by keeping the earliest-created record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: Uuid,
    pub flight_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub menu: Option<String>,
    #[serde(default)]
    pub crew: Vec<CrewAssignment>,
    #[serde(default)]
    pub passengers: Vec<PassengerAssignment>,
}

impl RosterRecord {
    pub fn new(flight_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            flight_number: flight_number.into(),
            created_at: now,
            updated_at: now,
            menu: None,
            crew: Vec::new(),
            passengers: Vec::new(),
        }
    }

    /// Discard every crew and passenger row and replace them.
    pub fn rebuild(
        &mut self,
        crew: Vec<CrewAssignment>,
        passengers: Vec<PassengerAssignment>,
        menu: String,
    ) {
        self.crew = crew;
        self.passengers = passengers;
        self.menu = Some(menu);
        self.updated_at = Utc::now();
    }

    /// Swap the pilot rows, leaving cabin crew untouched. Pilots stay first.
    pub fn replace_pilots(&mut self, pilots: Vec<CrewAssignment>) {
        let cabin: Vec<CrewAssignment> = self
            .crew
            .drain(..)
            .filter(|c| c.category == CrewCategory::Cabin)
            .collect();
        self.crew = pilots;
        self.crew.extend(cabin);
        self.updated_at = Utc::now();
    }

    pub fn pilots(&self) -> impl Iterator<Item = &CrewAssignment> {
        self.crew
            .iter()
            .filter(|c| c.category == CrewCategory::Pilot)
    }

    pub fn seat_of(&self, passenger_id: PassengerId) -> Option<SeatState> {
        self.passengers
            .iter()
            .find(|p| p.passenger_id == passenger_id)
            .map(|p| p.seat)
    }

    /// Record a seat for a passenger. Returns `false` if the passenger is not on the roster.
    pub fn set_seat(&mut self, passenger_id: PassengerId, seat: SeatCode) -> bool {
        match self
            .passengers
            .iter_mut()
            .find(|p| p.passenger_id == passenger_id)
        {
            Some(p) => {
                p.seat = SeatState::Assigned(seat);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}
