use crate::record::{directory_seat_state, CrewAssignment, RosterRecord};
use crate::seat::{SeatCode, SeatState};
use crate::types::{
    Attendant, Endpoint, FlightContext, PassengerId, PassengerRecord, Pilot, SeatClass,
    SharedFlight,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RosterView
// ---------------------------------------------------------------------------

/// The unified roster for one flight, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterView {
    pub flight_info: FlightInfo,
    pub stats: RosterStats,
    pub crew: Vec<CrewAssignment>,
    pub passengers: Vec<PassengerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub number: String,
    pub vehicle: String,
    pub capacity: u32,
    pub menu: String,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub datetime: Option<DateTime<Utc>>,
    /// Minutes.
    pub duration: u32,
    /// Kilometres.
    pub distance: f64,
    pub shared_flight: Option<SharedFlight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStats {
    pub total_passengers: usize,
    pub total_crew: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerView {
    pub id: PassengerId,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub seat_number: SeatState,
    #[serde(rename = "type")]
    pub seat_class: SeatClass,
    pub is_infant: bool,
    pub affiliated_passengers: Vec<PassengerId>,
    pub parent_id: Option<PassengerId>,
}

impl PassengerView {
    pub fn new(p: &PassengerRecord, seat: SeatState) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            age: p.age,
            gender: p.gender.clone(),
            nationality: p.nationality.clone(),
            seat_number: seat,
            seat_class: p.seat_class,
            is_infant: p.is_infant,
            affiliated_passengers: p.affiliated_passengers.clone(),
            parent_id: p.parent_id,
        }
    }
}

impl RosterView {
    /// Merge the stored record with current directory passengers.
    ///
    /// Crew and menu come from the record. A concrete seat on the record
    /// overrides whatever the directory reports for that passenger.
    pub fn assemble(
        flight: &FlightContext,
        record: &RosterRecord,
        passengers: &[PassengerRecord],
        fallback_menu: &str,
    ) -> Self {
        let passengers: Vec<PassengerView> = passengers
            .iter()
            .map(|p| {
                let seat = match record.seat_of(p.id) {
                    Some(SeatState::Assigned(code)) if !p.is_infant => SeatState::Assigned(code),
                    _ => directory_seat_state(p),
                };
                PassengerView::new(p, seat)
            })
            .collect();

        let menu = record
            .menu
            .clone()
            .or_else(|| flight.aircraft.standard_menu.clone())
            .unwrap_or_else(|| fallback_menu.to_string());

        Self {
            flight_info: FlightInfo::new(flight, menu),
            stats: RosterStats {
                total_passengers: passengers.len(),
                total_crew: record.crew.len(),
            },
            crew: record.crew.clone(),
            passengers,
        }
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&PassengerView> {
        self.passengers.iter().find(|p| p.id == id)
    }
}

impl FlightInfo {
    pub fn new(flight: &FlightContext, menu: String) -> Self {
        Self {
            number: flight.flight_number.clone(),
            vehicle: flight.aircraft.name.clone(),
            capacity: flight.aircraft.seat_capacity,
            menu,
            source: flight.source.clone(),
            destination: flight.destination.clone(),
            datetime: flight.departure,
            duration: flight.duration_minutes,
            distance: flight.distance,
            shared_flight: flight.shared.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Result of a seat assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub seat: SeatCode,
    pub passenger: String,
}

/// Crew eligible for manual selection on a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableCrew {
    pub vehicle: String,
    pub flight_distance: f64,
    pub pilots: Vec<Pilot>,
    pub attendants: Vec<Attendant>,
}

/// Every pilot and attendant in the crew directory, regardless of aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewListing {
    pub pilots: Vec<Pilot>,
    pub attendants: Vec<Attendant>,
}

/// Headline counts across the whole engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_active_crew: usize,
    pub saved_rosters_count: usize,
}

/// Result of replacing the pilots on a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotUpdate {
    pub flight_number: String,
    pub pilots: Vec<CrewAssignment>,
}
