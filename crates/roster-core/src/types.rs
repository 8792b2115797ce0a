use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type CrewId = u64;
pub type PassengerId = u64;

// ---------------------------------------------------------------------------
// SeatClass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    Business,
    #[default]
    Economy,
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatClass::Business => "business",
            SeatClass::Economy => "economy",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Crew roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Seniority {
    Senior,
    Junior,
    Trainee,
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Seniority::Senior => "SENIOR",
            Seniority::Junior => "JUNIOR",
            Seniority::Trainee => "TRAINEE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendantType {
    Chief,
    Regular,
    Chef,
}

impl fmt::Display for AttendantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttendantType::Chief => "CHIEF",
            AttendantType::Regular => "REGULAR",
            AttendantType::Chef => "CHEF",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewCategory {
    Pilot,
    Cabin,
}

impl fmt::Display for CrewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrewCategory::Pilot => "PILOT",
            CrewCategory::Cabin => "CABIN",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Crew candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: CrewId,
    pub name: String,
    pub seniority: Seniority,
    /// Aircraft type name this pilot is certified for.
    pub aircraft: String,
    /// Maximum flight distance in km.
    #[serde(alias = "allowed_range")]
    pub range: f64,
}

impl Pilot {
    pub fn can_fly(&self, distance: f64) -> bool {
        self.range >= distance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendant {
    pub id: CrewId,
    pub name: String,
    #[serde(rename = "type", alias = "attendant_type")]
    pub kind: AttendantType,
    /// Aircraft type names this attendant may serve on.
    #[serde(default)]
    pub aircraft: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    pub chef_id: CrewId,
}

// ---------------------------------------------------------------------------
// Flight context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftType {
    pub name: String,
    #[serde(default, alias = "number_of_seats")]
    pub seat_capacity: u32,
    /// Total crew target (pilots + cabin). Falls back to the engine default.
    #[serde(default, alias = "max_crew")]
    pub target_crew_size: Option<u32>,
    #[serde(default)]
    pub standard_menu: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub airport_code: String,
    #[serde(default)]
    pub airport_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Code-share partner information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedFlight {
    pub airline: String,
    pub flight_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightContext {
    pub flight_number: String,
    /// Great-circle distance in km.
    #[serde(default, deserialize_with = "deserialize_distance")]
    pub distance: f64,
    pub aircraft: AircraftType,
    #[serde(default)]
    pub source: Endpoint,
    #[serde(default)]
    pub destination: Endpoint,
    #[serde(default)]
    pub departure: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub shared: Option<SharedFlight>,
}

/// Strip everything but digits and dots, then parse: `"2340 km"` → `2340.0`.
///
/// Returns `0.0` when nothing numeric remains.
pub fn parse_distance(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

fn deserialize_distance<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDistance {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawDistance>::deserialize(deserializer)? {
        Some(RawDistance::Number(n)) => n,
        Some(RawDistance::Text(s)) => parse_distance(&s),
        None => 0.0,
    })
}

// ---------------------------------------------------------------------------
// Passengers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRecord {
    #[serde(alias = "passenger_id")]
    pub id: PassengerId,
    pub flight_number: String,
    pub name: String,
    #[serde(default, alias = "seat_type")]
    pub seat_class: SeatClass,
    /// Seat as recorded by the passenger directory, if any.
    #[serde(default)]
    pub seat_number: Option<String>,
    #[serde(default)]
    pub is_infant: bool,
    #[serde(default)]
    pub affiliated_passengers: Vec<PassengerId>,
    #[serde(default, alias = "parent")]
    pub parent_id: Option<PassengerId>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}
