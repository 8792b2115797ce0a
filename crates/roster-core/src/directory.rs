//! Collaborator interfaces for flight, crew, and passenger master data.
//!
//! The engine only reads through these traits (plus one seat write-back).
//! `FixtureDirectory` backs all three from a single YAML document, which is
//! what the CLI and the tests use.

use crate::error::{Result, RosterError};
use crate::seat::SeatCode;
use crate::types::{
    Attendant, CrewId, FlightContext, PassengerId, PassengerRecord, Pilot, Recipe,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub trait FlightDirectory: Send + Sync {
    fn list_flights(&self) -> Result<Vec<FlightContext>>;
}

pub trait CrewDirectory: Send + Sync {
    /// Pilots certified for the named aircraft type.
    fn pilots_for_aircraft(&self, aircraft: &str) -> Result<Vec<Pilot>>;
    /// Cabin attendants who may serve on the named aircraft type.
    fn attendants_for_aircraft(&self, aircraft: &str) -> Result<Vec<Attendant>>;
    fn recipes_for_chef(&self, chef_id: CrewId) -> Result<Vec<Recipe>>;
    fn all_pilots(&self) -> Result<Vec<Pilot>>;
    fn all_attendants(&self) -> Result<Vec<Attendant>>;
}

pub trait PassengerDirectory: Send + Sync {
    fn list_passengers(&self, flight_number: &str) -> Result<Vec<PassengerRecord>>;
    fn update_seat(&self, passenger_id: PassengerId, seat: SeatCode) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FixtureDirectory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryData {
    #[serde(default)]
    pub flights: Vec<FlightContext>,
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    #[serde(default)]
    pub attendants: Vec<Attendant>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub passengers: Vec<PassengerRecord>,
}

/// All three directories over one YAML document.
///
/// Seat updates are written back to the file when the directory was loaded
/// from one.
#[derive(Debug)]
pub struct FixtureDirectory {
    data: Mutex<DirectoryData>,
    path: Option<PathBuf>,
}

impl FixtureDirectory {
    pub fn new(data: DirectoryData) -> Self {
        Self {
            data: Mutex::new(data),
            path: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RosterError::Directory(format!(
                "directory file not found: {}",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        let data: DirectoryData = serde_yaml::from_str(&raw)?;
        Ok(Self {
            data: Mutex::new(data),
            path: Some(path.to_path_buf()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryData>> {
        self.data
            .lock()
            .map_err(|_| RosterError::Directory("directory lock poisoned".into()))
    }
}

impl FlightDirectory for FixtureDirectory {
    fn list_flights(&self) -> Result<Vec<FlightContext>> {
        Ok(self.lock()?.flights.clone())
    }
}

impl CrewDirectory for FixtureDirectory {
    fn pilots_for_aircraft(&self, aircraft: &str) -> Result<Vec<Pilot>> {
        Ok(self
            .lock()?
            .pilots
            .iter()
            .filter(|p| p.aircraft == aircraft)
            .cloned()
            .collect())
    }

    fn attendants_for_aircraft(&self, aircraft: &str) -> Result<Vec<Attendant>> {
        Ok(self
            .lock()?
            .attendants
            .iter()
            .filter(|a| a.aircraft.iter().any(|name| name == aircraft))
            .cloned()
            .collect())
    }

    fn recipes_for_chef(&self, chef_id: CrewId) -> Result<Vec<Recipe>> {
        Ok(self
            .lock()?
            .recipes
            .iter()
            .filter(|r| r.chef_id == chef_id)
            .cloned()
            .collect())
    }

    fn all_pilots(&self) -> Result<Vec<Pilot>> {
        Ok(self.lock()?.pilots.clone())
    }

    fn all_attendants(&self) -> Result<Vec<Attendant>> {
        Ok(self.lock()?.attendants.clone())
    }
}

impl PassengerDirectory for FixtureDirectory {
    fn list_passengers(&self, flight_number: &str) -> Result<Vec<PassengerRecord>> {
        Ok(self
            .lock()?
            .passengers
            .iter()
            .filter(|p| p.flight_number == flight_number)
            .cloned()
            .collect())
    }

    /// The file is written before memory changes, so a failed write leaves
    /// both on the old seat.
    fn update_seat(&self, passenger_id: PassengerId, seat: SeatCode) -> Result<()> {
        let mut data = self.lock()?;
        let mut next = data.clone();
        let passenger = next
            .passengers
            .iter_mut()
            .find(|p| p.id == passenger_id)
            .ok_or_else(|| {
                RosterError::Directory(format!("passenger {passenger_id} is not in the directory"))
            })?;
        passenger.seat_number = Some(seat.to_string());

        if let Some(path) = &self.path {
            let raw = serde_yaml::to_string(&next)?;
            crate::io::atomic_write(path, raw.as_bytes())?;
        }
        *data = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AircraftType, AttendantType, SeatClass, Seniority};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
flights:
  - flight_number: TK1001
    distance: "1000 km"
    aircraft:
      name: A320
      number_of_seats: 170
      max_crew: 6
      standard_menu: Chicken or pasta
pilots:
  - id: 1
    name: Deniz Kaya
    seniority: SENIOR
    aircraft: A320
    allowed_range: 5000
  - id: 2
    name: Lena Vogt
    seniority: JUNIOR
    aircraft: B737
    range: 5000
attendants:
  - id: 10
    name: Mert Aydin
    attendant_type: CHEF
    aircraft: [A320, B737]
  - id: 11
    name: Sara Lind
    type: CHIEF
    aircraft: [B737]
recipes:
  - id: 1
    name: Lamb Tagine
    chef_id: 10
passengers:
  - passenger_id: 100
    flight_number: TK1001
    name: Ada Byron
    seat_type: business
  - passenger_id: 101
    flight_number: TK2002
    name: Alan Turing
"#;

    fn load_sample(dir: &TempDir) -> FixtureDirectory {
        let path = dir.path().join("directory.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        FixtureDirectory::load(&path).unwrap()
    }

    #[test]
    fn filters_by_aircraft_and_flight() {
        let dir = TempDir::new().unwrap();
        let d = load_sample(&dir);

        let pilots = d.pilots_for_aircraft("A320").unwrap();
        assert_eq!(pilots.len(), 1);
        assert_eq!(pilots[0].seniority, Seniority::Senior);
        assert_eq!(pilots[0].range, 5000.0);

        let attendants = d.attendants_for_aircraft("A320").unwrap();
        assert_eq!(attendants.len(), 1);
        assert_eq!(attendants[0].kind, AttendantType::Chef);

        assert_eq!(d.recipes_for_chef(10).unwrap().len(), 1);
        assert!(d.recipes_for_chef(11).unwrap().is_empty());

        let passengers = d.list_passengers("TK1001").unwrap();
        assert_eq!(passengers.len(), 1);
        assert_eq!(passengers[0].seat_class, SeatClass::Business);

        let flights = d.list_flights().unwrap();
        assert_eq!(flights[0].distance, 1000.0);
        assert_eq!(flights[0].aircraft.seat_capacity, 170);
    }

    #[test]
    fn seat_update_is_written_back() {
        let dir = TempDir::new().unwrap();
        let d = load_sample(&dir);
        d.update_seat(100, "2C".parse().unwrap()).unwrap();

        let reloaded = FixtureDirectory::load(&dir.path().join("directory.yaml")).unwrap();
        let p = reloaded.list_passengers("TK1001").unwrap();
        assert_eq!(p[0].seat_number.as_deref(), Some("2C"));
    }

    #[test]
    fn failed_write_back_keeps_the_old_seat() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");
        std::fs::create_dir(&nested).unwrap();
        let path = nested.join("directory.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let d = FixtureDirectory::load(&path).unwrap();

        // replace the parent directory with a plain file so the write cannot land
        std::fs::remove_dir_all(&nested).unwrap();
        std::fs::write(&nested, "").unwrap();

        assert!(d.update_seat(100, "2C".parse().unwrap()).is_err());
        let p = d.list_passengers("TK1001").unwrap();
        assert_eq!(p[0].seat_number, None);
    }

    #[test]
    fn full_crew_lists_ignore_aircraft() {
        let dir = TempDir::new().unwrap();
        let d = load_sample(&dir);
        assert_eq!(d.all_pilots().unwrap().len(), 2);
        let ids: Vec<CrewId> = d.all_attendants().unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn seat_update_for_unknown_passenger_fails() {
        let d = FixtureDirectory::new(DirectoryData::default());
        let err = d.update_seat(5, "10A".parse().unwrap()).unwrap_err();
        assert!(matches!(err, RosterError::Directory(_)));
    }

    #[test]
    fn missing_file_is_a_directory_error() {
        let dir = TempDir::new().unwrap();
        let err = FixtureDirectory::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("directory file not found"));
    }

    #[test]
    fn in_memory_directory_round_trips() {
        let data = DirectoryData {
            flights: vec![FlightContext {
                flight_number: "BA9".into(),
                distance: 300.0,
                aircraft: AircraftType {
                    name: "E190".into(),
                    seat_capacity: 100,
                    target_crew_size: None,
                    standard_menu: None,
                },
                source: Default::default(),
                destination: Default::default(),
                departure: None,
                duration_minutes: 55,
                shared: None,
            }],
            ..DirectoryData::default()
        };
        let d = FixtureDirectory::new(data.clone());
        assert_eq!(d.list_flights().unwrap(), data.flights);
        assert!(d.all_pilots().unwrap().is_empty());
    }
}
