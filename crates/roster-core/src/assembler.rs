//! The roster engine entry point.
//!
//! `RosterAssembler` pulls flight, crew and passenger data through the
//! directory traits, runs crew selection and seat allocation, and keeps the
//! single roster record per flight in the store. Every mutating operation
//! for a flight runs inside that flight's lock.
//!
//! Directory failures while reading crew or passengers are logged and
//! treated as empty results, so a flaky collaborator yields a partial roster
//! rather than an error.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::allocator::{self, CabinSnapshot};
use crate::config::EngineConfig;
use crate::crew::{self, CrewSelection, ManualCrew};
use crate::db::RosterDb;
use crate::directory::{CrewDirectory, FixtureDirectory, FlightDirectory, PassengerDirectory};
use crate::error::{Result, RosterError};
use crate::lock::FlightLocks;
use crate::paths::validate_flight_number;
use crate::record::{CrewAssignment, PassengerAssignment, RosterRecord};
use crate::types::{CrewId, FlightContext, PassengerId};
use crate::view::{
    AvailableCrew, CrewListing, DashboardStats, PilotUpdate, RosterView, SeatAssignment,
};

pub struct RosterAssembler {
    flights: Arc<dyn FlightDirectory>,
    crew: Arc<dyn CrewDirectory>,
    passengers: Arc<dyn PassengerDirectory>,
    db: RosterDb,
    config: EngineConfig,
    locks: FlightLocks,
    rng: Mutex<StdRng>,
}

impl RosterAssembler {
    pub fn new(
        flights: Arc<dyn FlightDirectory>,
        crew: Arc<dyn CrewDirectory>,
        passengers: Arc<dyn PassengerDirectory>,
        db: RosterDb,
        config: EngineConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            flights,
            crew,
            passengers,
            db,
            config,
            locks: FlightLocks::new(),
            rng: Mutex::new(rng),
        }
    }

    /// All three directories served by one fixture document.
    pub fn from_fixture(directory: Arc<FixtureDirectory>, db: RosterDb, config: EngineConfig) -> Self {
        Self::new(directory.clone(), directory.clone(), directory, db, config)
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Rebuild the roster for a flight from current directory state.
    ///
    /// Creates the record on first use and collapses duplicates to the
    /// earliest one. Crew and passenger rows are replaced, never appended.
    /// Manual pilot validation failures leave the stored record untouched.
    pub fn generate(&self, flight_number: &str, manual: &ManualCrew) -> Result<RosterView> {
        let flight = self.flight(flight_number)?;
        self.locks
            .with(&flight.flight_number, || self.rebuild(&flight, manual))
    }

    fn rebuild(&self, flight: &FlightContext, manual: &ManualCrew) -> Result<RosterView> {
        let number = flight.flight_number.as_str();
        let aircraft = flight.aircraft.name.as_str();
        let policy = self.config.policy();

        let pilot_pool = absorb(
            number,
            "pilot lookup",
            self.crew.pilots_for_aircraft(aircraft),
        );
        let pilots = crew::select_pilots(&pilot_pool, flight.distance, aircraft, &manual.pilots)?;

        let attendant_pool = crew::dedup_attendants(absorb(
            number,
            "attendant lookup",
            self.crew.attendants_for_aircraft(aircraft),
        ));
        let target = flight
            .aircraft
            .target_crew_size
            .unwrap_or(policy.default_target_crew);
        let slots = crew::cabin_slots(target, pilots.len(), policy.min_cabin_crew);
        let attendants =
            crew::select_attendants(&attendant_pool, slots, &manual.attendants, &policy);

        let selection = CrewSelection { pilots, attendants };
        let menu = self.menu_for(flight, &selection);
        let passengers = absorb(
            number,
            "passenger lookup",
            self.passengers.list_passengers(number),
        );

        let claim = self.db.claim(number)?;
        if claim.healed > 0 {
            tracing::warn!(
                flight = number,
                removed = claim.healed,
                kept = %claim.record.id,
                "collapsed duplicate roster records"
            );
        }
        let mut record = claim.record;
        record.rebuild(
            selection.assignments(),
            passengers
                .iter()
                .map(PassengerAssignment::from_directory)
                .collect(),
            menu,
        );
        self.db.store(&record)?;

        tracing::info!(
            flight = number,
            roster = %record.id,
            created = claim.created,
            crew = record.crew.len(),
            passengers = record.passengers.len(),
            "roster rebuilt"
        );
        Ok(RosterView::assemble(
            flight,
            &record,
            &passengers,
            &self.config.standard_menu,
        ))
    }

    fn menu_for(&self, flight: &FlightContext, selection: &CrewSelection) -> String {
        let standard = || {
            flight
                .aircraft
                .standard_menu
                .clone()
                .unwrap_or_else(|| self.config.standard_menu.clone())
        };
        let Some(chef) = selection.active_chef() else {
            return standard();
        };
        let recipes = absorb(
            &flight.flight_number,
            "recipe lookup",
            self.crew.recipes_for_chef(chef.id),
        );
        let mut rng = self.rng();
        crew::chef_menu(chef, &recipes, &mut *rng).unwrap_or_else(standard)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The current roster: crew and menu from the record, passengers from
    /// the directory with recorded seats laid over them.
    pub fn roster(&self, flight_number: &str) -> Result<RosterView> {
        let flight = self.flight(flight_number)?;
        let number = flight.flight_number.as_str();
        let (record, healed) = self.db.resolve_healed(number)?;
        if healed > 0 {
            tracing::warn!(flight = number, removed = healed, "collapsed duplicate roster records");
        }
        let passengers = absorb(
            number,
            "passenger lookup",
            self.passengers.list_passengers(number),
        );
        Ok(RosterView::assemble(
            &flight,
            &record,
            &passengers,
            &self.config.standard_menu,
        ))
    }

    /// Flights known to the directory. A failing directory yields none.
    pub fn flights(&self) -> Vec<FlightContext> {
        absorb("*", "flight listing", self.flights.list_flights())
    }

    pub fn rosters(&self) -> Result<Vec<RosterRecord>> {
        self.db.list()
    }

    /// The whole crew directory. A failing directory yields empty lists.
    pub fn crew_listing(&self) -> CrewListing {
        CrewListing {
            pilots: absorb("*", "pilot listing", self.crew.all_pilots()),
            attendants: absorb("*", "attendant listing", self.crew.all_attendants()),
        }
    }

    pub fn dashboard(&self) -> Result<DashboardStats> {
        let crew = self.crew_listing();
        Ok(DashboardStats {
            total_active_crew: crew.pilots.len() + crew.attendants.len(),
            saved_rosters_count: self.db.list()?.len(),
        })
    }

    /// Pilots who could legally fly this flight and attendants certified
    /// for its aircraft, for building a manual selection.
    pub fn available_crew(&self, flight_number: &str) -> Result<AvailableCrew> {
        let flight = self.flight(flight_number)?;
        let number = flight.flight_number.as_str();
        let aircraft = flight.aircraft.name.as_str();

        let pilots = absorb(number, "pilot lookup", self.crew.pilots_for_aircraft(aircraft))
            .into_iter()
            .filter(|p| p.can_fly(flight.distance))
            .collect();
        let attendants = crew::dedup_attendants(absorb(
            number,
            "attendant lookup",
            self.crew.attendants_for_aircraft(aircraft),
        ));

        Ok(AvailableCrew {
            vehicle: flight.aircraft.name.clone(),
            flight_distance: flight.distance,
            pilots,
            attendants,
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Seat one passenger, preferring a seat next to an affiliate.
    ///
    /// A passenger who already holds a seat keeps it and nothing is written.
    /// The new seat is pushed to the passenger directory and to the roster
    /// record independently; the call fails only if neither write lands.
    pub fn assign_seat(&self, flight_number: &str, passenger_id: PassengerId) -> Result<SeatAssignment> {
        let flight = self.flight(flight_number)?;
        let number = flight.flight_number.as_str();

        self.locks.with(number, || {
            // occupancy must be complete to keep seats unique, so this read is not absorbed
            let passengers = self.passengers.list_passengers(number)?;
            let target = passengers
                .iter()
                .find(|p| p.id == passenger_id)
                .ok_or_else(|| RosterError::PassengerNotFound {
                    flight_number: number.to_string(),
                    passenger_id,
                })?;
            if target.is_infant {
                return Err(RosterError::invalid(format!(
                    "passenger {passenger_id} is an infant and travels without a seat"
                )));
            }

            let mut record = match self.db.resolve(number) {
                Ok(record) => Some(record),
                Err(RosterError::RosterNotFound(_)) => None,
                Err(e) => return Err(e),
            };
            let cabin = CabinSnapshot::new(&passengers, record.as_ref());
            if let Some(seat) = cabin.seat_of(passenger_id) {
                tracing::debug!(flight = number, passenger = passenger_id, %seat, "passenger already seated");
                return Ok(SeatAssignment {
                    seat,
                    passenger: target.name.clone(),
                });
            }

            let allocation = {
                let mut rng = self.rng();
                allocator::allocate(target, &cabin, &mut *rng)?
            };
            let seat = allocation.seat;

            let directory_written = match self.passengers.update_seat(passenger_id, seat) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(flight = number, passenger = passenger_id, error = %e, "directory seat update failed");
                    false
                }
            };
            let record_written = match record.as_mut() {
                Some(record) if record.seat_of(passenger_id).is_some() => {
                    record.set_seat(passenger_id, seat);
                    match self.db.store(record) {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(flight = number, passenger = passenger_id, error = %e, "roster seat update failed");
                            false
                        }
                    }
                }
                Some(_) => {
                    tracing::debug!(flight = number, passenger = passenger_id, "passenger not on roster record");
                    false
                }
                None => false,
            };
            if !directory_written && !record_written {
                return Err(RosterError::Directory(format!(
                    "seat {seat} for passenger {passenger_id} could not be recorded"
                )));
            }

            tracing::info!(
                flight = number,
                passenger = passenger_id,
                %seat,
                placement = ?allocation.placement,
                "seat assigned"
            );
            Ok(SeatAssignment {
                seat,
                passenger: target.name.clone(),
            })
        })
    }

    /// Replace the pilots on an existing roster after validating every id.
    ///
    /// Cabin crew, passengers and menu are left as they are.
    pub fn update_pilots(&self, flight_number: &str, pilot_ids: &[CrewId]) -> Result<PilotUpdate> {
        if pilot_ids.is_empty() {
            return Err(RosterError::invalid("at least one pilot id is required"));
        }
        let flight = self.flight(flight_number)?;
        let number = flight.flight_number.as_str();
        let aircraft = flight.aircraft.name.as_str();

        self.locks.with(number, || {
            let mut record = self.db.resolve(number)?;
            let pool = absorb(number, "pilot lookup", self.crew.pilots_for_aircraft(aircraft));
            let pilots = crew::validate_pilots(&pool, flight.distance, aircraft, pilot_ids)?;

            record.replace_pilots(pilots.iter().map(CrewAssignment::pilot).collect());
            self.db.store(&record)?;

            tracing::info!(flight = number, pilots = pilots.len(), "pilots replaced");
            Ok(PilotUpdate {
                flight_number: number.to_string(),
                pilots: record.pilots().cloned().collect(),
            })
        })
    }

    /// Remove every stored record for a flight.
    pub fn delete_roster(&self, flight_number: &str) -> Result<usize> {
        validate_flight_number(flight_number)?;
        self.locks.with(flight_number, || {
            let removed = self.db.delete(flight_number)?;
            if removed == 0 {
                return Err(RosterError::RosterNotFound(flight_number.to_string()));
            }
            tracing::info!(flight = flight_number, removed, "roster deleted");
            Ok(removed)
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn flight(&self, flight_number: &str) -> Result<FlightContext> {
        validate_flight_number(flight_number)?;
        self.flights()
            .into_iter()
            .find(|f| f.flight_number == flight_number)
            .ok_or_else(|| RosterError::FlightNotFound(flight_number.to_string()))
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Log a collaborator failure and carry on with an empty result.
fn absorb<T: Default, E: Display>(
    flight: &str,
    what: &str,
    result: std::result::Result<T, E>,
) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(flight, error = %e, "{what} failed; continuing without it");
            T::default()
        }
    }
}
