//! Crew selection: pilots by seniority mix, cabin crew by service priority.
//!
//! Everything here is pure. Directory lookups and persistence happen in the
//! assembler; this module only decides who flies.

use crate::error::{Result, RosterError};
use crate::record::CrewAssignment;
use crate::types::{Attendant, AttendantType, CrewId, Pilot, Recipe, Seniority};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Knobs for cabin staffing, taken from `EngineConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrewPolicy {
    /// Total crew when the aircraft does not specify one.
    pub default_target_crew: u32,
    /// Safety floor for cabin attendants regardless of the target.
    pub min_cabin_crew: u32,
    /// Extra chiefs that may pad an understaffed cabin.
    pub extra_chief_limit: u32,
}

impl Default for CrewPolicy {
    fn default() -> Self {
        Self {
            default_target_crew: 6,
            min_cabin_crew: 3,
            extra_chief_limit: 3,
        }
    }
}

/// Explicit crew chosen by an operator. An empty list means "select automatically".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualCrew {
    pub pilots: Vec<CrewId>,
    pub attendants: Vec<CrewId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewSelection {
    pub pilots: Vec<Pilot>,
    pub attendants: Vec<Attendant>,
}

impl CrewSelection {
    /// First selected chef, who decides the menu.
    pub fn active_chef(&self) -> Option<&Attendant> {
        self.attendants
            .iter()
            .find(|a| a.kind == AttendantType::Chef)
    }

    /// Pilots first, then cabin crew, in selection order.
    pub fn assignments(&self) -> Vec<CrewAssignment> {
        self.pilots
            .iter()
            .map(CrewAssignment::pilot)
            .chain(self.attendants.iter().map(CrewAssignment::cabin))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pilots
// ---------------------------------------------------------------------------

/// Pick pilots for a flight.
///
/// With a manual list every id is validated and all violations are returned
/// together; otherwise the automatic seniority mix is used.
pub fn select_pilots(
    candidates: &[Pilot],
    distance: f64,
    aircraft: &str,
    manual: &[CrewId],
) -> Result<Vec<Pilot>> {
    if manual.is_empty() {
        Ok(auto_pilots(candidates, distance))
    } else {
        validate_pilots(candidates, distance, aircraft, manual)
    }
}

/// Two pilots with seniority diversity: one senior, one junior, a trainee
/// if a slot is still open, and a second senior as the last resort.
pub fn auto_pilots(candidates: &[Pilot], distance: f64) -> Vec<Pilot> {
    let qualified: Vec<&Pilot> = candidates.iter().filter(|p| p.can_fly(distance)).collect();
    let tier = |s: Seniority| {
        qualified
            .iter()
            .copied()
            .filter(|p| p.seniority == s)
            .collect::<Vec<_>>()
    };
    let seniors = tier(Seniority::Senior);
    let juniors = tier(Seniority::Junior);
    let trainees = tier(Seniority::Trainee);

    let mut picked: Vec<Pilot> = Vec::with_capacity(2);
    if let Some(p) = seniors.first() {
        picked.push((*p).clone());
    }
    if let Some(p) = juniors.first() {
        picked.push((*p).clone());
    }
    if picked.len() < 2 {
        if let Some(p) = trainees.first() {
            picked.push((*p).clone());
        }
    }
    if picked.len() < 2 {
        if let Some(p) = seniors.get(1) {
            picked.push((*p).clone());
        }
    }
    tracing::debug!(
        qualified = qualified.len(),
        picked = picked.len(),
        "automatic pilot selection"
    );
    picked
}

/// Validate a manual pilot list against certification and range.
///
/// Repeated ids collapse to their first occurrence. Any violation rejects
/// the whole list.
pub fn validate_pilots(
    candidates: &[Pilot],
    distance: f64,
    aircraft: &str,
    ids: &[CrewId],
) -> Result<Vec<Pilot>> {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    let mut details = Vec::new();

    for &id in ids {
        if !seen.insert(id) {
            continue;
        }
        let Some(pilot) = candidates.iter().find(|p| p.id == id) else {
            details.push(format!("pilot {id} is not certified for {aircraft}"));
            continue;
        };
        if !pilot.can_fly(distance) {
            details.push(format!(
                "pilot {} range ({}) is less than flight distance ({})",
                pilot.name, pilot.range, distance
            ));
            continue;
        }
        valid.push(pilot.clone());
    }

    if details.is_empty() {
        Ok(valid)
    } else {
        Err(RosterError::Validation { details })
    }
}

// ---------------------------------------------------------------------------
// Cabin crew
// ---------------------------------------------------------------------------

/// Cabin slots left after the pilots, never below the safety floor.
pub fn cabin_slots(target_total: u32, pilot_count: usize, min_cabin: u32) -> usize {
    let remaining = (target_total as usize).saturating_sub(pilot_count);
    remaining.max(min_cabin as usize)
}

/// Drop repeated attendant ids, keeping the first.
pub fn dedup_attendants(candidates: Vec<Attendant>) -> Vec<Attendant> {
    let mut seen = HashSet::new();
    candidates.into_iter().filter(|a| seen.insert(a.id)).collect()
}

/// Pick cabin crew.
///
/// A manual list is lenient: ids missing from the pool are skipped. The
/// automatic path fills `slots` with a chef, a chief, then regulars, and
/// pads any shortfall with extra chiefs and finally a second chef.
pub fn select_attendants(
    candidates: &[Attendant],
    slots: usize,
    manual: &[CrewId],
    policy: &CrewPolicy,
) -> Vec<Attendant> {
    if !manual.is_empty() {
        let wanted: HashSet<CrewId> = manual.iter().copied().collect();
        let picked: Vec<Attendant> = candidates
            .iter()
            .filter(|a| wanted.contains(&a.id))
            .cloned()
            .collect();
        if picked.len() < wanted.len() {
            tracing::debug!(
                requested = wanted.len(),
                matched = picked.len(),
                "ignoring unknown manual attendant ids"
            );
        }
        return picked;
    }

    let mut chiefs = by_kind(candidates, AttendantType::Chief);
    let mut regulars = by_kind(candidates, AttendantType::Regular);
    let mut chefs = by_kind(candidates, AttendantType::Chef);
    let mut picked = Vec::with_capacity(slots.min(candidates.len()));
    let mut open = slots;

    let mut take = |pool: &mut std::vec::IntoIter<&Attendant>, open: &mut usize| -> bool {
        if *open == 0 {
            return false;
        }
        match pool.next() {
            Some(a) => {
                picked.push(a.clone());
                *open -= 1;
                true
            }
            None => false,
        }
    };

    take(&mut chefs, &mut open);
    take(&mut chiefs, &mut open);
    while take(&mut regulars, &mut open) {}
    for _ in 0..policy.extra_chief_limit {
        if !take(&mut chiefs, &mut open) {
            break;
        }
    }
    take(&mut chefs, &mut open);

    if open > 0 {
        tracing::debug!(unfilled = open, "cabin crew pool exhausted");
    }
    picked
}

fn by_kind(candidates: &[Attendant], kind: AttendantType) -> std::vec::IntoIter<&Attendant> {
    candidates
        .iter()
        .filter(|a| a.kind == kind)
        .collect::<Vec<_>>()
        .into_iter()
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// One of the chef's recipes at random, credited to the chef.
pub fn chef_menu(chef: &Attendant, recipes: &[Recipe], rng: &mut impl Rng) -> Option<String> {
    recipes
        .choose(rng)
        .map(|r| format!("{} (Prepared by Chef {})", r.name, chef.name))
}
