use crate::output::{or_dash, print_json, print_table};
use std::path::Path;

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let flights = engine.flights();

    if json {
        return print_json(&flights);
    }
    if flights.is_empty() {
        println!("No flights.");
        return Ok(());
    }

    let rows = flights
        .iter()
        .map(|f| {
            vec![
                f.flight_number.clone(),
                format!("{} -> {}", f.source.airport_code, f.destination.airport_code),
                f.aircraft.name.clone(),
                f.distance.to_string(),
                or_dash(f.departure.map(|d| d.format("%Y-%m-%d %H:%M"))),
                or_dash(f.shared.as_ref().map(|s| format!("{} {}", s.airline, s.flight_number))),
            ]
        })
        .collect();
    print_table(
        &["FLIGHT", "ROUTE", "AIRCRAFT", "DISTANCE", "DEPARTURE", "SHARED"],
        rows,
    );
    Ok(())
}

pub fn crew(root: &Path, flight: &str, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let available = engine.available_crew(&flight.to_uppercase())?;

    if json {
        return print_json(&available);
    }

    println!(
        "{} ({} km)\n",
        available.vehicle, available.flight_distance
    );
    print_table(
        &["ID", "PILOT", "SENIORITY", "RANGE"],
        available
            .pilots
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.seniority.to_string(),
                    p.range.to_string(),
                ]
            })
            .collect(),
    );
    println!();
    print_table(
        &["ID", "ATTENDANT", "TYPE"],
        available
            .attendants
            .iter()
            .map(|a| vec![a.id.to_string(), a.name.clone(), a.kind.to_string()])
            .collect(),
    );
    Ok(())
}

pub fn all_crew(root: &Path, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let listing = engine.crew_listing();

    if json {
        return print_json(&listing);
    }
    print_table(
        &["ID", "PILOT", "SENIORITY", "AIRCRAFT", "RANGE"],
        listing
            .pilots
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.seniority.to_string(),
                    p.aircraft.clone(),
                    p.range.to_string(),
                ]
            })
            .collect(),
    );
    println!();
    print_table(
        &["ID", "ATTENDANT", "TYPE", "AIRCRAFT"],
        listing
            .attendants
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    a.kind.to_string(),
                    a.aircraft.join(","),
                ]
            })
            .collect(),
    );
    Ok(())
}
