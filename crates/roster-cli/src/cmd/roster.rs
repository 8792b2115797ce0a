use crate::output::{or_dash, print_json, print_table};
use roster_core::crew::ManualCrew;
use roster_core::view::RosterView;
use std::path::Path;

pub fn generate(
    root: &Path,
    flight: &str,
    pilots: Vec<u64>,
    attendants: Vec<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let manual = ManualCrew { pilots, attendants };
    let view = engine.generate(&flight.to_uppercase(), &manual)?;

    if json {
        return print_json(&view);
    }
    print_view(&view);
    Ok(())
}

pub fn show(root: &Path, flight: &str, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let view = engine.roster(&flight.to_uppercase())?;

    if json {
        return print_json(&view);
    }
    print_view(&view);
    Ok(())
}

pub fn pilots(root: &Path, flight: &str, pilot_ids: &[u64], json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let update = engine.update_pilots(&flight.to_uppercase(), pilot_ids)?;

    if json {
        return print_json(&update);
    }
    println!("Updated pilots on {}:", update.flight_number);
    for p in &update.pilots {
        println!("  {} {} ({})", p.original_id, p.name, p.role);
    }
    Ok(())
}

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let records = engine.rosters()?;

    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No rosters.");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.flight_number.clone(),
                r.crew.len().to_string(),
                r.passengers.len().to_string(),
                r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.id.to_string(),
            ]
        })
        .collect();
    print_table(&["FLIGHT", "CREW", "PASSENGERS", "UPDATED", "ID"], rows);
    Ok(())
}

pub fn delete(root: &Path, flight: &str, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let flight = flight.to_uppercase();
    let removed = engine.delete_roster(&flight)?;

    if json {
        return print_json(&serde_json::json!({
            "flight_number": flight,
            "removed": removed,
        }));
    }
    println!("Deleted roster for {flight}.");
    Ok(())
}

pub fn stats(root: &Path, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let stats = engine.dashboard()?;

    if json {
        return print_json(&stats);
    }
    println!("Active crew:   {}", stats.total_active_crew);
    println!("Saved rosters: {}", stats.saved_rosters_count);
    Ok(())
}

fn print_view(view: &RosterView) {
    let info = &view.flight_info;
    println!(
        "Flight {}  {} -> {}  {}  {} km  {} min",
        info.number,
        info.source.airport_code,
        info.destination.airport_code,
        info.vehicle,
        info.distance,
        info.duration
    );
    if let Some(shared) = &info.shared_flight {
        println!("Shared with {} {}", shared.airline, shared.flight_number);
    }
    println!("Menu: {}", info.menu);
    println!(
        "{} crew, {} passengers\n",
        view.stats.total_crew, view.stats.total_passengers
    );

    print_table(
        &["ID", "CREW", "ROLE", "TYPE"],
        view.crew
            .iter()
            .map(|c| {
                vec![
                    c.original_id.to_string(),
                    c.name.clone(),
                    c.role.clone(),
                    c.category.to_string(),
                ]
            })
            .collect(),
    );
    println!();
    print_table(
        &["ID", "PASSENGER", "CLASS", "SEAT", "AGE", "AFFILIATES"],
        view.passengers
            .iter()
            .map(|p| {
                let affiliates: Vec<String> = p
                    .affiliated_passengers
                    .iter()
                    .map(u64::to_string)
                    .collect();
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.seat_class.to_string(),
                    p.seat_number.to_string(),
                    or_dash(p.age),
                    affiliates.join(","),
                ]
            })
            .collect(),
    );
}
