use crate::output::print_json;
use std::path::Path;

pub fn assign(root: &Path, flight: &str, passenger: u64, json: bool) -> anyhow::Result<()> {
    let engine = super::open_engine(root)?;
    let assignment = engine.assign_seat(&flight.to_uppercase(), passenger)?;

    if json {
        return print_json(&assignment);
    }
    println!("{} -> {}", assignment.passenger, assignment.seat);
    Ok(())
}
