//! CSV export of history rows

use crate::engine::HistoryEntry;
use std::io::Write;

/// Column order of the export
pub const CSV_HEADER: [&str; 6] = ["date", "intake_kcal", "exercise_kcal", "protein_g", "carbs_g", "fat_g"];

/// Write `entries` as CSV with a header row
pub fn write_history_csv<W: Write>(entries: &[HistoryEntry], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for entry in entries {
        wtr.write_record([
            entry.date.clone(),
            format_quantity(entry.intake),
            format_quantity(entry.exercise_calories),
            format_quantity(entry.protein),
            format_quantity(entry.carbs),
            format_quantity(entry.fat),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
