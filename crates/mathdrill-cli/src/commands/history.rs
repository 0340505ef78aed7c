//! The `mathdrill history` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathdrill_core::store::MatchStore;
use mathdrill_core::types::MatchOutcome;

pub fn execute(data_dir: &Path) -> Result<()> {
    let store = MatchStore::open(super::matches_path(data_dir));
    let mut records = store.all();
    if records.is_empty() {
        println!("No matches yet. Run `mathdrill play` to record one.");
        return Ok(());
    }

    // Most recent first. Sorting for display is the adapter's job; the
    // store and aggregator keep insertion order.
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut table = Table::new();
    table.set_header(vec!["Id", "Date", "Mode", "Score", "Accuracy"]);
    for record in &records {
        let counted = record.outcome.questions_counted();
        let accuracy = if counted > 0 {
            record.score as f64 / counted as f64 * 100.0
        } else {
            0.0
        };
        let mode = match record.outcome {
            MatchOutcome::FixedCount { total, .. } => format!("{total} questions"),
            MatchOutcome::Timed {
                timer_duration_secs,
                ..
            } => format!("{timer_duration_secs}s timed"),
        };
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(mode),
            Cell::new(format!("{}/{counted}", record.score)),
            Cell::new(format!("{accuracy:.1}%")),
        ]);
    }
    println!("{table}");
    Ok(())
}
