//! The `mathdrill stats` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathdrill_core::stats;
use mathdrill_core::store::MatchStore;

pub fn execute(data_dir: &Path) -> Result<()> {
    let store = MatchStore::open(super::matches_path(data_dir));
    let stats = stats::compute(&store.all());

    if stats.total_matches == 0 {
        println!("No matches yet. Play some games to see your stats.");
        return Ok(());
    }

    let mut overview = Table::new();
    overview.set_header(vec![
        "Matches",
        "Accuracy",
        "Avg score",
        "Best score",
        "Answered",
        "Avg q/min",
    ]);
    overview.add_row(vec![
        Cell::new(stats.total_matches),
        Cell::new(format!("{:.1}%", stats.overall_accuracy)),
        Cell::new(format!("{:.1}", stats.average_score)),
        Cell::new(stats.best_score),
        Cell::new(stats.total_questions_answered),
        Cell::new(format!("{:.1}", stats.average_qpm)),
    ]);
    println!("{overview}");

    if !stats.accuracy_by_operation.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Operation", "Accuracy"]);
        for (op, accuracy) in &stats.accuracy_by_operation {
            table.add_row(vec![
                Cell::new(format!("{op} ({})", op.symbol())),
                Cell::new(format!("{accuracy:.1}%")),
            ]);
        }
        println!("\nAccuracy by operation\n{table}");
    }

    if !stats.score_by_duration.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Duration", "Best", "Avg", "Matches"]);
        for (duration, bucket) in &stats.score_by_duration {
            table.add_row(vec![
                Cell::new(duration),
                Cell::new(bucket.best),
                Cell::new(format!("{:.1}", bucket.avg)),
                Cell::new(bucket.matches),
            ]);
        }
        println!("\nScores by duration\n{table}");
    }

    Ok(())
}
