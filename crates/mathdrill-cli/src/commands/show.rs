//! The `mathdrill show` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use mathdrill_core::store::MatchStore;
use mathdrill_core::types::MatchOutcome;

pub fn execute(data_dir: &Path, id: Uuid) -> Result<()> {
    let store = MatchStore::open(super::matches_path(data_dir));
    let Some(record) = store.find_by_id(id) else {
        anyhow::bail!("no match with id {id}");
    };

    println!(
        "Match {} — {}",
        record.id,
        record.timestamp.format("%Y-%m-%d %H:%M")
    );
    match record.outcome {
        MatchOutcome::FixedCount {
            total,
            time_taken_secs,
        } => println!(
            "{} questions, {}/{total} correct, took {time_taken_secs}s",
            total, record.score
        ),
        MatchOutcome::Timed {
            attempted,
            timer_duration_secs,
        } => println!(
            "{timer_duration_secs}s timed, {}/{attempted} correct",
            record.score
        ),
    }

    if record.questions.is_empty() {
        println!("No question detail recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Yours", "Result", "Time"]);
    for (i, q) in record.questions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&q.question),
            Cell::new(q.correct_answer),
            Cell::new(
                q.user_answer
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ),
            Cell::new(match q.is_correct {
                Some(true) => "ok",
                Some(false) => "wrong",
                None => "ungraded",
            }),
            Cell::new(
                q.time_taken_ms
                    .map(|ms| format!("{:.1}s", ms as f64 / 1000.0))
                    .unwrap_or_else(|| "—".to_string()),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}
