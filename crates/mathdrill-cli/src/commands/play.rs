//! The `mathdrill play` command: one interactive practice match.
//!
//! The session core is pure; this adapter owns the wall clock. It drives the
//! timed countdown with a one-second interval, sleeps out the reveal and
//! lockout delays the session asks for, and appends the finished match to
//! the store.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use mathdrill_core::session::{
    Advance, Session, SessionConfig, SessionMode, SessionPhase, Submission,
};
use mathdrill_core::settings::Settings;
use mathdrill_core::store::MatchStore;
use mathdrill_core::types::{MatchDraft, MatchOutcome};

pub async fn execute(data_dir: &Path, timed: Option<u32>, count: Option<u32>) -> Result<()> {
    let settings = Settings::load(&super::settings_path(data_dir));
    let mode = match (timed, count) {
        (Some(duration_secs), _) => SessionMode::Timed { duration_secs },
        (None, Some(count)) => SessionMode::FixedCount { count },
        (None, None) => SessionMode::FixedCount {
            count: settings.question_count,
        },
    };

    let mut session = Session::new(SessionConfig::from_settings(&settings, mode));
    let mut rng = StdRng::from_entropy();
    session.start(&mut rng)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match mode {
        SessionMode::FixedCount { .. } => run_fixed(&mut session, &mut rng, &mut lines).await?,
        SessionMode::Timed { .. } => run_timed(&mut session, &mut rng, &mut lines).await?,
    }

    let Some(draft) = session.take_draft() else {
        println!("Match abandoned, nothing saved.");
        return Ok(());
    };
    print_summary(&draft);

    let store = MatchStore::open(super::matches_path(data_dir));
    let record = store.append(draft).context("failed to save match")?;
    println!("Saved match {}", record.id);
    Ok(())
}

async fn run_fixed(
    session: &mut Session,
    rng: &mut StdRng,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    while session.phase() == SessionPhase::Playing {
        let Some(question) = session.current_question().map(|q| q.question.clone()) else {
            break;
        };
        let (index, total) = session.position();
        println!("\nQuestion {index} of {total}   score {}", session.score());
        println!("  {question} = ?");

        let Some(line) = lines.next_line().await? else {
            // stdin closed mid-match: abandon.
            session.reset();
            return Ok(());
        };

        match session.submit(rng, &line) {
            Submission::Ignored => println!("  enter a whole number"),
            Submission::Graded {
                correct,
                correct_answer,
                advance,
            } => {
                if correct {
                    println!("  correct!");
                } else {
                    println!("  wrong — the answer was {correct_answer}");
                }
                if let Advance::AfterDelay(delay) = advance {
                    tokio::time::sleep(delay).await;
                }
                session.advance(rng);
            }
        }
    }
    Ok(())
}

async fn run_timed(
    session: &mut Session,
    rng: &mut StdRng,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    let mut countdown = tokio::time::interval(Duration::from_secs(1));
    // The first interval tick completes immediately; consume it so the
    // countdown starts a full second out.
    countdown.tick().await;

    println!(
        "\nTimed match: {}s on the clock. Type an answer and press Enter.",
        session.remaining_secs()
    );
    let mut shown = String::new();
    show_question(session, &mut shown);

    while session.phase() == SessionPhase::Playing {
        tokio::select! {
            _ = countdown.tick() => {
                session.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    session.reset();
                    return Ok(());
                };
                match session.submit(rng, &line) {
                    Submission::Ignored => {}
                    Submission::Graded { correct, correct_answer, advance } => {
                        if correct {
                            println!("  ✓");
                        } else {
                            println!("  ✗ the answer was {correct_answer}");
                        }
                        if let Advance::AfterDelay(delay) = advance {
                            tokio::time::sleep(delay).await;
                            session.advance(rng);
                        }
                    }
                }
            }
        }
        show_question(session, &mut shown);
    }

    println!("\nTime!");
    Ok(())
}

/// Print the current question when it changes.
fn show_question(session: &Session, shown: &mut String) {
    if let Some(q) = session.current_question() {
        if q.question != *shown {
            shown.clone_from(&q.question);
            println!("\n[{:>3}s] {} = ?", session.remaining_secs(), q.question);
        }
    }
}

fn print_summary(draft: &MatchDraft) {
    let counted = draft.outcome.questions_counted();
    let accuracy = if counted > 0 {
        draft.score as f64 / counted as f64 * 100.0
    } else {
        0.0
    };

    println!("\nMatch summary");
    match draft.outcome {
        MatchOutcome::FixedCount {
            total,
            time_taken_secs,
        } => println!(
            "  {}/{} correct ({accuracy:.1}%) in {time_taken_secs}s",
            draft.score, total
        ),
        MatchOutcome::Timed {
            attempted,
            timer_duration_secs,
        } => println!(
            "  {}/{} correct ({accuracy:.1}%) in {timer_duration_secs}s",
            draft.score, attempted
        ),
    }

    if draft.questions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Yours", "Result"]);
    for (i, q) in draft.questions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&q.question),
            Cell::new(q.correct_answer),
            Cell::new(
                q.user_answer
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ),
            Cell::new(if q.is_correct == Some(true) {
                "ok"
            } else {
                "wrong"
            }),
        ]);
    }
    println!("{table}");
}
