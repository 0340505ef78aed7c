//! The `mathdrill settings` command: view and edit practice settings.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use mathdrill_core::settings::Settings;
use mathdrill_core::types::{OperandRange, Operator};

pub fn execute(
    data_dir: &Path,
    enable: Option<&str>,
    disable: Option<&str>,
    ranges: &[String],
    duration: Option<u32>,
    count: Option<u32>,
) -> Result<()> {
    let path = super::settings_path(data_dir);
    let mut settings = Settings::load(&path);
    let mut changed = false;

    if let Some(list) = enable {
        for op in parse_operator_list(list)? {
            settings.operator_mut(op).enabled = true;
        }
        changed = true;
    }
    if let Some(list) = disable {
        for op in parse_operator_list(list)? {
            settings.operator_mut(op).enabled = false;
        }
        changed = true;
    }
    for spec in ranges {
        let (op, range) = parse_range_spec(spec)?;
        settings.operator_mut(op).range = range;
        changed = true;
    }
    if let Some(duration) = duration {
        settings.duration_secs = duration;
        changed = true;
    }
    if let Some(count) = count {
        settings.question_count = count;
        changed = true;
    }

    if changed {
        settings.save(&path).context("failed to save settings")?;
        println!("Settings saved.");
    }

    let mut table = Table::new();
    table.set_header(vec!["Operator", "Enabled", "Operand 1", "Operand 2"]);
    for op in Operator::ALL {
        let s = settings.operator(op);
        table.add_row(vec![
            Cell::new(format!("{op} ({})", op.symbol())),
            Cell::new(if s.enabled { "yes" } else { "no" }),
            Cell::new(format!("{}..{}", s.range.min1, s.range.max1)),
            Cell::new(format!("{}..{}", s.range.min2, s.range.max2)),
        ]);
    }
    println!("{table}");
    println!(
        "Default timer: {}s   Default question count: {}",
        settings.duration_secs, settings.question_count
    );
    Ok(())
}

fn parse_operator_list(list: &str) -> Result<Vec<Operator>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Operator>().map_err(anyhow::Error::msg))
        .collect()
}

/// Parse a range spec of the form `op=min1:max1,min2:max2`. The second pair
/// may be omitted to use the same bounds for both operands.
fn parse_range_spec(spec: &str) -> Result<(Operator, OperandRange)> {
    let (op, bounds) = spec
        .split_once('=')
        .with_context(|| format!("range spec `{spec}` must look like op=min:max[,min:max]"))?;
    let op = op.trim().parse::<Operator>().map_err(anyhow::Error::msg)?;

    let mut pairs = bounds.split(',');
    let first = pairs.next().unwrap_or_default();
    let (min1, max1) = parse_bound_pair(first)?;
    let (min2, max2) = match pairs.next() {
        Some(second) => parse_bound_pair(second)?,
        None => (min1, max1),
    };
    if pairs.next().is_some() {
        anyhow::bail!("range spec `{spec}` has more than two bound pairs");
    }
    Ok((op, OperandRange::new(min1, max1, min2, max2)))
}

fn parse_bound_pair(pair: &str) -> Result<(i64, i64)> {
    let (min, max) = pair
        .split_once(':')
        .with_context(|| format!("bound pair `{pair}` must look like min:max"))?;
    let min = min
        .trim()
        .parse::<i64>()
        .with_context(|| format!("bad lower bound in `{pair}`"))?;
    let max = max
        .trim()
        .parse::<i64>()
        .with_context(|| format!("bad upper bound in `{pair}`"))?;
    Ok((min, max))
}
