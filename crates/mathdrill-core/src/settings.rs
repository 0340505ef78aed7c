//! Persisted practice settings: operator enablement, per-operator ranges,
//! and the default session lengths.
//!
//! Settings live beside the match history but are persisted independently of
//! it. Like the match store, an unreadable settings file degrades to the
//! defaults instead of failing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::{OperandRange, Operator, RangeTable};

/// Enablement plus operand bounds for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSettings {
    pub enabled: bool,
    pub range: OperandRange,
}

/// The operation-selection policy plus default session lengths. Owned by the
/// caller and passed by value into sessions; not part of the match store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub add: OperatorSettings,
    pub subtract: OperatorSettings,
    pub multiply: OperatorSettings,
    pub divide: OperatorSettings,
    /// Default timer length for `--timed` sessions.
    pub duration_secs: u32,
    /// Default question count for fixed-count sessions.
    pub question_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = RangeTable::default();
        Self {
            add: OperatorSettings {
                enabled: true,
                range: defaults.add,
            },
            subtract: OperatorSettings {
                enabled: true,
                range: defaults.subtract,
            },
            multiply: OperatorSettings {
                enabled: true,
                range: defaults.multiply,
            },
            divide: OperatorSettings {
                enabled: true,
                range: defaults.divide,
            },
            duration_secs: 60,
            question_count: 10,
        }
    }
}

impl Settings {
    pub fn operator(&self, op: Operator) -> &OperatorSettings {
        match op {
            Operator::Add => &self.add,
            Operator::Subtract => &self.subtract,
            Operator::Multiply => &self.multiply,
            Operator::Divide => &self.divide,
        }
    }

    pub fn operator_mut(&mut self, op: Operator) -> &mut OperatorSettings {
        match op {
            Operator::Add => &mut self.add,
            Operator::Subtract => &mut self.subtract,
            Operator::Multiply => &mut self.multiply,
            Operator::Divide => &mut self.divide,
        }
    }

    /// The enabled operators, in canonical order. May be empty; session
    /// start refuses an empty pool.
    pub fn enabled_pool(&self) -> Vec<Operator> {
        Operator::ALL
            .into_iter()
            .filter(|&op| self.operator(op).enabled)
            .collect()
    }

    /// Ranges for all operators, enabled or not.
    pub fn range_table(&self) -> RangeTable {
        RangeTable {
            add: self.add.range,
            subtract: self.subtract.range,
            multiply: self.multiply.range,
            divide: self.divide.range,
        }
    }

    /// Load settings from `path`, falling back to the defaults when the file
    /// is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("failed to read settings from {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "settings file {} is corrupt, using defaults: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Persist settings to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)?;
        Ok(())
    }
}
