//! mathdrill-core — Arithmetic practice engine.
//!
//! This crate defines the data model and the four pieces the CLI builds on:
//! random problem generation, the match session state machine, the persisted
//! match history, and the statistics aggregator.

pub mod error;
pub mod generator;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod types;
