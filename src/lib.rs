//! Off-grid homestead feasibility estimator.
//!
//! The [`engine`] module is the deterministic resource estimation pipeline;
//! [`domain`] holds its input and output records, [`provider`] fetches climate
//! data from Open-Meteo, and [`config`] wires a scenario together for the CLI.

pub mod config;
pub mod domain;
pub mod engine;
pub mod provider;
pub mod telemetry;
