//! Lead intake scoring and routing engine.
//!
//! Converts inbound contact-form submissions into bounded numeric scores and
//! urgency tiers, then assigns each lead to a team and agent under capacity,
//! specialty, and language constraints. See [`workflows::intake`] for the
//! engine and [`workflows::import`] for CSV backfill.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
