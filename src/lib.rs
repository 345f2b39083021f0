//! Availability scoring for a clinician roster.
//!
//! A roster of monthly hours and caseloads goes in, and every clinician
//! comes out with a 0–100 load score relative to the rest of the roster,
//! plus burnout and load-balancing flags. See [`pipeline::score_roster`].

pub mod aggregate;
pub mod burnout;
pub mod config;
pub mod error;
pub mod features;
pub mod load_balance;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod score;
pub mod stats;
pub mod tiers;
pub mod window;
