//! Criteria-weighted comparison of project portfolio management tools.
//!
//! The [`comparison`] module holds the matching core (rating resolution, match
//! scoring, filtering, ranking) together with the session state and catalog
//! import helpers that feed it. [`config`], [`error`], and [`telemetry`] carry the
//! runtime concerns shared with the HTTP service.

pub mod comparison;
pub mod config;
pub mod error;
pub mod telemetry;
