//! Housing Advisor library crate.
//!
//! This crate exposes the bankable-income estimator, the contract-risk
//! lookup, the reference guide and the advisor client as reusable
//! modules.  External applications may depend on the `housing_advisor`
//! crate and call into `engine::estimate` directly or embed the API via
//! `api::build_router`.

pub mod advisor;
pub mod api;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod guide;
pub mod input;
pub mod logging;
pub mod models;
