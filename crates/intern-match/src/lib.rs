//! Candidate matching results: the view model a renderer draws from and the
//! client for the external ranking/allotment service that produces them.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
