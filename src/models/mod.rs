//! Core data models for hanlua

pub mod run_state;

pub use run_state::RunState;
