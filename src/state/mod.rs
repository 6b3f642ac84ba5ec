//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunPhase`: the phase machine a run moves through, from session start to
//!   the last item's outcome

mod run_phase;

// Re-export main types
pub use run_phase::{InvalidTransition, RunPhase};
