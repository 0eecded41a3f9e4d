//! Core phase-machine types.
//!
//! - Phase naming via the `State` trait
//! - Bounded history of phase changes
//!
//! Nothing here touches a host; coordinators build on these values.

mod history;
mod state;

pub use history::{PhaseChange, StateHistory, DEFAULT_HISTORY_CAPACITY};
pub use state::State;
