//! Scene state: the single mutable program record, closed-form orbit transforms,
//! and the frame clock.
//!
//! # Invariants
//! - `ProgramState` is owned by the host and passed by reference; there is no global instance.
//! - Orbit functions are pure in `t` and the state they read.

pub mod orbit;
pub mod state;
pub mod timing;

pub use state::ProgramState;
pub use timing::{FrameClock, FrameTiming};
