//! Input routing: raw key, cursor and scroll input mapped to camera moves and overlay toggles.
//!
//! # Invariants
//! - The router never talks to the window system; cursor capture and exit are returned as requests.
//! - Scroll always reaches the camera; cursor motion only while camera mouse-update is enabled.

pub mod action;
mod router;

pub use action::{Action, HostRequest};
pub use router::{InputRouter, MouseTracker};

pub fn crate_info() -> &'static str {
    "hangar-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
