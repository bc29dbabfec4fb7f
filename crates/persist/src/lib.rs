//! Persistence: the viewer's program state as a fixed-order, ten-field text file.
//!
//! # Invariants
//! - Field order is fixed: clear colour RGB, UI flag, camera position XYZ, camera front XYZ.
//! - Loading never fails; unreadable or short files leave the remaining fields at their defaults.
//! - Saving overwrites the file unconditionally.

mod store;

pub use store::{FIELD_COUNT, PersistError, StateFile, decode_into, encode};

pub fn crate_info() -> &'static str {
    "hangar-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
