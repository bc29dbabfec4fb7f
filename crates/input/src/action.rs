use hangar_common::Movement;

/// A bound input. The host maps physical keys onto these; the router only
/// ever sees actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Held: move the camera every frame.
    Move(Movement),
    /// Held: ask the host to close.
    Exit,
    /// Pressed: show or hide the debug overlay.
    ToggleOverlay,
}

/// Something only the host can do, requested by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Leave the loop at the end of this iteration.
    Exit,
    /// Show the cursor and stop confining it (overlay mode).
    ReleaseCursor,
    /// Hide and confine the cursor (free-fly mode).
    CaptureCursor,
}

impl Action {
    /// Movement actions in the order they are polled each frame.
    pub const MOVES: [Action; 4] = [
        Action::Move(Movement::Forward),
        Action::Move(Movement::Backward),
        Action::Move(Movement::Left),
        Action::Move(Movement::Right),
    ];
}
