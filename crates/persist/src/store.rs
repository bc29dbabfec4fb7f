//! File-backed program state.
//!
//! Layout (one value per line):
//! ```text
//! <clear r>
//! <clear g>
//! <clear b>
//! <ui enabled: 0|1>
//! <camera position x>
//! <camera position y>
//! <camera position z>
//! <camera front x>
//! <camera front y>
//! <camera front z>
//! ```

use glam::Vec3;
use hangar_scene::ProgramState;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Number of values written and read, in order.
pub const FIELD_COUNT: usize = 10;

/// Errors from writing the state file. Reads never error.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A state file at a fixed path.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a fresh state, falling back to defaults field by field.
    pub fn load(&self) -> ProgramState {
        let mut state = ProgramState::default();
        self.load_into(&mut state);
        state
    }

    /// Overlay saved fields onto `state`. Returns how many fields were applied.
    pub fn load_into(&self, state: &mut ProgramState) -> usize {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let read = decode_into(state, &text);
                tracing::info!(path = %self.path.display(), fields = read, "program state loaded");
                read
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "no saved program state: {e}");
                0
            }
        }
    }

    /// Overwrite the file with the current state.
    pub fn save(&self, state: &ProgramState) -> Result<(), PersistError> {
        std::fs::write(&self.path, encode(state)).map_err(|source| PersistError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "program state saved");
        Ok(())
    }
}

/// Render the ten persisted fields, one per line.
pub fn encode(state: &ProgramState) -> String {
    let c = state.clear_color;
    let p = state.camera.position;
    let f = state.camera.front();
    let mut out = String::new();
    for v in [c.x, c.y, c.z] {
        let _ = writeln!(out, "{v}");
    }
    let _ = writeln!(out, "{}", u8::from(state.ui_enabled));
    for v in [p.x, p.y, p.z, f.x, f.y, f.z] {
        let _ = writeln!(out, "{v}");
    }
    out
}

/// Apply whitespace-separated fields from `text` in order, stopping at the
/// first token that does not parse. Returns the number of fields applied.
pub fn decode_into(state: &mut ProgramState, text: &str) -> usize {
    let mut front = state.camera.front();
    let mut front_touched = false;
    let mut read = 0;

    for (index, token) in text.split_whitespace().take(FIELD_COUNT).enumerate() {
        if !apply_field(state, &mut front, index, token) {
            tracing::debug!(index, token, "stopped reading program state at malformed field");
            break;
        }
        front_touched |= index >= 7;
        read += 1;
    }

    if front_touched {
        state.camera.set_front(front);
    }
    read
}

fn apply_field(state: &mut ProgramState, front: &mut Vec3, index: usize, token: &str) -> bool {
    if index == 3 {
        return match parse_flag(token) {
            Some(flag) => {
                state.ui_enabled = flag;
                true
            }
            None => false,
        };
    }

    let Ok(value) = token.parse::<f32>() else {
        return false;
    };
    match index {
        0..=2 => state.clear_color[index] = value,
        4..=6 => state.camera.position[index - 4] = value,
        7..=9 => front[index - 7] = value,
        _ => return false,
    }
    true
}

fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "0" | "false" => Some(false),
        "1" | "true" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> ProgramState {
        let mut state = ProgramState::default();
        state.clear_color = Vec3::new(0.1, 0.25, 0.9);
        state.ui_enabled = true;
        state.camera.position = Vec3::new(-12.5, 3.75, 1e4);
        state.camera.process_mouse_movement(123.0, -45.0);
        state
    }

    #[test]
    fn encode_writes_ten_lines_in_order() {
        let state = sample_state();
        let text = encode(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), FIELD_COUNT);
        assert_eq!(lines[0], "0.1");
        assert_eq!(lines[3], "1");
        assert_eq!(lines[6], "10000");
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let file = StateFile::new(tmp.path().join("program_state.txt"));
        let state = sample_state();
        file.save(&state).unwrap();

        let loaded = file.load();
        assert_eq!(loaded.clear_color, state.clear_color);
        assert_eq!(loaded.ui_enabled, state.ui_enabled);
        assert_eq!(loaded.camera.position, state.camera.position);
        assert!((loaded.camera.front() - state.camera.front()).length() < 1e-4);
    }

    #[test]
    fn non_unit_front_is_normalized_on_load() {
        let mut state = ProgramState::default();
        decode_into(&mut state, "0 0 0 0 0 0 0 0 0 -5");
        assert!((state.camera.front() - Vec3::NEG_Z).length() < 1e-5);
        state.camera.process_keyboard(hangar_common::Movement::Forward, 1.0);
        assert!((state.camera.position.length() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn restored_front_drives_next_look() {
        let tmp = tempfile::tempdir().unwrap();
        let file = StateFile::new(tmp.path().join("program_state.txt"));
        let state = sample_state();
        file.save(&state).unwrap();

        let mut loaded = file.load();
        loaded.camera.process_mouse_movement(0.0, 0.0);
        assert!((loaded.camera.front() - state.camera.front()).length() < 1e-4);
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let file = StateFile::new(tmp.path().join("does_not_exist.txt"));
        assert_eq!(file.load(), ProgramState::default());
    }

    #[test]
    fn short_file_applies_leading_fields_only() {
        let mut state = ProgramState::default();
        let read = decode_into(&mut state, "0.5\n0.6\n0.7\n1\n9.0\n");
        assert_eq!(read, 5);
        assert_eq!(state.clear_color, Vec3::new(0.5, 0.6, 0.7));
        assert!(state.ui_enabled);
        assert_eq!(state.camera.position, Vec3::new(9.0, 0.0, 3.0));
        assert_eq!(state.camera.front(), ProgramState::default().camera.front());
    }

    #[test]
    fn malformed_field_stops_reading() {
        let mut state = ProgramState::default();
        let read = decode_into(&mut state, "0.5 oops 0.7 1 1 2 3 1 0 0");
        assert_eq!(read, 1);
        assert_eq!(state.clear_color, Vec3::new(0.5, 0.0, 0.0));
        assert!(!state.ui_enabled);
        assert_eq!(state.camera.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn bad_flag_stops_reading() {
        let mut state = ProgramState::default();
        let read = decode_into(&mut state, "0 0 0 2 5 5 5");
        assert_eq!(read, 3);
        assert!(!state.ui_enabled);
        assert_eq!(state.camera.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn save_to_missing_directory_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let file = StateFile::new(tmp.path().join("no_such_dir").join("state.txt"));
        let err = file.save(&ProgramState::default()).unwrap_err();
        assert!(matches!(err, PersistError::Write { .. }));
    }
}
