/// Title refresh interval in seconds.
pub const TITLE_INTERVAL: f32 = 1.0 / 30.0;

pub const TITLE_PREFIX: &str = "hangar5601";

/// Per-frame timing handed to input routing and the frame sequencer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTiming {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the last title refresh; scales camera movement.
    pub delta: f32,
    /// New window title, produced once per refresh interval.
    pub title: Option<String>,
}

/// Frame counter that refreshes an FPS/ms title roughly thirty times a second.
///
/// The delta it reports is measured from the last refresh, not from the
/// previous frame, so it grows within an interval and drops back after it.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_reset: f32,
    frames: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame at elapsed time `now` (seconds).
    pub fn tick(&mut self, now: f32) -> FrameTiming {
        let delta = now - self.last_reset;
        self.frames += 1;

        let title = if delta >= TITLE_INTERVAL {
            let title = format_title(delta, self.frames);
            self.last_reset = now;
            self.frames = 0;
            Some(title)
        } else {
            None
        };

        FrameTiming {
            elapsed: now,
            delta,
            title,
        }
    }
}

fn format_title(delta: f32, frames: u32) -> String {
    let fps = ((1.0 / delta) * frames as f32).round();
    let ms = ((delta / frames as f32) * 1000.0).round();
    format!("{TITLE_PREFIX} [{fps}]fps / [{ms}]ms")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_title_inside_interval() {
        let mut clock = FrameClock::new();
        let t = clock.tick(0.01);
        assert!(t.title.is_none());
        assert!((t.delta - 0.01).abs() < 1e-6);

        // Delta keeps growing until a refresh.
        let t = clock.tick(0.02);
        assert!((t.delta - 0.02).abs() < 1e-6);
    }

    #[test]
    fn title_after_interval_resets_counter() {
        let mut clock = FrameClock::new();
        for now in [0.01, 0.02, 0.03] {
            assert!(clock.tick(now).title.is_none());
        }
        // Fourth frame crosses 1/30 s: four frames over 0.04 s.
        let t = clock.tick(0.04);
        assert_eq!(t.title.as_deref(), Some("hangar5601 [100]fps / [10]ms"));

        let t = clock.tick(0.05);
        assert!(t.title.is_none());
        assert!((t.delta - 0.01).abs() < 1e-5);
    }
}
