//! Scope refresh loop: Paused / Running, ticked every frame interval.

use std::time::{Duration, Instant};

use lj_engine::Point;

use crate::timer::Ticker;
use crate::Controller;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphState {
    Paused,
    Running,
}

/// Drives the XY scope from the controller's capture table.
#[derive(Clone, Debug)]
pub struct DisplayLoop {
    state: GraphState,
    ticker: Ticker,
}

impl DisplayLoop {
    /// Starts Paused with the refresh timer already running.
    pub fn new(frame_rate: Duration, now: Instant) -> Self {
        let mut ticker = Ticker::new(frame_rate);
        ticker.start(now);
        Self {
            state: GraphState::Paused,
            ticker,
        }
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GraphState::Running
    }

    /// Label for the control that toggles this loop.
    pub fn label(&self) -> &'static str {
        match self.state {
            GraphState::Running => "Pause Graph",
            GraphState::Paused => "Start Graph",
        }
    }

    /// Flip between Paused and Running, arming or disarming capture.
    pub fn toggle(&mut self, ctrl: &Controller) -> GraphState {
        self.state = match self.state {
            GraphState::Paused => {
                arm(ctrl);
                GraphState::Running
            }
            GraphState::Running => {
                ctrl.arm_capture(false);
                GraphState::Paused
            }
        };
        self.state
    }

    /// On a due tick while Running: read the last window, re-arm, and
    /// return the points to draw. `None` means keep the current plot.
    pub fn tick(&mut self, now: Instant, ctrl: &Controller) -> Option<Vec<Point>> {
        if !self.ticker.poll(now) || self.state == GraphState::Paused {
            return None;
        }
        let points = ctrl.capture_points();
        arm(ctrl);
        Some(points)
    }
}

/// Without a device nothing renders in the background, so fill the window here.
fn arm(ctrl: &Controller) {
    ctrl.arm_capture(true);
    if !ctrl.is_booted() {
        ctrl.refill_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn setup() -> (Controller, DisplayLoop, Instant) {
        let cfg = Config::default();
        let now = Instant::now();
        let display = DisplayLoop::new(cfg.frame_rate, now);
        (Controller::new(cfg).unwrap(), display, now)
    }

    #[test]
    fn labels_follow_state() {
        let (ctrl, mut display, _) = setup();
        assert_eq!(display.label(), "Start Graph");
        display.toggle(&ctrl);
        assert_eq!(display.label(), "Pause Graph");
    }

    #[test]
    fn paused_ticks_are_noops() {
        let (ctrl, mut display, t0) = setup();
        assert_eq!(display.tick(t0 + Duration::from_secs(1), &ctrl), None);
    }

    #[test]
    fn running_tick_returns_a_full_window() {
        let (ctrl, mut display, t0) = setup();
        display.toggle(&ctrl);
        assert_eq!(display.tick(t0, &ctrl), None);

        let points = display.tick(t0 + Duration::from_millis(200), &ctrl).unwrap();
        assert_eq!(points.len(), ctrl.capture_capacity());
        assert!(points.iter().any(|p| p.x != 0.0 && p.y != 0.0));
    }

    #[test]
    fn pausing_disarms_a_partial_capture() {
        let (ctrl, mut display, _) = setup();
        display.toggle(&ctrl);

        // Capture still in progress when the user pauses
        ctrl.arm_capture(true);
        ctrl.pump(ctrl.capture_capacity() / 2);
        assert!(ctrl.is_capture_armed());

        assert_eq!(display.toggle(&ctrl), GraphState::Paused);
        assert!(!ctrl.is_capture_armed());
    }

    #[test]
    fn headless_scope_ticks_do_not_feed_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let (ctrl, mut display, t0) = setup();
        ctrl.enable_output(true);
        ctrl.toggle_recording(&path).unwrap();

        display.toggle(&ctrl);
        for i in 1..=50 {
            assert!(display.tick(t0 + Duration::from_millis(200) * i, &ctrl).is_some());
        }
        ctrl.toggle_recording(&path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 0);
    }
}
