//! Multi-file playback: each queued preset plays for one interval.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::timer::Ticker;
use crate::{Controller, ControllerError};

/// Outcome of advancing the queue.
#[derive(Debug)]
pub enum QueueEvent {
    /// A preset was applied to the channel bank.
    Loaded(PathBuf),
    /// A preset could not be loaded; it is dropped from the queue.
    Failed { path: PathBuf, error: ControllerError },
    /// The last preset's interval ran out; output has been stopped.
    Complete,
}

/// Ordered presets consumed one per `play_time` interval.
#[derive(Clone, Debug)]
pub struct PlaybackQueue {
    pending: VecDeque<PathBuf>,
    ticker: Ticker,
}

impl PlaybackQueue {
    pub fn new(play_time: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            ticker: Ticker::new(play_time),
        }
    }

    /// Files still waiting their turn.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// True while the interval timer runs (two or more files were queued).
    pub fn is_active(&self) -> bool {
        self.ticker.is_active()
    }

    /// Replace the queue and load the first file immediately. An empty
    /// selection leaves everything as it was. The interval
    /// timer only runs for two or more files; a single file plays until the
    /// user stops it.
    pub fn load(
        &mut self,
        paths: Vec<PathBuf>,
        now: Instant,
        ctrl: &Controller,
    ) -> Option<QueueEvent> {
        if paths.is_empty() {
            return None;
        }
        self.pending = paths.into();
        if self.pending.len() > 1 {
            self.ticker.start(now);
            tracing::info!("{} files queued", self.pending.len());
        } else {
            self.ticker.stop();
        }
        self.advance(ctrl)
    }

    /// Advance on a due tick: load the next file, or finish playback.
    pub fn tick(&mut self, now: Instant, ctrl: &Controller) -> Option<QueueEvent> {
        if !self.ticker.poll(now) {
            return None;
        }
        if self.pending.is_empty() {
            self.ticker.stop();
            ctrl.enable_output(false);
            tracing::info!("Playback complete");
            return Some(QueueEvent::Complete);
        }
        self.advance(ctrl)
    }

    fn advance(&mut self, ctrl: &Controller) -> Option<QueueEvent> {
        let path = self.pending.pop_front()?;
        match ctrl.load_preset(&path) {
            Ok(_) => Some(QueueEvent::Loaded(path)),
            Err(error) => {
                tracing::error!("Failed to load {}: {}", path.display(), error);
                Some(QueueEvent::Failed { path, error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use std::fs;

    const PLAY: Duration = Duration::from_millis(10_000);

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn empty_selection_does_nothing() {
        let ctrl = Controller::new(Config::default()).unwrap();
        let mut queue = PlaybackQueue::new(PLAY);
        assert!(queue.load(Vec::new(), Instant::now(), &ctrl).is_none());
        assert!(!queue.is_active());
    }

    #[test]
    fn failed_entry_keeps_timer_running() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "good.csv", "300,0.5,0\n");
        let bad = write(&dir, "bad.csv", "300,oops,0\n");
        let ctrl = Controller::new(Config::default()).unwrap();
        let mut queue = PlaybackQueue::new(PLAY);
        let t0 = Instant::now();

        let first = queue.load(vec![bad, good.clone()], t0, &ctrl);
        assert!(matches!(first, Some(QueueEvent::Failed { .. })));
        assert!(queue.is_active());

        match queue.tick(t0 + PLAY, &ctrl) {
            Some(QueueEvent::Loaded(p)) => assert_eq!(p, good),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ctrl.row(0).unwrap().frequency, 300.0);
    }

    #[test]
    fn single_file_cancels_running_timer() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.csv", "300,0.5,0\n");
        let b = write(&dir, "b.csv", "600,0.5,0\n");
        let ctrl = Controller::new(Config::default()).unwrap();
        let mut queue = PlaybackQueue::new(PLAY);
        let t0 = Instant::now();

        queue.load(vec![a.clone(), b], t0, &ctrl);
        assert!(queue.is_active());
        queue.load(vec![a], t0, &ctrl);
        assert!(!queue.is_active());
    }
}
