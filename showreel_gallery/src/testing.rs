use std::time::Duration;

use showreel_core::{Error, PreviewMedia};

/// Media element double that behaves like a muted, looping `<video>`.
#[derive(Debug, Clone)]
pub(crate) struct FakeMedia {
    paused: bool,
    position: Duration,
    duration: Option<Duration>,
    pub refuse_play: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub load_calls: usize,
    pub seeks: Vec<Duration>,
}

impl FakeMedia {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            paused: true,
            position: Duration::ZERO,
            duration: Some(Duration::from_secs(duration_secs)),
            refuse_play: false,
            play_calls: 0,
            pause_calls: 0,
            load_calls: 0,
            seeks: Vec::new(),
        }
    }

    pub fn without_metadata(self) -> Self {
        Self {
            duration: None,
            ..self
        }
    }

    /// The host rejected the pending play attempt.
    pub fn reject_pending(&mut self) {
        self.paused = true;
    }

    /// Lets wall time pass while playing.
    pub fn run_for(&mut self, elapsed: Duration) {
        if !self.paused {
            self.position += elapsed;
        }
    }
}

impl PreviewMedia for FakeMedia {
    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        false
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn seek(&mut self, position: Duration) -> Result<(), Error> {
        if self.duration.is_none() {
            return Err(Error::Seek(position));
        }
        self.seeks.push(position);
        self.position = position;
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        self.play_calls += 1;
        if self.refuse_play {
            return Err(Error::PlaybackRejected("NotAllowedError".into()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn load(&mut self) {
        self.load_calls += 1;
        self.position = Duration::ZERO;
    }
}
