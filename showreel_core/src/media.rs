use std::time::Duration;

use crate::Error;

/// A preview video element the gallery can start and stop.
///
/// Mirrors the subset of a media element the playback policy relies on. Starting
/// playback is asynchronous: [`play`](PreviewMedia::play) only requests it, and the
/// host reports the outcome later through the gallery.
pub trait PreviewMedia {
    /// Get if the media is paused or not.
    ///
    /// Must report `false` as soon as [`play`](PreviewMedia::play) has been called,
    /// before the attempt settles.
    fn paused(&self) -> bool;

    /// Get if the stream reached its end (never true for looping media).
    fn ended(&self) -> bool;

    /// Get the current playback position.
    fn position(&self) -> Duration;

    /// Get the media duration, if metadata has loaded.
    fn duration(&self) -> Option<Duration>;

    /// Jumps to a specific position in the media.
    fn seek(&mut self, position: Duration) -> Result<(), Error>;

    /// Requests playback. `Err` means the request was refused synchronously; otherwise
    /// the outcome arrives asynchronously.
    fn play(&mut self) -> Result<(), Error>;

    /// Pauses playback. Any pending play request is abandoned.
    fn pause(&mut self);

    /// (Re)loads the media source so that metadata and the first frames are fetched.
    fn load(&mut self) {}
}

impl<M: PreviewMedia + ?Sized> PreviewMedia for Box<M> {
    fn paused(&self) -> bool {
        (**self).paused()
    }

    fn ended(&self) -> bool {
        (**self).ended()
    }

    fn position(&self) -> Duration {
        (**self).position()
    }

    fn duration(&self) -> Option<Duration> {
        (**self).duration()
    }

    fn seek(&mut self, position: Duration) -> Result<(), Error> {
        (**self).seek(position)
    }

    fn play(&mut self) -> Result<(), Error> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn load(&mut self) {
        (**self).load()
    }
}

/// Where a (re)started preview should begin.
///
/// A recorded position is honoured when it lies inside the known duration; anything
/// else starts at `fresh_offset`, slightly past zero so the first decoded frame is
/// shown instead of a black one.
pub fn resume_position(
    recorded: Option<Duration>,
    duration: Option<Duration>,
    fresh_offset: Duration,
) -> Duration {
    match (recorded, duration) {
        (Some(position), Some(duration)) if position < duration => position,
        _ => fresh_offset,
    }
}
