use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use gstreamer::{self as gst, prelude::*};
use gstreamer_app as gst_app;
use showreel_core::{Error, PreviewMedia};

use crate::config::GstConfig;

/// A preview video backed by a `playbin` pipeline.
///
/// Starting playback is asynchronous: [`play`](PreviewMedia::play) asks the pipeline
/// for `PLAYING`, and [`poll`](GstPreview::poll) reports whether it got there. Frames
/// are delivered to [`appsink`](GstPreview::appsink) for the host to draw.
#[derive(Debug)]
pub struct GstPreview {
    id: u64,
    uri: url::Url,
    config: GstConfig,

    pipeline: gst::Element,
    bus: gst::Bus,
    appsink: gst_app::AppSink,

    // Mirrors a media element's `paused` attribute: flips on request, not on arrival.
    requested_paused: bool,
    pending_play: bool,
    abandoned: Option<Error>,
    is_eos: bool,
    last_valid_position: Duration,
}

impl GstPreview {
    pub fn new(uri: &url::Url) -> Result<Self, Error> {
        Self::with_config(uri, GstConfig::default())
    }

    pub fn with_config(uri: &url::Url, config: GstConfig) -> Result<Self, Error> {
        crate::init()?;
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);

        let appsink = gst_app::AppSink::builder()
            .drop(true)
            .max_buffers(config.max_buffers)
            .sync(true)
            .caps(
                &gst::Caps::builder("video/x-raw")
                    .field("format", "RGBA")
                    .field("pixel-aspect-ratio", gst::Fraction::new(1, 1))
                    .build(),
            )
            .build();
        let video_sink: gst::Element = appsink.clone().upcast();

        let pipeline = gst::ElementFactory::make("playbin")
            .name(format!("showreel-preview-{id}"))
            .property("uri", uri.as_str())
            .property("video-sink", &video_sink)
            .property("mute", config.muted)
            .build()
            .map_err(|e| {
                log::error!("Failed to create playbin: {:?}", e);
                Error::Pipeline(e.to_string())
            })?;

        let bus = pipeline
            .bus()
            .ok_or_else(|| Error::Pipeline("playbin has no bus".into()))?;

        // READY opens nothing yet; `load` prerolls to fetch metadata and a first frame.
        if let Err(e) = pipeline.set_state(gst::State::Ready) {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(Error::Pipeline(e.to_string()));
        }

        log::debug!("preview {id} created for {uri}");
        Ok(Self {
            id,
            uri: uri.clone(),
            config,
            pipeline,
            bus,
            appsink,
            requested_paused: true,
            pending_play: false,
            abandoned: None,
            is_eos: false,
            last_valid_position: Duration::ZERO,
        })
    }

    pub fn uri(&self) -> &url::Url {
        &self.uri
    }

    pub fn appsink(&self) -> &gst_app::AppSink {
        &self.appsink
    }

    pub fn is_play_pending(&self) -> bool {
        self.pending_play
    }

    /// Drains the pipeline bus and returns the next outcome for the host to forward to
    /// the gallery: `Ok` once a pending play reaches `PLAYING`, `Err` if a pending play
    /// was abandoned or if the pipeline failed, whether or not playback had started.
    pub fn poll(&mut self) -> Option<Result<(), Error>> {
        if let Some(err) = self.abandoned.take() {
            return Some(Err(err));
        }

        while let Some(msg) = self.bus.pop() {
            match msg.view() {
                gst::MessageView::Error(err) => {
                    log::error!(
                        "preview {}: bus returned an error: {} ({:?})",
                        self.id,
                        err.error(),
                        err.debug()
                    );
                    self.requested_paused = true;
                    self.pending_play = false;
                    let _ = self.pipeline.set_state(gst::State::Paused);
                    return Some(Err(Error::Media(err.error().to_string())));
                }
                gst::MessageView::Eos(_) => {
                    if self.config.looping {
                        if let Err(e) = self.seek(Duration::ZERO) {
                            log::warn!("preview {}: failed to loop: {e}", self.id);
                        }
                    } else {
                        self.is_eos = true;
                        self.requested_paused = true;
                    }
                }
                gst::MessageView::StateChanged(state_changed) => {
                    let from_pipeline = state_changed
                        .src()
                        .map(|s| s == &self.pipeline)
                        .unwrap_or(false);
                    if from_pipeline
                        && state_changed.current() == gst::State::Playing
                        && self.pending_play
                    {
                        self.pending_play = false;
                        log::debug!("preview {} reached PLAYING", self.id);
                        return Some(Ok(()));
                    }
                }
                _ => {}
            }
        }

        if let Some(pos) = self.pipeline.query_position::<gst::ClockTime>() {
            self.last_valid_position = Duration::from_nanos(pos.nseconds());
        }
        None
    }
}

impl PreviewMedia for GstPreview {
    fn paused(&self) -> bool {
        self.requested_paused
    }

    fn ended(&self) -> bool {
        self.is_eos
    }

    fn position(&self) -> Duration {
        self.pipeline
            .query_position::<gst::ClockTime>()
            .map(|pos| Duration::from_nanos(pos.nseconds()))
            .unwrap_or(self.last_valid_position)
    }

    fn duration(&self) -> Option<Duration> {
        self.pipeline
            .query_duration::<gst::ClockTime>()
            .map(|d| Duration::from_nanos(d.nseconds()))
            .filter(|d| !d.is_zero())
    }

    fn seek(&mut self, position: Duration) -> Result<(), Error> {
        let (_, state, _) = self.pipeline.state(gst::ClockTime::ZERO);
        if matches!(state, gst::State::Null | gst::State::Ready) {
            log::debug!("preview {}: cannot seek before preroll", self.id);
            return Err(Error::InvalidState);
        }

        self.pipeline
            .seek_simple(
                gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT,
                gst::ClockTime::from_nseconds(position.as_nanos() as u64),
            )
            .map_err(|e| {
                log::debug!("preview {}: seek failed: {:?}", self.id, e);
                Error::Seek(position)
            })?;
        self.is_eos = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        self.requested_paused = false;
        self.is_eos = false;
        match self.pipeline.set_state(gst::State::Playing) {
            Ok(change) => {
                log::trace!("preview {}: PLAYING requested ({change:?})", self.id);
                self.pending_play = true;
                Ok(())
            }
            Err(e) => {
                self.requested_paused = true;
                Err(Error::PlaybackRejected(e.to_string()))
            }
        }
    }

    fn pause(&mut self) {
        self.requested_paused = true;
        if std::mem::take(&mut self.pending_play) {
            self.abandoned = Some(Error::PlaybackRejected(
                "play request interrupted by pause".into(),
            ));
        }
        if let Err(e) = self.pipeline.set_state(gst::State::Paused) {
            log::warn!("preview {}: failed to pause: {e}", self.id);
        }
    }

    fn load(&mut self) {
        let (_, state, _) = self.pipeline.state(gst::ClockTime::ZERO);
        if matches!(state, gst::State::Null | gst::State::Ready)
            && let Err(e) = self.pipeline.set_state(gst::State::Paused)
        {
            log::warn!("preview {}: preroll failed: {e}", self.id);
        }
    }
}

impl Drop for GstPreview {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Skips quietly on machines without GStreamer or the playbin plugin.
    fn preview() -> Option<GstPreview> {
        init_logging();
        let uri = url::Url::parse("file:///nonexistent/showreel/preview.mp4").ok()?;
        match GstPreview::new(&uri) {
            Ok(preview) => Some(preview),
            Err(e) => {
                log::warn!("skipping: {e}");
                None
            }
        }
    }

    #[test]
    fn fresh_preview_is_paused_without_metadata() {
        let Some(preview) = preview() else {
            return;
        };
        assert!(preview.paused());
        assert!(!preview.ended());
        assert!(!preview.is_play_pending());
        assert_eq!(preview.duration(), None);
        assert_eq!(preview.position(), Duration::ZERO);
    }

    #[test]
    fn seek_before_preroll_is_refused() {
        let Some(mut preview) = preview() else {
            return;
        };
        assert_eq!(preview.seek(Duration::from_millis(10)), Err(Error::InvalidState));
    }

    #[test]
    fn bus_error_after_start_is_reported() {
        let Some(mut preview) = preview() else {
            return;
        };
        let message = gst::message::Error::builder(gst::CoreError::Failed, "decode failed")
            .src(&preview.pipeline)
            .build();
        assert!(preview.bus.post(message).is_ok());

        assert!(!preview.is_play_pending());
        assert!(matches!(preview.poll(), Some(Err(Error::Media(_)))));
        assert!(preview.paused());
    }

    #[test]
    fn pause_abandons_a_pending_play() {
        let Some(mut preview) = preview() else {
            return;
        };
        if preview.play().is_err() {
            return;
        }
        preview.pause();
        assert!(preview.paused());
        assert!(matches!(preview.poll(), Some(Err(Error::PlaybackRejected(_)))));
    }
}
