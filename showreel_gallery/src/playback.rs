//! Single-preview playback policy.
//!
//! The controller is the only writer of the "current" item. It records the intended
//! item as soon as `activate` is called, so the previous preview is paused before the
//! new one is even requested. The "playing" marker is applied only once the host
//! confirms the asynchronous start, and only if that item is still the intended one.

use std::time::Duration;

use showreel_core::{Error, ItemId, PreviewMedia, resume_position};

use crate::item::Scene;
use crate::overlay::OverlayController;

#[derive(Debug)]
pub struct PlaybackController {
    current: Option<ItemId>,
    hide_delay: Duration,
    resume_offset: Duration,
}

impl PlaybackController {
    /// `hide_delay` is how long the caption stays up after a confirmed start.
    pub fn new(hide_delay: Duration, resume_offset: Duration) -> Self {
        Self {
            current: None,
            hide_delay,
            resume_offset,
        }
    }

    /// The item playback was most recently requested for, confirmed or not.
    pub fn current(&self) -> Option<ItemId> {
        self.current
    }

    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    pub fn activate<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
        id: ItemId,
    ) {
        let Some(media) = scene.get(id).and_then(|item| item.media()) else {
            log::trace!("activate {id}: nothing to play");
            return;
        };
        // Covers both "already playing" and "start already in flight".
        if self.current == Some(id) && !media.paused() && !media.ended() {
            log::trace!("activate {id}: already active");
            return;
        }

        if let Some(previous) = self.current.filter(|previous| *previous != id) {
            self.deactivate(scene, overlays, previous);
        }
        self.current = Some(id);

        let resume_offset = self.resume_offset;
        let Some(item) = scene.get_mut(id) else {
            return;
        };
        let first_play = !item.has_played;
        let recorded = if first_play { None } else { item.last_position };
        item.has_played = true;
        let Some(media) = item.media.as_mut() else {
            return;
        };

        if first_play {
            media.load();
        }
        let start = resume_position(recorded, media.duration(), resume_offset);
        if let Err(err) = media.seek(start) {
            log::debug!("activate {id}: could not seek to {start:?}: {err}");
        }

        log::debug!("activate {id}: requesting playback from {start:?}");
        if let Err(err) = media.play() {
            self.on_rejected(scene, overlays, id, &err);
        }
    }

    /// Stops `id` if it is playing or starting. No-op otherwise.
    pub fn deactivate<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
        id: ItemId,
    ) {
        if self.current == Some(id) {
            self.current = None;
        }
        let Some(item) = scene.get_mut(id) else {
            return;
        };
        let marked = item.playing;
        let Some(media) = item.media.as_mut() else {
            return;
        };
        if media.paused() {
            if !marked {
                return;
            }
        } else {
            media.pause();
            item.last_position = Some(media.position());
            log::debug!("deactivate {id}: paused at {:?}", item.last_position);
        }

        scene.set_playing(id, false);
        overlays.show(scene, id);
    }

    /// Deactivates every playable item.
    pub fn deactivate_all<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
    ) {
        for id in scene.playable_ids() {
            self.deactivate(scene, overlays, id);
        }
    }

    /// Applies the outcome of an asynchronous play attempt.
    pub fn on_play_settled<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
        id: ItemId,
        outcome: Result<(), Error>,
        now: Duration,
    ) {
        match outcome {
            Ok(()) => self.on_started(scene, overlays, id, now),
            Err(err) => self.on_rejected(scene, overlays, id, &err),
        }
    }

    fn on_started<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
        id: ItemId,
        now: Duration,
    ) {
        let Some(item) = scene.get_mut(id) else {
            return;
        };
        let Some(media) = item.media.as_mut() else {
            return;
        };

        if self.current != Some(id) {
            if !media.paused() {
                log::debug!("{id}: start confirmed after being superseded, pausing");
                media.pause();
                item.last_position = Some(media.position());
            }
            return;
        }
        if media.paused() {
            log::debug!("{id}: start confirmed for a paused preview, ignoring");
            return;
        }

        scene.set_playing(id, true);
        overlays.hide_after(scene, id, self.hide_delay, now);
    }

    fn on_rejected<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
        id: ItemId,
        err: &Error,
    ) {
        let Some(media) = scene.get(id).and_then(|item| item.media()) else {
            return;
        };
        if !media.paused() {
            log::debug!("{id}: ignoring stale rejection ({err}), a newer start is pending");
            return;
        }

        if self.current == Some(id) {
            self.current = None;
            log::warn!("preview {id} did not start: {err}");
        } else {
            log::debug!("{id}: abandoned start rejected: {err}");
        }
        scene.set_playing(id, false);
        overlays.show(scene, id);
    }

    /// Pauses everything that is playing or starting. Used when the page goes away.
    pub fn teardown<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        overlays: &mut OverlayController,
    ) {
        if let Some(id) = self.current {
            self.deactivate(scene, overlays, id);
        }
        for item in scene.items_mut() {
            let Some(media) = item.media.as_mut() else {
                continue;
            };
            if !media.paused() {
                media.pause();
                item.last_position = Some(media.position());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::GalleryItem;
    use crate::testing::FakeMedia;
    use showreel_core::ItemMarkup;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    struct Rig {
        scene: Scene<FakeMedia>,
        overlays: OverlayController,
        playback: PlaybackController,
    }

    impl Rig {
        fn new(hide_delay: Duration) -> Self {
            let items = vec![
                GalleryItem::new(ItemId(0), ItemMarkup::image("A"), Some(FakeMedia::new(10))),
                GalleryItem::new(ItemId(1), ItemMarkup::image("B"), Some(FakeMedia::new(10))),
                GalleryItem::new(ItemId(2), ItemMarkup::image("image only"), None),
            ];
            Self {
                scene: Scene::new(items),
                overlays: OverlayController::new(),
                playback: PlaybackController::new(hide_delay, ms(10)),
            }
        }

        fn activate(&mut self, id: usize) {
            self.playback
                .activate(&mut self.scene, &mut self.overlays, ItemId(id));
        }

        fn deactivate(&mut self, id: usize) {
            self.playback
                .deactivate(&mut self.scene, &mut self.overlays, ItemId(id));
        }

        fn settle(&mut self, id: usize, outcome: Result<(), Error>, now: Duration) {
            self.playback.on_play_settled(
                &mut self.scene,
                &mut self.overlays,
                ItemId(id),
                outcome,
                now,
            );
        }

        fn media(&mut self, id: usize) -> &mut FakeMedia {
            self.scene.get_mut(ItemId(id)).unwrap().media.as_mut().unwrap()
        }

        fn playing(&self, id: usize) -> bool {
            self.scene.get(ItemId(id)).unwrap().is_playing()
        }

        fn overlay_visible(&self, id: usize) -> bool {
            self.scene.get(ItemId(id)).unwrap().overlay_visible()
        }
    }

    #[test]
    fn confirmed_start_marks_playing_and_hides_overlay() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);

        assert_eq!(rig.playback.current(), Some(ItemId(0)));
        assert!(!rig.playing(0), "marker waits for confirmation");
        assert!(rig.overlay_visible(0));

        rig.settle(0, Ok(()), ms(5));
        assert!(rig.playing(0));
        assert!(!rig.overlay_visible(0));
    }

    #[test]
    fn first_play_loads_and_starts_past_zero() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        let media = rig.media(0);
        assert_eq!(media.load_calls, 1);
        assert_eq!(media.seeks, vec![ms(10)]);
        assert_eq!(media.play_calls, 1);
    }

    #[test]
    fn activating_another_item_stops_the_previous_one_first() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.settle(0, Ok(()), ms(0));

        rig.activate(1);
        assert!(!rig.playing(0));
        assert!(rig.overlay_visible(0));
        assert!(rig.media(0).paused());
        assert_eq!(rig.playback.current(), Some(ItemId(1)));

        rig.settle(1, Ok(()), ms(10));
        assert!(rig.playing(1));
        assert!(!rig.playing(0));
    }

    #[test]
    fn activate_twice_is_idempotent() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.activate(0);
        assert_eq!(rig.media(0).play_calls, 1);

        rig.settle(0, Ok(()), ms(0));
        rig.activate(0);
        assert_eq!(rig.media(0).play_calls, 1);
        assert!(rig.playing(0));
    }

    #[test]
    fn resumes_from_the_recorded_position() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.settle(0, Ok(()), ms(0));
        rig.media(0).run_for(Duration::from_millis(3_250));
        rig.deactivate(0);

        assert_eq!(
            rig.scene.get(ItemId(0)).unwrap().last_position(),
            Some(ms(3_260))
        );

        rig.activate(0);
        let media = rig.media(0);
        assert_eq!(media.load_calls, 1, "only the first play reloads");
        assert_eq!(media.position(), ms(3_260));
    }

    #[test]
    fn unknown_duration_restarts_near_the_beginning() {
        let mut rig = Rig::new(Duration::ZERO);
        *rig.media(1) = FakeMedia::new(10).without_metadata();
        rig.activate(1);
        // Seek fails without metadata; playback is still requested.
        assert!(rig.media(1).seeks.is_empty());
        assert_eq!(rig.media(1).play_calls, 1);
    }

    #[test]
    fn synchronous_refusal_leaves_overlay_and_clears_current() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.media(0).refuse_play = true;
        rig.activate(0);

        assert_eq!(rig.playback.current(), None);
        assert!(!rig.playing(0));
        assert!(rig.overlay_visible(0));
    }

    #[test]
    fn async_rejection_falls_back_to_overlay() {
        let mut rig = Rig::new(ms(1500));
        rig.activate(0);
        rig.media(0).reject_pending();
        rig.settle(0, Err(Error::PlaybackRejected("NotAllowedError".into())), ms(20));

        assert_eq!(rig.playback.current(), None);
        assert!(!rig.playing(0));
        assert!(rig.overlay_visible(0));
        assert_eq!(rig.overlays.pending(), 0);
    }

    #[test]
    fn media_failure_after_start_clears_playing() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.settle(0, Ok(()), ms(5));
        assert!(rig.playing(0));
        assert!(!rig.overlay_visible(0));

        // The backend pauses itself when the pipeline fails mid-stream.
        rig.media(0).pause();
        rig.settle(0, Err(Error::Media("decode failed".into())), ms(900));

        assert_eq!(rig.playback.current(), None);
        assert!(!rig.playing(0));
        assert!(rig.overlay_visible(0));
    }

    #[test]
    fn stale_rejection_does_not_cancel_a_newer_attempt() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.deactivate(0);
        rig.activate(0);
        // The first attempt's abort arrives while the second is pending.
        rig.settle(0, Err(Error::PlaybackRejected("AbortError".into())), ms(3));
        assert_eq!(rig.playback.current(), Some(ItemId(0)));

        rig.settle(0, Ok(()), ms(8));
        assert!(rig.playing(0));
    }

    #[test]
    fn superseded_confirmation_is_paused_and_not_marked() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(0);
        rig.activate(1);
        assert!(rig.media(0).paused());

        // A backend that confirms anyway: the media restarted behind our back.
        rig.media(0).play().unwrap();
        rig.settle(0, Ok(()), ms(4));
        assert!(!rig.playing(0));
        assert!(rig.media(0).paused());
    }

    #[test]
    fn deactivate_of_inactive_item_is_a_no_op() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.deactivate(0);
        rig.deactivate(2);
        assert_eq!(rig.media(0).pause_calls, 0);
        assert!(rig.scene.drain_changes().is_empty());
    }

    #[test]
    fn image_only_items_are_ignored() {
        let mut rig = Rig::new(Duration::ZERO);
        rig.activate(2);
        assert_eq!(rig.playback.current(), None);
        rig.settle(2, Ok(()), ms(0));
        assert!(!rig.playing(2));
    }

    #[test]
    fn teardown_pauses_everything() {
        let mut rig = Rig::new(ms(1500));
        rig.activate(0);
        rig.settle(0, Ok(()), ms(0));
        rig.playback.teardown(&mut rig.scene, &mut rig.overlays);

        assert!(rig.media(0).paused());
        assert!(rig.media(1).paused());
        assert!(!rig.playing(0));
        assert_eq!(rig.playback.current(), None);
        assert_eq!(rig.overlays.pending(), 0);
    }
}
