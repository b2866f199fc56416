//! Caption overlay visibility with per-item delayed hiding.

use std::time::Duration;

use showreel_core::{ItemId, PreviewMedia};

use crate::item::Scene;
use crate::timer::TimerQueue;

/// Shows and hides caption overlays.
///
/// Hide delays are tracked per item: scheduling one item's hide never cancels
/// another item's.
#[derive(Debug, Default)]
pub struct OverlayController {
    pending: TimerQueue<ItemId>,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending hide for `id` and shows its overlay.
    pub fn show<M: PreviewMedia>(&mut self, scene: &mut Scene<M>, id: ItemId) {
        self.pending.cancel(id);
        scene.set_overlay_hidden(id, false);
    }

    /// Cancels any pending hide for `id`, then hides now (`delay == 0`) or at `now + delay`.
    pub fn hide_after<M: PreviewMedia>(
        &mut self,
        scene: &mut Scene<M>,
        id: ItemId,
        delay: Duration,
        now: Duration,
    ) {
        self.pending.cancel(id);
        if !scene.get(id).is_some_and(|item| item.has_overlay()) {
            return;
        }
        if delay.is_zero() {
            scene.set_overlay_hidden(id, true);
        } else {
            log::trace!("overlay {id}: hiding in {delay:?}");
            self.pending.schedule(id, now + delay);
        }
    }

    pub fn is_hide_pending(&self, id: ItemId) -> bool {
        self.pending.is_pending(id)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.pending.next_deadline()
    }

    /// Fires the earliest hide due at `now`. Returns false if none was due.
    pub(crate) fn fire_due<M: PreviewMedia>(&mut self, scene: &mut Scene<M>, now: Duration) -> bool {
        let Some((id, _)) = self.pending.pop_due(now) else {
            return false;
        };
        log::trace!("overlay {id}: delayed hide fired");
        scene.set_overlay_hidden(id, true);
        true
    }

    pub(crate) fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Change, GalleryItem, PresentationChange};
    use crate::testing::FakeMedia;
    use showreel_core::ItemMarkup;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene() -> Scene<FakeMedia> {
        Scene::new(vec![
            GalleryItem::new(ItemId(0), ItemMarkup::image("a"), Some(FakeMedia::new(10))),
            GalleryItem::new(ItemId(1), ItemMarkup::image("b"), Some(FakeMedia::new(10))),
            GalleryItem::new(
                ItemId(2),
                ItemMarkup::image("bare").without_overlay(),
                Some(FakeMedia::new(10)),
            ),
        ])
    }

    fn drain_until(
        overlays: &mut OverlayController,
        scene: &mut Scene<FakeMedia>,
        now: Duration,
    ) {
        while overlays.fire_due(scene, now) {}
    }

    #[test]
    fn zero_delay_hides_immediately() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(0), Duration::ZERO, ms(0));

        assert!(!scene.get(ItemId(0)).unwrap().overlay_visible());
        assert_eq!(overlays.pending(), 0);
        assert_eq!(
            scene.drain_changes(),
            vec![PresentationChange {
                item: ItemId(0),
                change: Change::OverlayHidden(true)
            }]
        );
    }

    #[test]
    fn delayed_hide_respects_the_clock() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(0), ms(1500), ms(0));

        drain_until(&mut overlays, &mut scene, ms(1000));
        assert!(scene.get(ItemId(0)).unwrap().overlay_visible());

        drain_until(&mut overlays, &mut scene, ms(1600));
        assert!(!scene.get(ItemId(0)).unwrap().overlay_visible());
    }

    #[test]
    fn show_cancels_a_pending_hide() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(0), ms(500), ms(0));
        overlays.show(&mut scene, ItemId(0));

        assert!(!overlays.is_hide_pending(ItemId(0)));
        drain_until(&mut overlays, &mut scene, ms(10_000));
        assert!(scene.get(ItemId(0)).unwrap().overlay_visible());
    }

    #[test]
    fn items_have_independent_hide_timers() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(0), ms(500), ms(0));
        overlays.hide_after(&mut scene, ItemId(1), ms(800), ms(100));

        assert!(overlays.is_hide_pending(ItemId(0)));
        assert!(overlays.is_hide_pending(ItemId(1)));

        drain_until(&mut overlays, &mut scene, ms(900));
        assert!(!scene.get(ItemId(0)).unwrap().overlay_visible());
        assert!(!scene.get(ItemId(1)).unwrap().overlay_visible());
    }

    #[test]
    fn rescheduling_supersedes_the_earlier_hide() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(0), ms(200), ms(0));
        overlays.hide_after(&mut scene, ItemId(0), ms(1000), ms(100));

        drain_until(&mut overlays, &mut scene, ms(500));
        assert!(scene.get(ItemId(0)).unwrap().overlay_visible());
        drain_until(&mut overlays, &mut scene, ms(1100));
        assert!(!scene.get(ItemId(0)).unwrap().overlay_visible());
    }

    #[test]
    fn missing_overlay_is_a_no_op() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.hide_after(&mut scene, ItemId(2), ms(100), ms(0));
        overlays.show(&mut scene, ItemId(2));
        overlays.hide_after(&mut scene, ItemId(9), Duration::ZERO, ms(0));

        assert_eq!(overlays.pending(), 0);
        assert!(scene.drain_changes().is_empty());
    }

    #[test]
    fn show_is_idempotent() {
        let mut scene = scene();
        let mut overlays = OverlayController::new();
        overlays.show(&mut scene, ItemId(0));
        overlays.show(&mut scene, ItemId(0));
        assert!(scene.drain_changes().is_empty());
    }
}
