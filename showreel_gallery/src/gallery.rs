//! The gallery coordinator: owns the tracked items, the playback and overlay
//! controllers and the input adapter chosen for this page load, and routes host
//! events and timer deadlines between them.

use std::time::Duration;

use showreel_core::{DeviceClass, Error, ItemId, ItemMarkup, Layout, PreviewMedia, Result};

use crate::adapter::{self, AdapterContext, InputAdapter, InputEvent, Intent};
use crate::config::GalleryConfig;
use crate::item::{GalleryItem, PresentationChange, Scene};
use crate::overlay::OverlayController;
use crate::playback::PlaybackController;
use crate::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GalleryTimer {
    Preload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but `start` not called yet.
    Idle,
    Running,
    /// Torn down on navigation; every call is ignored.
    TornDown,
}

#[derive(Debug)]
pub struct Gallery<M> {
    config: GalleryConfig,
    device: DeviceClass,
    phase: Phase,

    scene: Scene<M>,
    candidates: Vec<ItemId>,
    playback: PlaybackController,
    overlays: OverlayController,
    adapter: Box<dyn InputAdapter>,
    timers: TimerQueue<GalleryTimer>,
}

impl<M: PreviewMedia> Gallery<M> {
    /// Builds a gallery whose adapter is picked from `device`.
    pub fn new(
        items: impl IntoIterator<Item = (ItemMarkup, Option<M>)>,
        device: DeviceClass,
        config: GalleryConfig,
    ) -> Result<Self> {
        let adapter = adapter::for_device(device, &config);
        Self::with_adapter(items, adapter, config)
    }

    /// Builds a gallery, deciding the device class once from the viewport width.
    pub fn for_viewport_width(
        items: impl IntoIterator<Item = (ItemMarkup, Option<M>)>,
        viewport_width: f64,
        config: GalleryConfig,
    ) -> Result<Self> {
        let device = DeviceClass::from_viewport_width(viewport_width, config.mobile_breakpoint_px);
        Self::new(items, device, config)
    }

    /// Builds a gallery driven by a caller-supplied adapter.
    pub fn with_adapter(
        items: impl IntoIterator<Item = (ItemMarkup, Option<M>)>,
        adapter: Box<dyn InputAdapter>,
        config: GalleryConfig,
    ) -> Result<Self> {
        config.validate()?;

        let items: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, (markup, media))| GalleryItem::new(ItemId(index), markup, media))
            .collect();
        let scene = Scene::new(items);
        let candidates = scene.playable_ids();

        let device = adapter.device_class();
        let hide_delay = match device {
            DeviceClass::Desktop => config.desktop_overlay_delay,
            DeviceClass::Mobile => config.mobile_overlay_delay,
        };

        Ok(Self {
            config,
            device,
            phase: Phase::Idle,
            scene,
            candidates,
            playback: PlaybackController::new(hide_delay, config.resume_offset),
            overlays: OverlayController::new(),
            adapter,
            timers: TimerQueue::new(),
        })
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn item(&self, id: ItemId) -> Option<&GalleryItem<M>> {
        self.scene.get(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut GalleryItem<M>> {
        self.scene.get_mut(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &GalleryItem<M>> {
        self.scene.items()
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// The item playback was most recently requested for.
    pub fn current(&self) -> Option<ItemId> {
        self.playback.current()
    }

    /// Items currently carrying the "playing" state. Never more than one.
    pub fn playing(&self) -> Vec<ItemId> {
        self.scene
            .items()
            .filter(|item| item.is_playing())
            .map(GalleryItem::id)
            .collect()
    }

    /// Timers still waiting to fire, across the coordinator, adapter and overlays.
    pub fn pending_timers(&self) -> usize {
        self.timers.len() + self.adapter.pending_timers() + self.overlays.pending()
    }

    /// Earliest deadline the host should call [`advance`](Self::advance) at.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.timers.next_deadline(),
            self.adapter.next_deadline(),
            self.overlays.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Presentation changes since the last call, in the order they happened.
    pub fn drain_changes(&mut self) -> Vec<PresentationChange> {
        self.scene.drain_changes()
    }

    pub fn start(&mut self, now: Duration, layout: &dyn Layout) {
        if self.phase != Phase::Idle {
            log::debug!("gallery start ignored in phase {:?}", self.phase);
            return;
        }
        self.phase = Phase::Running;
        log::info!(
            "gallery started: {} items, {} playable, {} input",
            self.scene.len(),
            self.candidates.len(),
            self.device
        );

        if !self.candidates.is_empty() {
            self.timers
                .schedule(GalleryTimer::Preload, now + self.config.preload_delay);
        }

        let mut cx = AdapterContext::new(now, layout, &self.candidates);
        self.adapter.start(&mut cx);
        let intents = cx.into_intents();
        self.apply(intents);
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Duration, layout: &dyn Layout) {
        if self.phase != Phase::Running {
            log::trace!("{event:?} ignored in phase {:?}", self.phase);
            return;
        }
        // Everything already due happens before this event.
        self.advance(now, layout);

        let mut cx = AdapterContext::new(now, layout, &self.candidates);
        self.adapter.handle(event, &mut cx);
        let intents = cx.into_intents();
        self.apply(intents);
    }

    /// Fires every timer due at `now`, earliest first.
    ///
    /// Each timer fires at its own deadline, so work it schedules is timed from there.
    pub fn advance(&mut self, now: Duration, layout: &dyn Layout) {
        if self.phase != Phase::Running {
            return;
        }
        while let Some(deadline) = self.next_deadline().filter(|deadline| *deadline <= now) {
            if self.timers.next_deadline() == Some(deadline) {
                if let Some((timer, _)) = self.timers.pop_due(deadline) {
                    self.fire(timer);
                }
            } else if self.adapter.next_deadline() == Some(deadline) {
                let mut cx = AdapterContext::new(deadline, layout, &self.candidates);
                self.adapter.fire_due(&mut cx);
                let intents = cx.into_intents();
                self.apply(intents);
            } else {
                self.overlays.fire_due(&mut self.scene, deadline);
            }
        }
    }

    /// Reports how an asynchronous play attempt for `id` ended.
    pub fn on_play_settled(&mut self, id: ItemId, outcome: Result<()>, now: Duration) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.playback
            .on_play_settled(&mut self.scene, &mut self.overlays, id, outcome, now);
    }

    /// Issues an intent directly, bypassing the adapter. Ignored unless running.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<()> {
        if self.phase != Phase::Running {
            log::trace!("{intent:?} ignored in phase {:?}", self.phase);
            return Ok(());
        }
        match intent {
            Intent::Activate(id) | Intent::Deactivate(id) if self.scene.get(id).is_none() => {
                Err(Error::UnknownItem(id))
            }
            _ => {
                self.apply([intent]);
                Ok(())
            }
        }
    }

    /// Pauses whatever is playing and drops every pending timer.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.timers.clear();
        self.adapter.cancel_timers();
        self.playback.teardown(&mut self.scene, &mut self.overlays);
        self.overlays.cancel_all();
        self.phase = Phase::TornDown;
        log::debug!("gallery torn down");
    }

    fn apply(&mut self, intents: impl IntoIterator<Item = Intent>) {
        for intent in intents {
            match intent {
                Intent::Activate(id) => {
                    self.playback
                        .activate(&mut self.scene, &mut self.overlays, id)
                }
                Intent::Deactivate(id) => {
                    self.playback
                        .deactivate(&mut self.scene, &mut self.overlays, id)
                }
                Intent::DeactivateAll => self
                    .playback
                    .deactivate_all(&mut self.scene, &mut self.overlays),
            }
        }
    }

    fn fire(&mut self, timer: GalleryTimer) {
        match timer {
            GalleryTimer::Preload => {
                let mut loaded = 0;
                for item in self.scene.items_mut() {
                    if item.has_played {
                        continue;
                    }
                    if let Some(media) = item.media.as_mut() {
                        media.load();
                        loaded += 1;
                    }
                }
                log::debug!("preloaded {loaded} previews");
            }
        }
    }
}
