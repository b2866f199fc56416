//! Input adapters translate raw page events into playback intents.
//!
//! One adapter is chosen per page load from the device class. Adapters never touch
//! playback state themselves; they only emit [`Intent`]s that the gallery hands to the
//! playback controller.

mod desktop;
mod mobile;

use std::fmt;
use std::time::Duration;

use showreel_core::{DeviceClass, ItemId, Layout};

use crate::config::GalleryConfig;

pub use desktop::HoverAdapter;
pub use mobile::ScrollAdapter;

/// Raw events delivered by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerEnter(ItemId),
    PointerLeave(ItemId),
    Scroll,
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Activate(ItemId),
    Deactivate(ItemId),
    DeactivateAll,
}

/// What an adapter can see and emit while handling an event or a timer.
pub struct AdapterContext<'a> {
    pub now: Duration,
    pub layout: &'a dyn Layout,
    /// Playable items in page order.
    pub candidates: &'a [ItemId],
    intents: Vec<Intent>,
}

impl<'a> AdapterContext<'a> {
    pub fn new(now: Duration, layout: &'a dyn Layout, candidates: &'a [ItemId]) -> Self {
        Self {
            now,
            layout,
            candidates,
            intents: Vec::new(),
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn into_intents(self) -> Vec<Intent> {
        self.intents
    }
}

impl fmt::Debug for AdapterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterContext")
            .field("now", &self.now)
            .field("candidates", &self.candidates)
            .field("intents", &self.intents)
            .finish_non_exhaustive()
    }
}

pub trait InputAdapter: fmt::Debug {
    fn device_class(&self) -> DeviceClass;

    /// Called once when the gallery starts.
    fn start(&mut self, _cx: &mut AdapterContext<'_>) {}

    fn handle(&mut self, event: InputEvent, cx: &mut AdapterContext<'_>);

    /// Earliest pending timer owned by the adapter.
    fn next_deadline(&self) -> Option<Duration> {
        None
    }

    /// Fires the earliest timer due at `cx.now`. Returns false if none was due.
    fn fire_due(&mut self, _cx: &mut AdapterContext<'_>) -> bool {
        false
    }

    fn cancel_timers(&mut self) {}

    fn pending_timers(&self) -> usize {
        0
    }
}

/// Builds the adapter for a device class.
pub fn for_device(device: DeviceClass, config: &GalleryConfig) -> Box<dyn InputAdapter> {
    match device {
        DeviceClass::Desktop => Box::new(HoverAdapter::new()),
        DeviceClass::Mobile => Box::new(ScrollAdapter::from_config(config)),
    }
}
