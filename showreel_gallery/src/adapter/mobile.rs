use std::time::Duration;

use showreel_core::{DeviceClass, FocusProbe};

use super::{AdapterContext, InputAdapter, InputEvent, Intent};
use crate::config::GalleryConfig;
use crate::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollTimer {
    InitialEvaluation,
    Settle,
}

/// Scroll position drives playback: previews pause while the page is moving and the
/// card closest to the viewport center starts once scrolling settles.
#[derive(Debug)]
pub struct ScrollAdapter {
    probe: FocusProbe,
    throttle: Duration,
    settle: Duration,
    touch_settle: Duration,
    initial_delay: Duration,

    is_scrolling: bool,
    last_processed: Option<Duration>,
    timers: TimerQueue<ScrollTimer>,
}

impl ScrollAdapter {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            probe: FocusProbe::new(config.focus_threshold),
            throttle: config.scroll_throttle,
            settle: config.scroll_settle,
            touch_settle: config.touch_settle,
            initial_delay: config.initial_evaluation_delay,
            is_scrolling: false,
            last_processed: None,
            timers: TimerQueue::new(),
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    fn on_scroll(&mut self, cx: &mut AdapterContext<'_>) {
        // Every event pushes the quiet period out, throttled or not.
        self.timers.schedule(ScrollTimer::Settle, cx.now + self.settle);

        if let Some(last) = self.last_processed
            && cx.now < last + self.throttle
        {
            return;
        }
        self.last_processed = Some(cx.now);

        if !self.is_scrolling {
            self.is_scrolling = true;
            log::debug!("scroll started, pausing previews");
            cx.push(Intent::DeactivateAll);
        }
    }

    fn evaluate(&self, cx: &mut AdapterContext<'_>) {
        match self
            .probe
            .best_focused(cx.candidates.iter().copied(), cx.layout)
        {
            Some(best) => {
                log::debug!("focused item {best}");
                for &other in cx.candidates.iter().filter(|id| **id != best) {
                    cx.push(Intent::Deactivate(other));
                }
                cx.push(Intent::Activate(best));
            }
            None => {
                log::debug!("no item in focus");
                cx.push(Intent::DeactivateAll);
            }
        }
    }
}

impl InputAdapter for ScrollAdapter {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Mobile
    }

    fn start(&mut self, cx: &mut AdapterContext<'_>) {
        self.timers
            .schedule(ScrollTimer::InitialEvaluation, cx.now + self.initial_delay);
    }

    fn handle(&mut self, event: InputEvent, cx: &mut AdapterContext<'_>) {
        match event {
            InputEvent::Scroll => self.on_scroll(cx),
            // Momentum scrolling may continue without further events; check once more
            // shortly after release.
            InputEvent::TouchEnd => {
                self.timers
                    .schedule(ScrollTimer::Settle, cx.now + self.touch_settle);
            }
            InputEvent::PointerEnter(_) | InputEvent::PointerLeave(_) => {}
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    fn fire_due(&mut self, cx: &mut AdapterContext<'_>) -> bool {
        let Some((timer, _)) = self.timers.pop_due(cx.now) else {
            return false;
        };
        log::trace!("scroll adapter timer {timer:?} fired at {:?}", cx.now);
        match timer {
            ScrollTimer::Settle => {
                self.is_scrolling = false;
                self.last_processed = None;
                self.evaluate(cx);
            }
            ScrollTimer::InitialEvaluation => {
                // A scroll already in progress will settle on its own.
                if !self.is_scrolling {
                    self.evaluate(cx);
                }
            }
        }
        true
    }

    fn cancel_timers(&mut self) {
        self.timers.clear();
    }

    fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
