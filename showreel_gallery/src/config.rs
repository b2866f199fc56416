use std::time::Duration;

use showreel_core::{Error, Result};

pub mod defaults {
    use std::time::Duration;

    /// Fraction of viewport height a card center may sit from the viewport center.
    pub const FOCUS_THRESHOLD: f64 = 0.25;
    /// Viewports at most this wide (CSS px) use the scroll adapter.
    pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

    pub const SCROLL_THROTTLE: Duration = Duration::from_millis(100);
    pub const SCROLL_SETTLE: Duration = Duration::from_millis(200);
    pub const TOUCH_SETTLE: Duration = Duration::from_millis(150);
    pub const INITIAL_EVALUATION_DELAY: Duration = Duration::from_millis(300);

    pub const DESKTOP_OVERLAY_DELAY: Duration = Duration::ZERO;
    pub const MOBILE_OVERLAY_DELAY: Duration = Duration::from_millis(1500);

    pub const RESUME_OFFSET: Duration = Duration::from_millis(10);
    pub const PRELOAD_DELAY: Duration = Duration::from_millis(500);
}

/// Tuning for the gallery coordinator and its input adapters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryConfig {
    pub focus_threshold: f64,
    pub mobile_breakpoint_px: f64,
    pub scroll_throttle: Duration,
    pub scroll_settle: Duration,
    pub touch_settle: Duration,
    pub initial_evaluation_delay: Duration,
    pub desktop_overlay_delay: Duration,
    pub mobile_overlay_delay: Duration,
    pub resume_offset: Duration,
    pub preload_delay: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            focus_threshold: defaults::FOCUS_THRESHOLD,
            mobile_breakpoint_px: defaults::MOBILE_BREAKPOINT_PX,
            scroll_throttle: defaults::SCROLL_THROTTLE,
            scroll_settle: defaults::SCROLL_SETTLE,
            touch_settle: defaults::TOUCH_SETTLE,
            initial_evaluation_delay: defaults::INITIAL_EVALUATION_DELAY,
            desktop_overlay_delay: defaults::DESKTOP_OVERLAY_DELAY,
            mobile_overlay_delay: defaults::MOBILE_OVERLAY_DELAY,
            resume_offset: defaults::RESUME_OFFSET,
            preload_delay: defaults::PRELOAD_DELAY,
        }
    }
}

impl GalleryConfig {
    pub fn with_focus_threshold(self, focus_threshold: f64) -> Self {
        Self {
            focus_threshold,
            ..self
        }
    }

    pub fn with_scroll_throttle(self, scroll_throttle: Duration) -> Self {
        Self {
            scroll_throttle,
            ..self
        }
    }

    pub fn with_scroll_settle(self, scroll_settle: Duration) -> Self {
        Self {
            scroll_settle,
            ..self
        }
    }

    pub fn with_touch_settle(self, touch_settle: Duration) -> Self {
        Self {
            touch_settle,
            ..self
        }
    }

    pub fn with_mobile_overlay_delay(self, mobile_overlay_delay: Duration) -> Self {
        Self {
            mobile_overlay_delay,
            ..self
        }
    }

    pub fn with_desktop_overlay_delay(self, desktop_overlay_delay: Duration) -> Self {
        Self {
            desktop_overlay_delay,
            ..self
        }
    }

    pub fn with_initial_evaluation_delay(self, initial_evaluation_delay: Duration) -> Self {
        Self {
            initial_evaluation_delay,
            ..self
        }
    }

    pub fn with_resume_offset(self, resume_offset: Duration) -> Self {
        Self {
            resume_offset,
            ..self
        }
    }

    pub fn with_preload_delay(self, preload_delay: Duration) -> Self {
        Self {
            preload_delay,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.focus_threshold > 0.0 && self.focus_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "focus threshold must be in (0, 1], got {}",
                self.focus_threshold
            )));
        }
        if self.scroll_settle.is_zero() {
            return Err(Error::Config("scroll settle delay must be non-zero".into()));
        }
        if !self.mobile_breakpoint_px.is_finite() || self.mobile_breakpoint_px < 0.0 {
            return Err(Error::Config(format!(
                "mobile breakpoint must be a non-negative width, got {}",
                self.mobile_breakpoint_px
            )));
        }
        Ok(())
    }
}
