//! Viewport geometry: which gallery card counts as "in focus".
//!
//! Everything here is a pure function of bounding boxes and viewport height, cheap
//! enough to run on every scroll tick.

use crate::types::ItemId;

/// Vertical extent of an element relative to the top of the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// True if any part of the element is on screen.
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.bottom > 0.0 && self.top < viewport_height
    }

    /// Distance between this element's vertical center and the viewport's.
    pub fn center_distance(&self, viewport_height: f64) -> f64 {
        (self.center() - viewport_height / 2.0).abs()
    }
}

/// Geometry the host page supplies when a focus decision is taken.
pub trait Layout {
    /// Current inner height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Bounding box of a gallery card, or `None` if it is not laid out.
    fn item_rect(&self, id: ItemId) -> Option<Rect>;
}

/// Decides focus from center distance.
///
/// An item is focused when it is at least partially on screen and its center lies
/// strictly closer to the viewport center than `threshold * viewport_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusProbe {
    threshold: f64,
}

impl FocusProbe {
    pub const DEFAULT_THRESHOLD: f64 = 0.25;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Maximum center distance (exclusive) in pixels for the given viewport height.
    pub fn max_distance(&self, viewport_height: f64) -> f64 {
        self.threshold * viewport_height
    }

    pub fn is_focused(&self, rect: &Rect, viewport_height: f64) -> bool {
        rect.intersects_viewport(viewport_height)
            && rect.center_distance(viewport_height) < self.max_distance(viewport_height)
    }

    /// Picks the focused item whose center is closest to the viewport center.
    ///
    /// Ties go to the earlier item in `candidates`.
    pub fn best_focused(
        &self,
        candidates: impl IntoIterator<Item = ItemId>,
        layout: &dyn Layout,
    ) -> Option<ItemId> {
        let viewport_height = layout.viewport_height();
        let mut best: Option<(ItemId, f64)> = None;

        for id in candidates {
            let Some(rect) = layout.item_rect(id) else {
                continue;
            };
            if !self.is_focused(&rect, viewport_height) {
                continue;
            }
            let distance = rect.center_distance(viewport_height);
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((id, distance)),
            }
        }

        best.map(|(id, _)| id)
    }
}

impl Default for FocusProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

/// Convenience form of [`FocusProbe::is_focused`] with the default threshold.
pub fn is_focused(rect: &Rect, viewport_height: f64) -> bool {
    FocusProbe::default().is_focused(rect, viewport_height)
}
