use std::fmt;

use crate::Result;

/// Index of a gallery item in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub usize);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which input adapter drives the gallery. Decided once when the page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Pointer hover starts and stops previews.
    Desktop,
    /// Scroll position (the centered item) starts and stops previews.
    Mobile,
}

impl DeviceClass {
    /// Narrow viewports (`width <= breakpoint`) are treated as mobile.
    pub fn from_viewport_width(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Desktop => write!(f, "desktop"),
            DeviceClass::Mobile => write!(f, "mobile"),
        }
    }
}

/// What the rendered page says about one gallery card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMarkup {
    /// Caption text shown in the overlay.
    pub title: String,
    /// Preview video source. `None` for image-only cards.
    pub video: Option<url::Url>,
    /// Poster frame shown before the first decoded frame.
    pub poster: Option<url::Url>,
    /// Whether the card renders a caption overlay at all.
    pub has_overlay: bool,
}

impl ItemMarkup {
    pub fn image(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            video: None,
            poster: None,
            has_overlay: true,
        }
    }

    /// Builds a video card, resolving `src` and `poster` against the page base.
    ///
    /// An empty poster string means "no poster".
    pub fn video(
        title: impl Into<String>,
        base: &url::Url,
        src: &str,
        poster: Option<&str>,
    ) -> Result<Self> {
        let video = base.join(src)?;
        let poster = match poster.filter(|p| !p.is_empty()) {
            Some(p) => Some(base.join(p)?),
            None => None,
        };
        Ok(Self {
            title: title.into(),
            video: Some(video),
            poster,
            has_overlay: true,
        })
    }

    pub fn without_overlay(self) -> Self {
        Self {
            has_overlay: false,
            ..self
        }
    }

    pub fn is_playable(&self) -> bool {
        self.video.is_some()
    }
}
