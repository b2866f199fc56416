//! Preview playback coordination for video galleries.
//!
//! A [`Gallery`] decides which preview should be playing from pointer hover (desktop)
//! or from the card closest to the viewport center once scrolling settles (mobile),
//! while keeping at most one preview in the "playing" state.
//!
//! The host drives it on a single thread: it forwards input events, advances the
//! clock, reports the outcome of asynchronous play attempts, and applies the
//! resulting [`PresentationChange`]s to the page.

pub mod adapter;
pub mod config;
pub mod gallery;
pub mod item;
pub mod overlay;
pub mod playback;
pub mod timer;

#[cfg(test)]
mod testing;

pub use adapter::{AdapterContext, HoverAdapter, InputAdapter, InputEvent, Intent, ScrollAdapter};
pub use config::GalleryConfig;
pub use gallery::{Gallery, Phase};
pub use item::{Change, GalleryItem, PresentationChange};
pub use overlay::OverlayController;
pub use playback::PlaybackController;
pub use timer::TimerQueue;

pub use showreel_core::{
    DeviceClass, Error, FocusProbe, ItemId, ItemMarkup, Layout, PreviewMedia, Rect, Result,
};
