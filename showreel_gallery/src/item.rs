use std::time::Duration;

use showreel_core::{ItemId, ItemMarkup, PreviewMedia};

/// One gallery card and the presentation state the coordinator drives on it.
#[derive(Debug)]
pub struct GalleryItem<M> {
    id: ItemId,
    markup: ItemMarkup,
    pub(crate) media: Option<M>,
    /// `None` when the card has no overlay element.
    pub(crate) overlay_hidden: Option<bool>,
    pub(crate) playing: bool,
    pub(crate) has_played: bool,
    pub(crate) last_position: Option<Duration>,
}

impl<M: PreviewMedia> GalleryItem<M> {
    pub(crate) fn new(id: ItemId, markup: ItemMarkup, media: Option<M>) -> Self {
        let overlay_hidden = markup.has_overlay.then_some(false);
        Self {
            id,
            markup,
            media,
            overlay_hidden,
            playing: false,
            has_played: false,
            last_position: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.markup.title
    }

    pub fn markup(&self) -> &ItemMarkup {
        &self.markup
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// Direct access for hosts that need to feed media events back into their handle.
    pub fn media_mut(&mut self) -> Option<&mut M> {
        self.media.as_mut()
    }

    /// Image-only cards have no media and never take part in playback.
    pub fn is_playable(&self) -> bool {
        self.media.is_some()
    }

    /// Whether the card carries the "playing" presentation state.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the caption overlay is showing. Cards without an overlay report `false`.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_hidden == Some(false)
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay_hidden.is_some()
    }

    pub fn has_played(&self) -> bool {
        self.has_played
    }

    /// Position recorded when the preview was last stopped.
    pub fn last_position(&self) -> Option<Duration> {
        self.last_position
    }
}

/// A presentation flip the host applies to the page (class toggles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationChange {
    pub item: ItemId,
    pub change: Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Playing(bool),
    OverlayHidden(bool),
}

/// The tracked items plus the changes made to them since the host last looked.
#[derive(Debug)]
pub struct Scene<M> {
    items: Vec<GalleryItem<M>>,
    changes: Vec<PresentationChange>,
}

impl<M: PreviewMedia> Scene<M> {
    pub(crate) fn new(items: Vec<GalleryItem<M>>) -> Self {
        Self {
            items,
            changes: Vec::new(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&GalleryItem<M>> {
        self.items.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut GalleryItem<M>> {
        self.items.get_mut(id.0)
    }

    pub fn items(&self) -> impl Iterator<Item = &GalleryItem<M>> {
        self.items.iter()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut GalleryItem<M>> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids of the cards that have a preview video, in page order.
    pub fn playable_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.is_playable())
            .map(GalleryItem::id)
            .collect()
    }

    pub(crate) fn set_playing(&mut self, id: ItemId, playing: bool) {
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        if item.playing != playing {
            item.playing = playing;
            self.changes.push(PresentationChange {
                item: id,
                change: Change::Playing(playing),
            });
        }
    }

    /// No-op for cards without an overlay.
    pub(crate) fn set_overlay_hidden(&mut self, id: ItemId, hidden: bool) {
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        match item.overlay_hidden {
            Some(current) if current != hidden => {
                item.overlay_hidden = Some(hidden);
                self.changes.push(PresentationChange {
                    item: id,
                    change: Change::OverlayHidden(hidden),
                });
            }
            _ => {}
        }
    }

    pub(crate) fn drain_changes(&mut self) -> Vec<PresentationChange> {
        std::mem::take(&mut self.changes)
    }
}
