//! Drives a gallery through a scripted session and prints what the page would do.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p showreel_gallery --example scripted_gallery -- 390
//! ```
//!
//! The optional argument is the viewport width; widths up to 768px use scroll focus,
//! wider ones use hover.

use std::time::Duration;

use showreel_gallery::{
    Error, Gallery, GalleryConfig, InputEvent, ItemId, ItemMarkup, Layout, PreviewMedia, Rect,
};

/// Stand-in media element that starts instantly and never blocks autoplay.
#[derive(Debug, Default)]
struct LoggedVideo {
    name: String,
    paused: bool,
    position: Duration,
}

impl PreviewMedia for LoggedVideo {
    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        false
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(10))
    }

    fn seek(&mut self, position: Duration) -> Result<(), Error> {
        self.position = position;
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        println!("  {}: play()", self.name);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        println!("  {}: pause()", self.name);
        self.paused = true;
    }

    fn load(&mut self) {
        println!("  {}: load()", self.name);
    }
}

/// Six 420px cards in a single column, scrolled to `scroll_y`.
struct Column {
    scroll_y: f64,
}

impl Layout for Column {
    fn viewport_height(&self) -> f64 {
        740.0
    }

    fn item_rect(&self, id: ItemId) -> Option<Rect> {
        Some(Rect::new(id.0 as f64 * 440.0 + 300.0 - self.scroll_y, 420.0))
    }
}

fn markup() -> Result<Vec<(ItemMarkup, Option<LoggedVideo>)>, Error> {
    let base = url::Url::parse("https://portfolio.example/index.php")?;
    let mut items = Vec::new();
    for n in 1..=6 {
        let markup = ItemMarkup::video(
            format!("Project {n}"),
            &base,
            &format!("assets/media/video/project{n}.mp4"),
            Some(&format!("assets/media/video/project{n}-poster.jpg")),
        )?;
        let video = LoggedVideo {
            name: format!("project{n}"),
            paused: true,
            ..Default::default()
        };
        items.push((markup, Some(video)));
    }
    items.push((ItemMarkup::image("Graphic Design Works"), None));
    Ok(items)
}

fn settle_pending(gallery: &mut Gallery<LoggedVideo>, now: Duration) {
    let pending: Vec<ItemId> = gallery
        .items()
        .filter(|item| item.media().is_some_and(|m| !m.paused()) && !item.is_playing())
        .map(|item| item.id())
        .collect();
    for id in pending {
        gallery.on_play_settled(id, Ok(()), now);
    }
}

fn report(gallery: &mut Gallery<LoggedVideo>, at: Duration) {
    for change in gallery.drain_changes() {
        let title = gallery.item(change.item).map_or("?", |item| item.title());
        println!("{:>6}ms  {title}: {:?}", at.as_millis(), change.change);
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let width = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(390.0);

    let mut gallery = Gallery::for_viewport_width(markup()?, width, GalleryConfig::default())?;
    println!("viewport {width}px -> {} input", gallery.device_class());

    let mut layout = Column { scroll_y: 0.0 };
    let mut now = Duration::ZERO;
    gallery.start(now, &layout);

    let step = Duration::from_millis(50);
    for tick in 0..120u32 {
        now += step;
        match tick {
            // A flick through the gallery, then a slow drag, on mobile.
            10..=30 => {
                layout.scroll_y += 60.0;
                gallery.handle_event(InputEvent::Scroll, now, &layout);
            }
            31 => gallery.handle_event(InputEvent::TouchEnd, now, &layout),
            60..=70 => {
                layout.scroll_y += 25.0;
                gallery.handle_event(InputEvent::Scroll, now, &layout);
            }
            // Hover across two cards on desktop.
            80 => gallery.handle_event(InputEvent::PointerEnter(ItemId(0)), now, &layout),
            90 => gallery.handle_event(InputEvent::PointerEnter(ItemId(1)), now, &layout),
            91 => gallery.handle_event(InputEvent::PointerLeave(ItemId(0)), now, &layout),
            100 => gallery.handle_event(InputEvent::PointerLeave(ItemId(1)), now, &layout),
            _ => gallery.advance(now, &layout),
        }
        settle_pending(&mut gallery, now);
        report(&mut gallery, now);
    }

    gallery.teardown();
    report(&mut gallery, now);
    println!("playing after teardown: {:?}", gallery.playing());
    Ok(())
}
