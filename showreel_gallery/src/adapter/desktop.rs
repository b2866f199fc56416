use showreel_core::DeviceClass;

use super::{AdapterContext, InputAdapter, InputEvent, Intent};

/// Pointer hover drives playback directly. Hover intents are discrete, so there is no
/// debouncing here.
#[derive(Debug, Default)]
pub struct HoverAdapter;

impl HoverAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl InputAdapter for HoverAdapter {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Desktop
    }

    fn handle(&mut self, event: InputEvent, cx: &mut AdapterContext<'_>) {
        match event {
            InputEvent::PointerEnter(id) => cx.push(Intent::Activate(id)),
            InputEvent::PointerLeave(id) => cx.push(Intent::Deactivate(id)),
            InputEvent::Scroll | InputEvent::TouchEnd => {}
        }
    }
}
