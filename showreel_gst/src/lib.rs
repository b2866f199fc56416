mod config;
mod preview;

pub use config::GstConfig;
pub use preview::GstPreview;
pub use showreel_core::Error;

pub type Result<T> = std::result::Result<T, showreel_core::Error>;

/// Initialize GStreamer. Must be called before creating any previews.
pub fn init() -> Result<()> {
    gstreamer::init().map_err(|e| Error::Pipeline(e.to_string()))?;
    Ok(())
}
