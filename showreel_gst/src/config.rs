/// How preview pipelines are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GstConfig {
    /// Previews are silent unless the host asks otherwise.
    pub muted: bool,
    /// Seek back to the start on end of stream instead of stopping.
    pub looping: bool,
    /// Frames the appsink may queue before dropping old ones.
    pub max_buffers: u32,
}

impl Default for GstConfig {
    fn default() -> Self {
        Self {
            muted: true,
            looping: true,
            max_buffers: 2,
        }
    }
}

impl GstConfig {
    pub fn with_muted(self, muted: bool) -> Self {
        Self { muted, ..self }
    }

    pub fn with_looping(self, looping: bool) -> Self {
        Self { looping, ..self }
    }

    pub fn with_max_buffers(self, max_buffers: u32) -> Self {
        Self {
            max_buffers: max_buffers.max(1),
            ..self
        }
    }
}
