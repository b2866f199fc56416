use std::time::Duration;

use crate::types::ItemId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The host refused to start playback (autoplay policy, user gesture required).
    #[error("playback was rejected: {0}")]
    PlaybackRejected(String),
    /// The media element reported a decode or source error.
    #[error("media error: {0}")]
    Media(String),
    #[error("media is in an invalid state for this operation")]
    InvalidState,
    #[error("failed to seek to {0:?}")]
    Seek(Duration),
    #[error("pipeline error: {0}")]
    Pipeline(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("gallery item {0} is unknown")]
    UnknownItem(ItemId),
    #[error("invalid media source: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Returns true if the error means the host blocked playback rather than the media failing.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, Error::PlaybackRejected(_))
    }
}
