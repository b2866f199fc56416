pub mod error;
pub mod geometry;
pub mod media;
pub mod types;

pub use error::*;
pub use geometry::*;
pub use media::*;
pub use types::*;
