//! Recording value objects

mod duration;
mod location;
mod mode;
mod preset;

pub use duration::{Duration, DEFAULT_DURATION_SECS};
pub use location::RecordingLocation;
pub use mode::AudioMode;
pub use preset::QualityPreset;
