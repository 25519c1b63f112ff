//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces, backed by the local
//! audio devices and the filesystem.

pub mod audio;
pub mod config;
pub mod logging;

pub use audio::{default_recordings_dir, CpalAudioService};
pub use config::XdgConfigStore;
pub use logging::init_logging;
