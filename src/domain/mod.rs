//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recorder;
pub mod recording;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recorder::{InvalidStateTransition, PermissionState, RecorderLifecycle, RecorderStatus};
pub use recording::{AudioMode, Duration, QualityPreset, RecordingLocation};
