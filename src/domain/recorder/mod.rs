//! Recorder state machine and permission state

mod lifecycle;
mod permission;

pub use lifecycle::{InvalidStateTransition, RecorderLifecycle, RecorderStatus};
pub use permission::PermissionState;
