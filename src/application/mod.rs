//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder controller and the trait definitions
//! for external system interactions.

pub mod controller;
pub mod ports;
pub mod view;

pub use controller::{ControllerError, OperationOutcome, RecorderConfig, RecorderController};
pub use view::ControllerView;
