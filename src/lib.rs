//! SoundMemo - record a sound and play it back
//!
//! This crate records from the default microphone, stores the recording as a
//! WAV file and plays the last recording back.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the recorder state machine, and errors
//! - **Application**: The recorder controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal/rodio audio, TOML config, logging)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
