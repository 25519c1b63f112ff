//! Microphone permission state

use std::fmt;

/// Tri-state microphone authorisation, owned by the audio service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionState {
    #[default]
    Undetermined,
    Granted,
    Denied,
}

impl PermissionState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undetermined => "undetermined",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
