//! Recording quality presets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidPresetError;

/// Fixed recording presets.
///
/// The sample rate is the rate the recorder asks the input device for. Devices
/// that cannot capture at that rate record at the closest rate they support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// 44.1 kHz stereo, 16-bit PCM
    #[default]
    #[serde(alias = "high_quality")]
    High,
    /// 16 kHz mono, 16-bit PCM
    #[serde(alias = "low_quality")]
    Low,
}

impl QualityPreset {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }

    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::High => 44_100,
            Self::Low => 16_000,
        }
    }

    pub const fn channels(&self) -> u16 {
        match self {
            Self::High => 2,
            Self::Low => 1,
        }
    }

    pub fn all() -> &'static [QualityPreset] {
        &[Self::High, Self::Low]
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = InvalidPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "high_quality" => Ok(Self::High),
            "low" | "low_quality" => Ok(Self::Low),
            _ => Err(InvalidPresetError {
                input: s.to_string(),
            }),
        }
    }
}
