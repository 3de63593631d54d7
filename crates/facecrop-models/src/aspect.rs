//! Target aspect ratios for crop regions.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crop aspect ratio (width:height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

/// Tolerance used when matching a decimal ratio against the presets.
const PRESET_TOLERANCE: f64 = 1e-3;

/// Denominator used to approximate arbitrary decimal ratios.
const DECIMAL_SCALE: u32 = 10_000;

impl AspectRatio {
    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Portrait (4:5)
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 4,
        height: 5,
    };

    /// Landscape (16:9)
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Presets offered to users, in display order.
    pub const PRESETS: [AspectRatio; 3] = [Self::SQUARE, Self::PORTRAIT, Self::LANDSCAPE];

    /// Create a new aspect ratio.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the aspect ratio as a decimal.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Human-readable preset name, if this is one of the presets.
    pub fn preset_name(&self) -> Option<&'static str> {
        match *self {
            Self::SQUARE => Some("Square"),
            Self::PORTRAIT => Some("Portrait"),
            Self::LANDSCAPE => Some("Landscape"),
            _ => None,
        }
    }

    /// Build a ratio from a decimal value such as `0.8` or `1.77778`.
    ///
    /// Values within a small tolerance of a preset snap to that preset.
    pub fn from_decimal(value: f64) -> Result<Self, AspectRatioParseError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AspectRatioParseError::NotPositive(value.to_string()));
        }

        if let Some(preset) = Self::PRESETS
            .iter()
            .find(|p| (p.as_f64() - value).abs() < PRESET_TOLERANCE)
        {
            return Ok(*preset);
        }

        let width = (value * DECIMAL_SCALE as f64).round();
        if width < 1.0 || width > u32::MAX as f64 {
            return Err(AspectRatioParseError::NotPositive(value.to_string()));
        }
        let width = width as u32;
        let divisor = gcd(width, DECIMAL_SCALE);
        Ok(Self::new(width / divisor, DECIMAL_SCALE / divisor))
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    /// Accepts `W:H` or a decimal ratio.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains(':') {
            let value: f64 = s
                .parse()
                .map_err(|_| AspectRatioParseError::InvalidNumber(s.to_string()))?;
            return Self::from_decimal(value);
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(AspectRatioParseError::InvalidFormat(s.to_string()));
        }

        let width = parts[0]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[0].to_string()))?;
        let height = parts[1]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[1].to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H' or a decimal")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
    #[error("Aspect ratio must be a positive finite number, got {0}")]
    NotPositive(String),
}
