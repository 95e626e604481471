//! Size and duration quantities with unit conversion.

use crate::number::format_number;
use crate::parsers::{ValueParseError, parse_duration, parse_size, run_parser};
use serde::{Deserialize, Serialize};

/// Default root font size used to convert between `px` and `rem`/`em`.
pub const DEFAULT_BASE_FONT_SIZE: f64 = 16.0;

const PX_PER_PT: f64 = 4.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    Px,
    Rem,
    Em,
    Pt,
}

impl SizeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Px => "px",
            SizeUnit::Rem => "rem",
            SizeUnit::Em => "em",
            SizeUnit::Pt => "pt",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "px" => Some(SizeUnit::Px),
            "rem" => Some(SizeUnit::Rem),
            "em" => Some(SizeUnit::Em),
            "pt" => Some(SizeUnit::Pt),
            _ => None,
        }
    }
}

/// A number with an optional size unit. A missing unit means pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub value: f64,
    pub unit: Option<SizeUnit>,
}

impl Size {
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        run_parser(parse_size, input)
    }

    /// Converts this size to pixels against `base_font_size`.
    pub fn to_px(&self, base_font_size: f64) -> f64 {
        match self.unit {
            None | Some(SizeUnit::Px) => self.value,
            Some(SizeUnit::Rem) | Some(SizeUnit::Em) => self.value * base_font_size,
            Some(SizeUnit::Pt) => self.value * PX_PER_PT,
        }
    }

    /// Builds a size in `unit` from a pixel quantity.
    pub fn from_px(px: f64, unit: SizeUnit, base_font_size: f64) -> Self {
        let value = match unit {
            SizeUnit::Px => px,
            SizeUnit::Rem | SizeUnit::Em => {
                if base_font_size == 0.0 {
                    px
                } else {
                    px / base_font_size
                }
            }
            SizeUnit::Pt => px / PX_PER_PT,
        };
        Self { value, unit: Some(unit) }
    }

    pub fn convert(&self, unit: SizeUnit, base_font_size: f64) -> Self {
        Self::from_px(self.to_px(base_font_size), unit, base_font_size)
    }

    pub fn render(&self) -> String {
        let suffix = self.unit.map(SizeUnit::suffix).unwrap_or("");
        format!("{}{}", format_number(self.value), suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Ms,
    S,
}

impl TimeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

/// A number with an optional time unit. A missing unit means milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duration {
    pub value: f64,
    pub unit: Option<TimeUnit>,
}

impl Duration {
    pub fn parse(input: &str) -> Result<Self, ValueParseError> {
        run_parser(parse_duration, input)
    }

    pub fn to_ms(&self) -> f64 {
        match self.unit {
            None | Some(TimeUnit::Ms) => self.value,
            Some(TimeUnit::S) => self.value * 1000.0,
        }
    }

    pub fn from_ms(ms: f64, unit: TimeUnit) -> Self {
        let value = match unit {
            TimeUnit::Ms => ms,
            TimeUnit::S => ms / 1000.0,
        };
        Self { value, unit: Some(unit) }
    }

    pub fn render(&self) -> String {
        let suffix = self.unit.map(TimeUnit::suffix).unwrap_or("");
        format!("{}{}", format_number(self.value), suffix)
    }
}
