//! Color conversion and serialization for each supported color family.

use crate::number::{format_fixed, format_number};
use crate::parsers::{ValueParseError, parse_color, run_parser};
use serde::{Deserialize, Serialize};
use strata_types::Color;

/// Target syntax for a color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// `#rrggbb`, or `#rrggbbaa` when the color is translucent.
    Hex,
    /// `rgb(r, g, b)`, or `rgba(...)` when the color is translucent.
    Rgb,
    /// Always `rgba(r, g, b, a)`.
    Rgba,
    /// `hsl(h, s%, l%)`, or `hsla(...)` when the color is translucent.
    Hsl,
}

/// Parses any supported color string into a [`Color`].
pub fn parse_color_value(input: &str) -> Result<Color, ValueParseError> {
    run_parser(parse_color, input)
}

/// Renders a color in the requested syntax.
pub fn format_color(color: &Color, format: ColorFormat) -> String {
    match format {
        ColorFormat::Hex => to_hex(color),
        ColorFormat::Rgb if color.is_opaque() => {
            format!("rgb({}, {}, {})", color.r, color.g, color.b)
        }
        ColorFormat::Rgb | ColorFormat::Rgba => format!(
            "rgba({}, {}, {}, {})",
            color.r,
            color.g,
            color.b,
            format_number(f64::from(color.a))
        ),
        ColorFormat::Hsl => {
            let (h, s, l) = color_to_hsl(color);
            let (h, s, l) = (format_fixed(h, 2), format_fixed(s * 100.0, 2), format_fixed(l * 100.0, 2));
            if color.is_opaque() {
                format!("hsl({}, {}%, {}%)", h, s, l)
            } else {
                format!("hsla({}, {}%, {}%, {})", h, s, l, format_number(f64::from(color.a)))
            }
        }
    }
}

fn to_hex(color: &Color) -> String {
    if color.is_opaque() {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.r,
            color.g,
            color.b,
            color.alpha_byte()
        )
    }
}

/// Converts to `(hue in degrees, saturation 0..1, lightness 0..1)`.
pub fn color_to_hsl(color: &Color) -> (f64, f64, f64) {
    let (r, g, b) = color.unit_channels();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// Converts HSL (hue in degrees, saturation and lightness in `0..=1`) to a color.
pub fn hsl_to_color(h: f64, s: f64, l: f64, a: f32) -> Color {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::rgba(to_byte(r), to_byte(g), to_byte(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_each_family() {
        let blue = Color::rgb(0, 102, 255);
        assert_eq!(format_color(&blue, ColorFormat::Hex), "#0066ff");
        assert_eq!(format_color(&blue, ColorFormat::Rgb), "rgb(0, 102, 255)");
        assert_eq!(format_color(&blue, ColorFormat::Rgba), "rgba(0, 102, 255, 1)");
        assert_eq!(format_color(&blue, ColorFormat::Hsl), "hsl(216, 100%, 50%)");
    }

    #[test]
    fn test_translucent_colors_keep_alpha() {
        let c = Color::rgba(0, 0, 0, 0.5);
        assert_eq!(format_color(&c, ColorFormat::Hex), "#00000080");
        assert_eq!(format_color(&c, ColorFormat::Rgb), "rgba(0, 0, 0, 0.5)");
        assert_eq!(format_color(&c, ColorFormat::Hsl), "hsla(0, 0%, 0%, 0.5)");
    }

    #[test]
    fn test_hsl_conversion_is_consistent() {
        let teal = Color::rgb(0, 128, 128);
        let (h, s, l) = color_to_hsl(&teal);
        assert_eq!(hsl_to_color(h, s, l, 1.0), teal);
    }

    #[test]
    fn test_parse_color_value() {
        assert_eq!(parse_color_value(" #fff ").unwrap(), Color::rgb(255, 255, 255));
        assert!(parse_color_value("{colors.blue}").is_err());
    }
}
