//! Low-level nom parser functions for token value syntaxes.
//!
//! This module provides composable parser functions for numbers, colors
//! (hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`), sizes and durations.

use crate::color::hsl_to_color;
use crate::units::{Duration, Size, SizeUnit, TimeUnit};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n, take_while1},
    character::complete::{char, space0, space1},
    combinator::{map, map_opt, map_res, opt, recognize},
    sequence::preceded,
};
use strata_types::Color;
use thiserror::Error;

/// Errors that can occur while parsing a token value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid {kind} value: {value}")]
    InvalidValue { kind: String, value: String },
}

// --- Helper Parsers ---

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Parses a signed decimal number (e.g. "12", "-0.5", ".25").
pub fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((take_while1(is_digit), opt((char('.'), take_while1(is_digit))))),
                recognize((char('.'), take_while1(is_digit))),
            )),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

fn list_sep(input: &str) -> IResult<&str, &str> {
    alt((recognize((space0, char(','), space0)), space1)).parse(input)
}

fn alpha_sep(input: &str) -> IResult<&str, &str> {
    recognize((space0, alt((char(','), char('/'))), space0)).parse(input)
}

// --- Color Parsers ---

fn hex_pair(digits: &str, idx: usize) -> Option<u8> {
    u8::from_str_radix(digits.get(idx..idx + 2)?, 16).ok()
}

fn hex_single(digits: &str, idx: usize) -> Option<u8> {
    let digit = digits.get(idx..idx + 1)?;
    u8::from_str_radix(&digit.repeat(2), 16).ok()
}

fn hex_digits_to_color(digits: &str) -> Option<Color> {
    match digits.len() {
        3 => Some(Color::rgb(
            hex_single(digits, 0)?,
            hex_single(digits, 1)?,
            hex_single(digits, 2)?,
        )),
        4 => Some(Color::rgba(
            hex_single(digits, 0)?,
            hex_single(digits, 1)?,
            hex_single(digits, 2)?,
            f32::from(hex_single(digits, 3)?) / 255.0,
        )),
        6 => Some(Color::rgb(
            hex_pair(digits, 0)?,
            hex_pair(digits, 2)?,
            hex_pair(digits, 4)?,
        )),
        8 => Some(Color::rgba(
            hex_pair(digits, 0)?,
            hex_pair(digits, 2)?,
            hex_pair(digits, 4)?,
            f32::from(hex_pair(digits, 6)?) / 255.0,
        )),
        _ => None,
    }
}

/// Parses a hex color (`#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`).
pub fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    preceded(
        char('#'),
        map_opt(
            take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
            hex_digits_to_color,
        ),
    )
    .parse(input)
}

fn channel(input: &str) -> IResult<&str, u8> {
    map((parse_number, opt(char('%'))), |(value, percent)| {
        let value = if percent.is_some() { value * 2.55 } else { value };
        value.clamp(0.0, 255.0).round() as u8
    })
    .parse(input)
}

fn alpha(input: &str) -> IResult<&str, f32> {
    map((parse_number, opt(char('%'))), |(value, percent)| {
        let value = if percent.is_some() { value / 100.0 } else { value };
        value.clamp(0.0, 1.0) as f32
    })
    .parse(input)
}

/// Parses `rgb(r, g, b)`, `rgba(r, g, b, a)` and the space-separated
/// `rgb(r g b / a)` form. Channels may be percentages.
pub fn parse_rgb_function(input: &str) -> IResult<&str, Color> {
    let (input, _) = alt((tag_no_case("rgba"), tag_no_case("rgb"))).parse(input)?;
    let (input, _) = (space0, char('('), space0).parse(input)?;
    let (input, (r, _, g, _, b)) = (channel, list_sep, channel, list_sep, channel).parse(input)?;
    let (input, a) = opt(preceded(alpha_sep, alpha)).parse(input)?;
    let (input, _) = (space0, char(')')).parse(input)?;
    Ok((input, Color::rgba(r, g, b, a.unwrap_or(1.0))))
}

fn hue(input: &str) -> IResult<&str, f64> {
    map((parse_number, opt(tag_no_case("deg"))), |(h, _)| h).parse(input)
}

fn percentage(input: &str) -> IResult<&str, f64> {
    map((parse_number, opt(char('%'))), |(v, _)| v.clamp(0.0, 100.0)).parse(input)
}

/// Parses `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)`.
pub fn parse_hsl_function(input: &str) -> IResult<&str, Color> {
    let (input, _) = alt((tag_no_case("hsla"), tag_no_case("hsl"))).parse(input)?;
    let (input, _) = (space0, char('('), space0).parse(input)?;
    let (input, (h, _, s, _, l)) = (hue, list_sep, percentage, list_sep, percentage).parse(input)?;
    let (input, a) = opt(preceded(alpha_sep, alpha)).parse(input)?;
    let (input, _) = (space0, char(')')).parse(input)?;
    Ok((input, hsl_to_color(h, s / 100.0, l / 100.0, a.unwrap_or(1.0))))
}

/// Parses any supported color syntax.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((parse_hex_color, parse_rgb_function, parse_hsl_function)).parse(input)
}

// --- Size & Duration Parsers ---

/// Parses a size unit suffix. `rem` is tried before `em`.
pub fn parse_size_unit(input: &str) -> IResult<&str, SizeUnit> {
    alt((
        map(tag_no_case("px"), |_| SizeUnit::Px),
        map(tag_no_case("rem"), |_| SizeUnit::Rem),
        map(tag_no_case("em"), |_| SizeUnit::Em),
        map(tag_no_case("pt"), |_| SizeUnit::Pt),
    ))
    .parse(input)
}

/// Parses a number with an optional size unit (e.g. "16px", "1.5rem", "12").
pub fn parse_size(input: &str) -> IResult<&str, Size> {
    map((parse_number, opt(parse_size_unit)), |(value, unit)| Size {
        value,
        unit,
    })
    .parse(input)
}

/// Parses a time unit suffix. `ms` is tried before `s`.
pub fn parse_time_unit(input: &str) -> IResult<&str, TimeUnit> {
    alt((
        map(tag_no_case("ms"), |_| TimeUnit::Ms),
        map(tag_no_case("s"), |_| TimeUnit::S),
    ))
    .parse(input)
}

/// Parses a number with an optional time unit (e.g. "200ms", "0.3s").
pub fn parse_duration(input: &str) -> IResult<&str, Duration> {
    map((parse_number, opt(parse_time_unit)), |(value, unit)| Duration {
        value,
        unit,
    })
    .parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, ValueParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, ValueParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(ValueParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(ValueParseError::Parse(e.to_string())),
    }
}
