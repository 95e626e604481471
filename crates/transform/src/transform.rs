//! Ordered application of transforms to resolved tokens.

use crate::matcher::{COLOR_TYPES, SIZE_TYPES, TIME_TYPES, TokenMatcher, is_type_in};
use crate::name::NameCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_tokens::ResolvedToken;
use strata_values::units::DEFAULT_BASE_FONT_SIZE;
use strata_values::{ColorFormat, Duration, Size, SizeUnit, TimeUnit, format_color, parse_color_value};

/// What a transform rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Name(NameCase),
    Color(ColorFormat),
    Size(SizeUnit),
    Time(TimeUnit),
}

/// A transform and the tokens it is limited to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(flatten)]
    pub kind: TransformKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<TokenMatcher>,
}

impl Transform {
    pub fn name(case: NameCase) -> Self {
        TransformKind::Name(case).into()
    }

    pub fn color(format: ColorFormat) -> Self {
        TransformKind::Color(format).into()
    }

    pub fn size(unit: SizeUnit) -> Self {
        TransformKind::Size(unit).into()
    }

    pub fn time(unit: TimeUnit) -> Self {
        TransformKind::Time(unit).into()
    }

    pub fn with_matcher(mut self, matcher: TokenMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Whether this transform touches a token with this path and type.
    pub fn applies_to(&self, path: &[String], token_type: Option<&str>) -> bool {
        if let Some(matcher) = &self.matcher
            && !matcher.matches(path, token_type)
        {
            return false;
        }
        match self.kind {
            TransformKind::Name(_) => true,
            TransformKind::Color(_) => is_type_in(token_type, COLOR_TYPES),
            TransformKind::Size(_) => is_type_in(token_type, SIZE_TYPES),
            TransformKind::Time(_) => is_type_in(token_type, TIME_TYPES),
        }
    }
}

impl From<TransformKind> for Transform {
    fn from(kind: TransformKind) -> Self {
        Self {
            kind,
            matcher: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Root font size for `rem`/`em` conversion.
    pub base_font_size: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            base_font_size: DEFAULT_BASE_FONT_SIZE,
        }
    }
}

/// A token ready for a formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedToken {
    pub path: Vec<String>,
    /// Display name after name transforms; `-`-joined path otherwise.
    pub name: String,
    pub value: Value,
    /// The value before alias resolution.
    pub original_value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
}

/// Applies `transforms` in order to every token. Each transform rewrites the
/// resolved input of its axis, so the last applicable transform per axis
/// decides the result.
pub fn apply_transforms(
    tokens: &[ResolvedToken],
    transforms: &[Transform],
    options: &TransformOptions,
) -> Vec<TransformedToken> {
    tokens
        .iter()
        .map(|token| transform_token(token, transforms, options))
        .collect()
}

fn transform_token(
    token: &ResolvedToken,
    transforms: &[Transform],
    options: &TransformOptions,
) -> TransformedToken {
    let token_type = token.token_type.as_deref();
    let mut name = token.path.join("-");
    let mut value = token.value.clone();

    for transform in transforms {
        if !transform.applies_to(&token.path, token_type) {
            continue;
        }
        match transform.kind {
            TransformKind::Name(case) => name = case.apply(&token.path),
            TransformKind::Color(format) => {
                if let Some(converted) = convert_color(&token.value, format) {
                    value = converted;
                }
            }
            TransformKind::Size(unit) => {
                if let Some(converted) = convert_size(&token.value, unit, options.base_font_size) {
                    value = converted;
                }
            }
            TransformKind::Time(unit) => {
                if let Some(converted) = convert_time(&token.value, unit) {
                    value = converted;
                }
            }
        }
    }

    TransformedToken {
        path: token.path.clone(),
        name,
        value,
        original_value: token.original_value.clone(),
        token_type: token.token_type.clone(),
        description: token.description.clone(),
    }
}

/// `None` leaves the value unchanged.
pub fn convert_color(value: &Value, format: ColorFormat) -> Option<Value> {
    let text = value.as_str()?;
    match parse_color_value(text) {
        Ok(color) => Some(Value::String(format_color(&color, format))),
        Err(e) => {
            log::debug!("Color transform skipped '{}': {}", text, e);
            None
        }
    }
}

fn size_of(value: &Value) -> Option<Size> {
    match value {
        Value::String(text) => Size::parse(text).ok(),
        Value::Number(n) => n.as_f64().map(|value| Size { value, unit: None }),
        Value::Object(map) => {
            let amount = map.get("value")?.as_f64()?;
            let unit = match map.get("unit").and_then(Value::as_str) {
                Some(suffix) => Some(SizeUnit::from_suffix(suffix)?),
                None => None,
            };
            Some(Size {
                value: amount,
                unit,
            })
        }
        _ => None,
    }
}

pub fn convert_size(value: &Value, unit: SizeUnit, base_font_size: f64) -> Option<Value> {
    let size = size_of(value)?;
    Some(Value::String(size.convert(unit, base_font_size).render()))
}

pub fn convert_time(value: &Value, unit: TimeUnit) -> Option<Value> {
    let duration = match value {
        Value::String(text) => Duration::parse(text).ok()?,
        Value::Number(n) => Duration {
            value: n.as_f64()?,
            unit: None,
        },
        _ => return None,
    };
    Some(Value::String(
        Duration::from_ms(duration.to_ms(), unit).render(),
    ))
}
