//! Named transform presets per target platform.

use crate::name::NameCase;
use crate::transform::Transform;
use strata_values::{ColorFormat, SizeUnit, TimeUnit};

pub const TRANSFORM_GROUPS: &[&str] = &["css", "scss", "less", "js", "android", "ios"];

/// The transforms of a preset, or `None` for an unknown preset name.
pub fn transform_group(name: &str) -> Option<Vec<Transform>> {
    let group = match name {
        "css" | "scss" | "less" => vec![
            Transform::name(NameCase::Kebab),
            Transform::color(ColorFormat::Hex),
            Transform::size(SizeUnit::Rem),
            Transform::time(TimeUnit::Ms),
        ],
        "js" => vec![
            Transform::name(NameCase::Camel),
            Transform::color(ColorFormat::Hex),
            Transform::size(SizeUnit::Rem),
            Transform::time(TimeUnit::Ms),
        ],
        "android" => vec![
            Transform::name(NameCase::Snake),
            Transform::color(ColorFormat::Hex),
            Transform::size(SizeUnit::Px),
            Transform::time(TimeUnit::Ms),
        ],
        "ios" => vec![
            Transform::name(NameCase::Camel),
            Transform::color(ColorFormat::Rgba),
            Transform::size(SizeUnit::Px),
            Transform::time(TimeUnit::S),
        ],
        _ => return None,
    };
    Some(group)
}
