//! Identifier tables shared by import and export. Export walks the same
//! tables in reverse and takes the first entry that matches.

use strata_format::OutputFormat;
use strata_transform::{NameCase, Transform, TransformKind, transform_group};
use strata_values::{ColorFormat, SizeUnit, TimeUnit};

const TRANSFORM_IDS: &[(&str, TransformKind)] = &[
    ("name/camel", TransformKind::Name(NameCase::Camel)),
    ("name/kebab", TransformKind::Name(NameCase::Kebab)),
    ("name/snake", TransformKind::Name(NameCase::Snake)),
    ("name/constant", TransformKind::Name(NameCase::Constant)),
    ("name/pascal", TransformKind::Name(NameCase::Pascal)),
    ("name/cti/camel", TransformKind::Name(NameCase::Camel)),
    ("name/cti/kebab", TransformKind::Name(NameCase::Kebab)),
    ("name/cti/snake", TransformKind::Name(NameCase::Snake)),
    ("name/cti/constant", TransformKind::Name(NameCase::Constant)),
    ("name/cti/pascal", TransformKind::Name(NameCase::Pascal)),
    ("color/hex", TransformKind::Color(ColorFormat::Hex)),
    ("color/rgb", TransformKind::Color(ColorFormat::Rgb)),
    ("color/css", TransformKind::Color(ColorFormat::Rgba)),
    ("color/hsl", TransformKind::Color(ColorFormat::Hsl)),
    ("color/hex8", TransformKind::Color(ColorFormat::Hex)),
    ("color/hex8android", TransformKind::Color(ColorFormat::Hex)),
    ("color/hsl-4", TransformKind::Color(ColorFormat::Hsl)),
    ("color/UIColorSwift", TransformKind::Color(ColorFormat::Rgba)),
    ("size/px", TransformKind::Size(SizeUnit::Px)),
    ("size/rem", TransformKind::Size(SizeUnit::Rem)),
    ("size/em", TransformKind::Size(SizeUnit::Em)),
    ("size/pt", TransformKind::Size(SizeUnit::Pt)),
    ("size/pxToRem", TransformKind::Size(SizeUnit::Rem)),
    ("size/remToPx", TransformKind::Size(SizeUnit::Px)),
    ("size/remToPt", TransformKind::Size(SizeUnit::Pt)),
    ("time/seconds", TransformKind::Time(TimeUnit::S)),
    ("time/milliseconds", TransformKind::Time(TimeUnit::Ms)),
];

const FORMAT_IDS: &[(&str, OutputFormat)] = &[
    ("css/variables", OutputFormat::CssVariables),
    ("scss/variables", OutputFormat::ScssVariables),
    ("less/variables", OutputFormat::LessVariables),
    ("json/nested", OutputFormat::JsonNested),
    ("json/flat", OutputFormat::JsonFlat),
    ("javascript/es6", OutputFormat::JsModule),
    ("typescript/es6-declarations", OutputFormat::TsDeclarations),
    ("android/resources", OutputFormat::AndroidXml),
    ("ios-swift/class.swift", OutputFormat::IosSwift),
    ("json", OutputFormat::JsonNested),
    ("javascript/module-flat", OutputFormat::JsModule),
    ("android/colors", OutputFormat::AndroidXml),
    ("android/dimens", OutputFormat::AndroidXml),
    ("ios-swift/enum.swift", OutputFormat::IosSwift),
];

/// External transform-group names and the local preset each maps onto.
const GROUP_ALIASES: &[(&str, &str)] = &[
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("js", "js"),
    ("web", "js"),
    ("android", "android"),
    ("compose", "android"),
    ("ios", "ios"),
    ("ios-swift", "ios"),
    ("flutter", "js"),
];

pub fn transform_for_id(id: &str) -> Option<Transform> {
    TRANSFORM_IDS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, kind)| Transform::from(*kind))
}

pub fn id_for_transform(kind: &TransformKind) -> Option<&'static str> {
    TRANSFORM_IDS
        .iter()
        .find(|(_, known)| known == kind)
        .map(|(id, _)| *id)
}

pub fn format_for_id(id: &str) -> Option<OutputFormat> {
    FORMAT_IDS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, format)| *format)
}

pub fn id_for_format(format: OutputFormat) -> &'static str {
    FORMAT_IDS
        .iter()
        .find(|(_, known)| *known == format)
        .map_or("json/nested", |(id, _)| *id)
}

/// The local preset name for an external transform group.
pub fn preset_for_group(group: &str) -> Option<&'static str> {
    GROUP_ALIASES
        .iter()
        .find(|(external, _)| *external == group)
        .map(|(_, preset)| *preset)
}

pub fn transforms_for_group(group: &str) -> Option<Vec<Transform>> {
    preset_for_group(group).and_then(transform_group)
}

/// The local preset whose transforms suit an output format.
pub fn preset_for_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::ScssVariables => "scss",
        OutputFormat::LessVariables => "less",
        OutputFormat::JsModule | OutputFormat::TsDeclarations => "js",
        OutputFormat::AndroidXml => "android",
        OutputFormat::IosSwift => "ios",
        OutputFormat::CssVariables | OutputFormat::JsonNested | OutputFormat::JsonFlat => "css",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_has_an_export_id() {
        for format in OutputFormat::ALL {
            let id = id_for_format(format);
            assert_eq!(format_for_id(id), Some(format));
        }
    }

    #[test]
    fn test_transform_ids_round_trip() {
        for (id, kind) in TRANSFORM_IDS {
            let exported = id_for_transform(kind).unwrap();
            assert_eq!(transform_for_id(exported).unwrap().kind, *kind, "{}", id);
        }
    }

    #[test]
    fn test_group_aliases_resolve() {
        for (external, _) in GROUP_ALIASES {
            assert!(transforms_for_group(external).is_some(), "{}", external);
        }
        assert_eq!(transforms_for_group("flutter-dart"), None);
    }

    #[test]
    fn test_every_format_implies_a_preset() {
        for format in OutputFormat::ALL {
            assert!(transforms_for_group(preset_for_format(format)).is_some(), "{:?}", format);
        }
    }
}
