//! The build chain: merge, resolve, transform and format for each target.
//!
//! Every step is a pure function of the project, so running a build twice on
//! the same document yields byte-identical outputs.

use crate::error::StrataError;
use crate::project::Project;
use serde::Serialize;
use strata_format::{OutputFormat, PlatformConfig, format_output};
use strata_pipeline::{BuildConfig, BuildDefect, build_tokens};
use strata_tokens::{DEFAULT_MAX_DEPTH, ResolvedToken, flatten, resolve_tokens};
use strata_transform::apply_transforms;

const CONFIG_PLACEHOLDER: &str = "{config}";

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub platform: String,
    pub config: String,
    pub file_name: String,
    pub format: OutputFormat,
    pub content: String,
}

/// A merge defect tagged with the build config that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedDefect {
    pub config: String,
    #[serde(flatten)]
    pub defect: BuildDefect,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub outputs: Vec<BuildOutput>,
    pub defects: Vec<ReportedDefect>,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.defects.is_empty()
    }

    fn absorb(&mut self, other: BuildReport) {
        self.outputs.extend(other.outputs);
        self.defects.extend(other.defects);
    }
}

/// The file name for one output under one config.
///
/// A `{config}` placeholder is always substituted. Otherwise, when the project
/// has more than one config, `-<config>` goes in front of the first dot of the
/// last path component, so `tokens.d.ts` becomes `tokens-dark.d.ts`.
pub fn output_file_name(template: &str, config: &str, multiple_configs: bool) -> String {
    if template.contains(CONFIG_PLACEHOLDER) {
        return template.replace(CONFIG_PLACEHOLDER, config);
    }
    if !multiple_configs {
        return template.to_string();
    }

    let (dir, file) = match template.rfind('/') {
        Some(i) => template.split_at(i + 1),
        None => ("", template),
    };
    match file.char_indices().skip(1).find(|(_, c)| *c == '.') {
        Some((i, _)) => format!("{}{}-{}{}", dir, &file[..i], config, &file[i..]),
        None => format!("{}{}-{}", dir, file, config),
    }
}

/// Merges and resolves the tokens of one config. Aliases resolve against the
/// tree merged across every layer.
pub fn resolve_config(project: &Project, config: &BuildConfig) -> (Vec<ResolvedToken>, Vec<BuildDefect>) {
    let merged = build_tokens(&project.pipeline, config);
    let resolved = resolve_tokens(&flatten(&merged.tree), &merged.tree, DEFAULT_MAX_DEPTH);
    log::debug!(
        "Config '{}': {} token(s), {} defect(s)",
        config.name,
        resolved.len(),
        merged.defects.len()
    );
    (resolved, merged.defects)
}

/// Transforms the resolved tokens for `platform` and renders every enabled
/// output.
pub fn render_platform(
    platform: &PlatformConfig,
    resolved: &[ResolvedToken],
    config_name: &str,
    multiple_configs: bool,
) -> Result<Vec<BuildOutput>, StrataError> {
    let tokens = apply_transforms(resolved, &platform.transforms, &platform.transform_options());
    let options = platform.format_options();

    platform
        .enabled_outputs()
        .map(|output| {
            let content = format_output(&tokens, output.format, &options)?;
            let file_name = output_file_name(&output.file_name, config_name, multiple_configs);
            log::debug!("Rendered {}/{} ({} bytes)", platform.name, file_name, content.len());
            Ok(BuildOutput {
                platform: platform.name.clone(),
                config: config_name.to_string(),
                file_name,
                format: output.format,
                content,
            })
        })
        .collect()
}

fn build_config(
    project: &Project,
    config: &BuildConfig,
    platforms: &[&PlatformConfig],
    multiple_configs: bool,
) -> Result<BuildReport, StrataError> {
    let (resolved, defects) = resolve_config(project, config);
    for defect in &defects {
        log::warn!("Build '{}': {}", config.name, defect);
    }

    let mut report = BuildReport {
        outputs: Vec::new(),
        defects: defects
            .into_iter()
            .map(|defect| ReportedDefect {
                config: config.name.clone(),
                defect,
            })
            .collect(),
    };
    for platform in platforms {
        report
            .outputs
            .extend(render_platform(platform, &resolved, &config.name, multiple_configs)?);
    }
    Ok(report)
}

/// Builds a single platform under a single config. File names are not
/// suffixed unless they carry a `{config}` placeholder.
pub fn build_one(
    project: &Project,
    config: &BuildConfig,
    platform: &str,
) -> Result<BuildReport, StrataError> {
    let platform = project.platform(platform)?;
    log::info!("Building platform '{}' for config '{}'", platform.name, config.name);
    build_config(project, config, &[platform], false)
}

/// Builds every platform under every build config.
pub fn build_all(project: &Project) -> Result<BuildReport, StrataError> {
    build_filtered(project, None, None)
}

/// Builds the named config and platform, or all of them where a filter is
/// `None`. File names follow the same rule as [`build_all`], so a filtered
/// build writes the same paths the full build would.
pub fn build_filtered(
    project: &Project,
    config: Option<&str>,
    platform: Option<&str>,
) -> Result<BuildReport, StrataError> {
    let all_configs = project.build_configs();
    let multiple_configs = all_configs.len() > 1;
    let configs = match config {
        Some(name) => vec![project.find_config(name)?],
        None => all_configs,
    };
    let platforms: Vec<&PlatformConfig> = match platform {
        Some(name) => vec![project.platform(name)?],
        None => project.platforms.iter().collect(),
    };
    if configs.is_empty() {
        log::warn!("Project '{}' has no build configs; nothing to build", project.name);
    }

    log::info!(
        "Building project '{}': {} config(s) x {} platform(s)",
        project.name,
        configs.len(),
        platforms.len()
    );

    let mut report = BuildReport::default();
    for config in &configs {
        report.absorb(build_config(project, config, &platforms, multiple_configs)?);
    }

    log::info!(
        "Build finished: {} output(s), {} defect(s)",
        report.outputs.len(),
        report.defects.len()
    );
    Ok(report)
}
