//! Reading documents and writing build results to disk.

use std::fs;
use std::path::{Path, PathBuf};
use strata_core::{BuildOutput, Project, StrataError, bundle_path, write_bundle};

pub fn load_project(path: &Path) -> Result<Project, StrataError> {
    let text = fs::read_to_string(path)?;
    log::debug!("Read project from {}", path.display());
    Project::from_json(&text)
}

pub fn save_project(project: &Project, path: &Path) -> Result<(), StrataError> {
    fs::write(path, project.to_json()?)?;
    Ok(())
}

/// Writes each output to `<out_dir>/<platform>/<file_name>` and returns the
/// written paths in output order. Nothing is written if any output path
/// would leave `out_dir`.
pub fn write_outputs(outputs: &[BuildOutput], out_dir: &Path) -> Result<Vec<PathBuf>, StrataError> {
    let paths = outputs
        .iter()
        .map(|output| bundle_path(output).map(|relative| out_dir.join(relative)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut written = Vec::with_capacity(outputs.len());
    for (output, path) in outputs.iter().zip(paths) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &output.content)?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

pub fn write_bundle_file(outputs: &[BuildOutput], path: &Path) -> Result<(), StrataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_bundle(outputs, file)?;
    Ok(())
}
