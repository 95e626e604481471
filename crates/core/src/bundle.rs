//! Gzipped tar bundle of build outputs, one folder per platform.

use crate::build::BuildOutput;
use crate::error::StrataError;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Component, Path};

const ENTRY_MODE: u32 = 0o644;

/// The archive path of an output, `<platform>/<file name>`. Every component
/// must be a plain name, so the path stays below whatever directory it is
/// unpacked or written into.
pub fn bundle_path(output: &BuildOutput) -> Result<String, StrataError> {
    let path = format!("{}/{}", output.platform, output.file_name);
    let contained = Path::new(&path)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !contained || output.platform.is_empty() || output.file_name.is_empty() {
        return Err(StrataError::UnsafePath(path));
    }
    Ok(path)
}

/// Writes `outputs` as a `.tar.gz` stream. Entry headers carry a fixed mtime
/// and mode, so the same outputs always produce the same bytes.
pub fn write_bundle<W: Write>(outputs: &[BuildOutput], writer: W) -> Result<W, StrataError> {
    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for output in outputs {
        let path = bundle_path(output)?;
        let data = output.content.as_bytes();
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_cksum();
        builder.append_data(&mut header, &path, data)?;
        log::debug!("Bundled {} ({} bytes)", path, data.len());
    }

    let encoder = builder.into_inner()?;
    let writer = encoder.finish()?;
    log::info!("Wrote bundle with {} file(s)", outputs.len());
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use strata_format::OutputFormat;

    fn output(platform: &str, file_name: &str, content: &str) -> BuildOutput {
        BuildOutput {
            platform: platform.to_string(),
            config: "default".to_string(),
            file_name: file_name.to_string(),
            format: OutputFormat::CssVariables,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_bundle_entries() {
        let outputs = vec![
            output("web", "tokens.css", ":root {}\n"),
            output("ios", "Tokens.swift", "public enum Tokens {}\n"),
        ];
        let bytes = write_bundle(&outputs, Vec::new()).unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
        let mut entries = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            assert_eq!(entry.header().mode().unwrap(), ENTRY_MODE);
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            entries.push((path, content));
        }
        assert_eq!(
            entries,
            vec![
                ("web/tokens.css".to_string(), ":root {}\n".to_string()),
                ("ios/Tokens.swift".to_string(), "public enum Tokens {}\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_bundle_path_rejects_escapes() {
        assert_eq!(
            bundle_path(&output("web", "css/tokens.css", "")).unwrap(),
            "web/css/tokens.css"
        );
        for (platform, file_name) in [
            ("web", "../escape.css"),
            ("web", "a/../../escape.css"),
            ("..", "tokens.css"),
            ("/etc", "tokens.css"),
            ("web", ""),
        ] {
            assert!(
                matches!(
                    bundle_path(&output(platform, file_name, "")),
                    Err(StrataError::UnsafePath(_))
                ),
                "{}/{}",
                platform,
                file_name
            );
        }
        assert!(write_bundle(&[output("web", "../x.css", "")], Vec::new()).is_err());
    }

    #[test]
    fn test_bundle_bytes_are_stable() {
        let outputs = vec![output("web", "tokens.css", "a")];
        let first = write_bundle(&outputs, Vec::new()).unwrap();
        let second = write_bundle(&outputs, Vec::new()).unwrap();
        assert_eq!(first, second);
    }
}
