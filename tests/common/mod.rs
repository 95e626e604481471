#![allow(dead_code)]

pub mod fixtures;

use strata::{BuildOutput, BuildReport};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Finds the output for `platform`/`file_name` in a report.
pub fn output<'a>(report: &'a BuildReport, platform: &str, file_name: &str) -> &'a BuildOutput {
    report
        .outputs
        .iter()
        .find(|o| o.platform == platform && o.file_name == file_name)
        .unwrap_or_else(|| {
            let names: Vec<String> = report
                .outputs
                .iter()
                .map(|o| format!("{}/{}", o.platform, o.file_name))
                .collect();
            panic!("no output {}/{} in {:?}", platform, file_name, names)
        })
}

/// Reads every `(path, content)` entry of a gzipped tar.
pub fn read_bundle(bytes: &[u8]) -> Vec<(String, String)> {
    use std::io::Read;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(bytes));
    let mut entries = Vec::new();
    for entry in archive.entries().expect("readable archive") {
        let mut entry = entry.expect("readable entry");
        let path = entry.path().expect("entry path").to_string_lossy().into_owned();
        let mut content = String::new();
        entry.read_to_string(&mut content).expect("utf-8 entry");
        entries.push((path, content));
    }
    entries
}
