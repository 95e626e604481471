mod common;

use proptest::prelude::*;
use serde_json::{Value, json};
use strata::{Project, build_all};

/// A project with one bound layer per variable and one page per slot.
fn project_with(value_counts: &[usize]) -> Project {
    let variables: Vec<Value> = value_counts
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let values: Vec<String> = (0..*n).map(|v| format!("v{}", v)).collect();
            json!({ "id": format!("var-{}", i), "name": format!("Axis {}", i), "key": format!("k{}", i), "values": values })
        })
        .collect();
    let layers: Vec<Value> = (0..value_counts.len())
        .map(|i| {
            json!({
                "id": format!("layer-{}", i),
                "name": format!("Layer {}", i),
                "order": i,
                "variableKeys": [format!("k{}", i)]
            })
        })
        .collect();
    let mut doc = json!({
        "name": "Grid",
        "variables": variables,
        "layers": layers,
        "pages": [],
        "platforms": [
            { "name": "web", "transforms": [{ "name": "kebab" }], "outputs": [{ "fileName": "tokens.css", "format": "cssVariables" }] }
        ]
    });
    let mut pages = Vec::new();
    for (i, n) in value_counts.iter().enumerate() {
        for v in 0..*n {
            pages.push(json!({
                "id": format!("page-{}-{}", i, v),
                "layerId": format!("layer-{}", i),
                "name": format!("Layer {} / v{}", i, v),
                "variableValues": { (format!("k{}", i)): format!("v{}", v) },
                "tokens": { "axis": { (format!("k{}", i)): { "$value": format!("v{}", v) } } }
            }));
        }
    }
    doc["pages"] = Value::Array(pages);
    Project::from_json(&doc.to_string()).expect("generated project is valid")
}

proptest! {
    #[test]
    fn test_one_output_per_config(counts in prop::collection::vec(1usize..4, 0..4)) {
        let project = project_with(&counts);
        let expected: usize = counts.iter().product();
        let report = build_all(&project).unwrap();

        prop_assert_eq!(project.build_configs().len(), expected);
        prop_assert_eq!(report.outputs.len(), expected);
        prop_assert!(report.is_complete());

        let mut names: Vec<&str> = report.outputs.iter().map(|o| o.file_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), expected);
    }

    #[test]
    fn test_full_build_is_deterministic(counts in prop::collection::vec(1usize..3, 0..3)) {
        let project = project_with(&counts);
        prop_assert_eq!(build_all(&project).unwrap(), build_all(&project).unwrap());
    }
}
