//! Regeneration is independent of input order

use proptest::prelude::*;
use serde_json::json;

use upgrader_bytecode::{RawBytecodeDescription, RawUpgraderEntry, RawVersionTable};
use upgrader_codegen::{CppRenderer, JsonRenderer, Render, SkipSet, UpgraderRegistry};

const UPGRADERS: &[&str] = &[
    "div_Tensor_0_3",
    "div_Scalar_0_3",
    "div__Tensor_0_3",
    "div__Scalar_0_3",
    "div_out_0_3",
    "full_0_4",
    "full_out_0_4",
    "gelu_0_9",
    "linspace_0_7",
    "logspace_0_8",
];

fn description(name: &str) -> RawBytecodeDescription {
    RawBytecodeDescription::from_object(
        name,
        json!({
            "instructions": [["STOREN", 1, 2], ["OP", 0, 0], ["RET", 0, 0]],
            "constants": [name, false, null],
            "types": ["Tensor"],
            "operators": [[format!("aten::{name}"), "", 2]],
            "register_size": 2
        }),
    )
}

fn version_entries() -> Vec<(String, Vec<RawUpgraderEntry>)> {
    vec![
        (
            "aten::div.Tensor".to_string(),
            vec![
                RawUpgraderEntry::named("div_Tensor_0_3"),
                RawUpgraderEntry::named("div_out_0_3"),
            ],
        ),
        (
            "aten::div_.Scalar".to_string(),
            vec![RawUpgraderEntry::named("div__Scalar_0_3")],
        ),
        ("aten::gelu".to_string(), vec![RawUpgraderEntry::new("gelu_0_9", 0, 9)]),
        (
            "aten::linspace".to_string(),
            vec![
                RawUpgraderEntry::new("logspace_0_8", 0, 8),
                RawUpgraderEntry::new("linspace_0_7", 0, 7),
            ],
        ),
        ("aten::full.out".to_string(), vec![RawUpgraderEntry::named("full_out_0_4")]),
    ]
}

fn render_all(descriptions: &[RawBytecodeDescription], versions: &RawVersionTable) -> (String, String) {
    let registry = UpgraderRegistry::build(descriptions, versions, &SkipSet::default()).unwrap();
    (
        CppRenderer::default().render(&registry).unwrap(),
        JsonRenderer.render(&registry).unwrap(),
    )
}

fn canonical() -> (String, String) {
    let descriptions: Vec<_> = UPGRADERS.iter().map(|n| description(n)).collect();
    render_all(&descriptions, &RawVersionTable::new(version_entries()))
}

proptest! {
    #[test]
    fn shuffled_inputs_render_identically(
        descriptions in Just(UPGRADERS.iter().map(|n| description(n)).collect::<Vec<_>>()).prop_shuffle(),
        mut entries in Just(version_entries()).prop_shuffle(),
        reverse_references in any::<bool>(),
    ) {
        if reverse_references {
            for (_, list) in &mut entries {
                list.reverse();
            }
        }

        let rendered = render_all(&descriptions, &RawVersionTable::new(entries));
        prop_assert_eq!(rendered, canonical());
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    assert_eq!(canonical(), canonical());
}

#[test]
fn test_table_sorted_by_name() {
    let descriptions: Vec<_> = UPGRADERS.iter().rev().map(|n| description(n)).collect();
    let registry = UpgraderRegistry::build(
        &descriptions,
        &RawVersionTable::new(version_entries()),
        &SkipSet::default(),
    )
    .unwrap();

    let names: Vec<_> = registry.table().iter().map(|(_, f)| f.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    for (_, upgraders) in registry.version_map().iter() {
        assert!(upgraders.windows(2).all(|w| w[0].upgrader_name < w[1].upgrader_name));
    }
}
