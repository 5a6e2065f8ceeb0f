//! JSON dump of the registry, for inspection and diffing

use serde::Serialize;

use upgrader_bytecode::BytecodeDescription;

use crate::error::CodegenResult;
use crate::registry::{RegistryStats, UpgraderRegistry};
use crate::render::Render;
use crate::table::FunctionIndex;
use crate::version_map::VersionedUpgrader;

/// Conventional output file name
pub const UPGRADER_JSON_FILE_NAME: &str = "upgrader_mobile.json";

/// Emits both tables as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct Snapshot<'a> {
    stats: RegistryStats,
    functions: Vec<IndexedFunction<'a>>,
    operator_version_map: Vec<OperatorEntry<'a>>,
}

#[derive(Serialize)]
struct IndexedFunction<'a> {
    index: FunctionIndex,
    #[serde(flatten)]
    function: &'a BytecodeDescription,
}

#[derive(Serialize)]
struct OperatorEntry<'a> {
    operator: &'a str,
    upgraders: &'a [VersionedUpgrader],
}

impl Render for JsonRenderer {
    fn file_name(&self) -> &str {
        UPGRADER_JSON_FILE_NAME
    }

    fn render_into(&self, registry: &UpgraderRegistry, out: &mut String) -> CodegenResult<()> {
        let snapshot = Snapshot {
            stats: registry.stats(),
            functions: registry
                .table()
                .iter()
                .map(|(index, function)| IndexedFunction { index, function })
                .collect(),
            operator_version_map: registry
                .version_map()
                .iter()
                .map(|(operator, upgraders)| OperatorEntry { operator, upgraders })
                .collect(),
        };
        out.push_str(&serde_json::to_string_pretty(&snapshot)?);
        out.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use upgrader_bytecode::{RawBytecodeDescription, RawUpgraderEntry, RawVersionTable};

    use crate::skip::SkipSet;

    #[test]
    fn test_render_json() {
        let body = json!({
            "instructions": [["RET", 0, 0]],
            "constants": [false],
            "types": [],
            "operators": [],
            "register_size": 0
        });
        let descriptions = vec![
            RawBytecodeDescription::from_object("foo_0_1", body.clone()),
            RawBytecodeDescription::from_object("bar_0_2", body),
        ];
        let versions = RawVersionTable::new(vec![(
            "aten::foo".to_string(),
            vec![RawUpgraderEntry::new("foo_0_1", 0, 1)],
        )]);
        let registry = UpgraderRegistry::build(&descriptions, &versions, &SkipSet::default()).unwrap();

        let out = JsonRenderer.render(&registry).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["stats"]["functions"], 2);
        assert_eq!(value["functions"][0]["index"], 0);
        assert_eq!(value["functions"][0]["name"], "bar_0_2");
        assert_eq!(value["functions"][1]["constants"][0], json!({"Bool": false}));
        assert_eq!(value["operator_version_map"][0]["operator"], "aten::foo");
        assert_eq!(value["operator_version_map"][0]["upgraders"][0]["bytecode_index"], 1);
        assert_eq!(value["operator_version_map"][0]["upgraders"][0]["max_version"], 1);
    }
}
