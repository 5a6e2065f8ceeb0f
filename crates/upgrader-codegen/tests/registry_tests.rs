//! Integration tests for building, rendering and writing the registry

use std::fs;

use upgrader_bytecode::{BytecodeError, RawBytecodeDescription, RawVersionTable};
use upgrader_codegen::{
    CodegenError, CppRenderer, JsonRenderer, Render, SkipSet, UpgraderRegistry, generate,
};

const DESCRIPTIONS: &str = r#"
- div_Tensor_0_3:
    instructions:
      - [STOREN, 1, 2]
      - [LOAD, 1, 0]
      - [LOAD, 2, 0]
      - [OP, 0, 0]
      - [JF, 3, 0]
      - [LOADC, 1, 0]
      - [JMP, 3, 0]
      - [LOADC, 0, 0]
      - [OP, 1, 0]
      - [RET, 0, 0]
    constants: [trunc, true]
    types: []
    operators:
      - ['aten::is_floating_point', '', 1]
      - ['aten::div', Tensor_mode, 3]
    register_size: 2
- div__Scalar_0_3:
    instructions:
      - [STOREN, 1, 2]
      - [LOAD, 1, 0]
      - [OP, 0, 0]
      - [RET, 0, 0]
    constants: [~]
    types: []
    operators:
      - ['aten::div_', Scalar_mode, 3]
    register_size: 2
- full_names_0_4:
    instructions: [[RET, 0, 0]]
    constants: []
    types: []
    operators: []
    register_size: 0
- full_0_4:
    instructions:
      - [STOREN, 1, 7]
      - [OP, 0, 0]
      - [RET, 0, 0]
    constants: []
    types: ['int[]', Scalar, 'ScalarType?']
    operators:
      - ['aten::full', '', 6]
    register_size: 7
"#;

const VERSION_TABLE: &str = r#"
"aten::full":
  - upgrader_name: full_0_4
    min_version: 0
    max_version: 4
"aten::div.Tensor":
  - upgrader_name: div_Tensor_0_3
    min_version: 0
    max_version: 3
"aten::full.names":
  - upgrader_name: full_names_0_4
"aten::div_.Scalar":
  - upgrader_name: div__Scalar_0_3
"#;

fn descriptions() -> Vec<RawBytecodeDescription> {
    serde_yaml::from_str(DESCRIPTIONS).unwrap()
}

fn version_table() -> RawVersionTable {
    serde_yaml::from_str(VERSION_TABLE).unwrap()
}

#[test]
fn test_registry_from_yaml() {
    let registry = UpgraderRegistry::build(&descriptions(), &version_table(), &SkipSet::default()).unwrap();

    let names: Vec<_> = registry.table().iter().map(|(_, f)| f.name.clone()).collect();
    assert_eq!(names, vec!["div_Tensor_0_3", "div__Scalar_0_3", "full_0_4"]);

    let operators: Vec<_> = registry.version_map().iter().map(|(op, _)| op).collect();
    assert_eq!(operators, vec!["aten::div.Tensor", "aten::div_.Scalar", "aten::full"]);

    let full = &registry.version_map().get("aten::full").unwrap()[0];
    assert_eq!((full.min_version, full.max_version), (0, 4));
    assert_eq!(full.bytecode_index.index(), 2);
    assert_eq!(
        registry.table().get(full.bytecode_index).unwrap().types,
        vec!["int[]", "Scalar", "ScalarType?"]
    );
}

#[test]
fn test_every_index_resolves() {
    let registry = UpgraderRegistry::build(&descriptions(), &version_table(), &SkipSet::default()).unwrap();

    for (_, upgraders) in registry.version_map().iter() {
        for upgrader in upgraders {
            let function = registry.table().get(upgrader.bytecode_index).unwrap();
            assert_eq!(function.name, upgrader.upgrader_name);
            assert!((upgrader.bytecode_index.index() as usize) < registry.table().len());
        }
    }
}

#[test]
fn test_skipped_names_absent_from_output() {
    let registry = UpgraderRegistry::build(&descriptions(), &version_table(), &SkipSet::default()).unwrap();

    for renderer in [&CppRenderer::default() as &dyn Render, &JsonRenderer] {
        let out = renderer.render(&registry).unwrap();
        assert!(!out.contains("full_names_0_4"));
        assert!(!out.contains("aten::full.names"));
        assert!(out.contains("full_0_4"));
    }
}

#[test]
fn test_empty_skip_set_keeps_everything() {
    let registry = UpgraderRegistry::build(&descriptions(), &version_table(), &SkipSet::empty()).unwrap();
    assert_eq!(registry.table().len(), 4);
    assert!(registry.version_map().get("aten::full.names").is_some());
}

#[test]
fn test_generate_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = CppRenderer::default();

    let path = generate(
        &descriptions(),
        &version_table(),
        &SkipSet::default(),
        &renderer,
        dir.path(),
    )
    .unwrap();

    assert_eq!(path, dir.path().join("upgrader_mobile.cpp"));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("Upgrader({0, 3, \"div__Scalar_0_3\", 1})"));
    assert!(written.contains("Instruction{OpCode::JF, 3, 0},"));
}

#[test]
fn test_unsupported_constant_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let bad = DESCRIPTIONS.replace("constants: [trunc, true]", "constants: [trunc, {rounding: floor}]");
    let descriptions: Vec<RawBytecodeDescription> = serde_yaml::from_str(&bad).unwrap();

    let err = generate(
        &descriptions,
        &version_table(),
        &SkipSet::default(),
        &CppRenderer::default(),
        dir.path(),
    )
    .unwrap_err();

    match err {
        CodegenError::Bytecode(BytecodeError::UnsupportedConstantType {
            upgrader,
            type_name,
            value,
        }) => {
            assert_eq!(upgrader, "div_Tensor_0_3");
            assert_eq!(type_name, "mapping");
            assert!(value.contains("floor"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("upgrader_mobile.cpp").exists());
}

#[test]
fn test_missing_reference_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let previous = dir.path().join("upgrader_mobile.cpp");
    fs::write(&previous, "// previous generation\n").unwrap();

    let mut versions = version_table();
    versions.0.push((
        "aten::baz".to_string(),
        vec![upgrader_bytecode::RawUpgraderEntry::new("baz_0_1", 0, 1)],
    ));

    let err = generate(
        &descriptions(),
        &versions,
        &SkipSet::default(),
        &CppRenderer::default(),
        dir.path(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CodegenError::UnresolvedUpgraderReference { ref operator, ref upgrader }
            if operator == "aten::baz" && upgrader == "baz_0_1"
    ));
    assert_eq!(fs::read_to_string(&previous).unwrap(), "// previous generation\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_duplicate_description_name() {
    let mut raws = descriptions();
    raws.push(raws[0].clone());
    assert!(matches!(
        UpgraderRegistry::build(&raws, &version_table(), &SkipSet::default()),
        Err(CodegenError::DuplicateName { ref name, .. }) if name == "div_Tensor_0_3"
    ));
}
