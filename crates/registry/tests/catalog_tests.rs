use std::fs;

use cmdrest_registry::{Binding, CatalogConfig, Overrides, ParamValue, extract};

fn load_fixture() -> CatalogConfig {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commands.yaml");
    fs::write(&path, include_str!("data/catalog_fixture.yaml")).expect("write fixture");
    CatalogConfig::load_from(&path).expect("load catalog fixture")
}

#[test]
fn loads_every_command_in_order() {
    let catalog = load_fixture();
    let names: Vec<_> = catalog.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ls", "grep"]);
    assert_eq!(catalog.commands[0].summary.as_deref(), Some("List directory contents"));
}

#[test]
fn grep_fixture_extracts_positionals_and_skips_untagged() {
    let catalog = load_fixture();
    let grep = catalog.commands.iter().find(|c| c.name == "grep").expect("grep present");
    let table = extract(grep).expect("extract grep");

    assert_eq!(table.len(), 4, "untagged Notes field should be skipped");
    assert_eq!(table.positional_count(), 2);
    assert_eq!(table.get("File").map(|p| &p.binding), Some(&Binding::Positional(1)));
    assert_eq!(table.get("Pattern").map(|p| &p.value), Some(&ParamValue::default()));
    assert_eq!(table.get("Context").map(|p| &p.binding), Some(&Binding::Flag("context".into())));
}

#[test]
fn overrides_from_fixture_query() {
    let catalog = load_fixture();
    let table = extract(&catalog.commands[0]).expect("extract ls");
    let merged = table.merged(&Overrides::from_query("a=TRUE&Path=%2Fvar%2Flog"));

    assert_eq!(merged.get("All").map(|p| &p.value), Some(&ParamValue::Bool(true)));
    assert_eq!(merged.get("Path").map(|p| &p.value), Some(&ParamValue::from("/var/log")));
    assert_eq!(merged.get("Long").map(|p| &p.value), Some(&ParamValue::Bool(true)));
}

#[test]
fn json_catalogs_are_supported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commands.json");
    fs::write(
        &path,
        r#"{"commands": [{"name": "echo", "fields": [{"name": "Text", "tag": "0", "value": "hi"}]}]}"#,
    )
    .expect("write json catalog");

    let catalog = CatalogConfig::load_from(&path).expect("load json catalog");
    assert_eq!(catalog.commands.len(), 1);
    assert_eq!(catalog.commands[0].fields[0].value, ParamValue::from("hi"));
}

#[test]
fn malformed_catalog_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "commands: [ {name: ").expect("write broken catalog");

    let err = CatalogConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("broken.yaml"), "{err}");
}
