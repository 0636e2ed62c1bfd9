use sysgraph::errors::SysGraphError;
use sysgraph::model::*;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "elements": [
    { "id": "pkg", "metaclass": "package", "name": "Structure" },
    {
      "id": "engine",
      "metaclass": "class",
      "name": "Engine",
      "owner": "pkg",
      "stereotypes": [{ "name": "Block" }]
    },
    {
      "id": "req",
      "metaclass": "class",
      "name": "Cooling",
      "stereotypes": [
        { "name": "Requirement", "tags": { "Id": [{ "type": "string", "value": "REQ-1" }] } }
      ]
    },
    {
      "id": "port",
      "metaclass": "port",
      "name": "in",
      "owner": "engine",
      "type": "engine",
      "multiplicity": { "lower": 0, "upper": -1 },
      "is_conjugated": true
    }
  ],
  "relationships": [
    { "id": "s", "stereotype": "Satisfy", "sources": ["engine"], "targets": ["req"] }
  ]
}"#;

#[test]
fn test_parse_model_document() {
    let model = SourceModel::from_json_str(DOCUMENT).unwrap();
    assert_eq!(model.len(), 4);

    let port = model.get("port").unwrap();
    assert_eq!(port.type_ref.as_deref(), Some("engine"));
    assert_eq!(port.multiplicity, Some(Multiplicity { lower: 0, upper: -1 }));
    assert!(port.is_conjugated);
    assert_eq!(port.qualified_name.as_deref(), Some("Structure::Engine::in"));

    let req = model.get("req").unwrap();
    assert_eq!(req.tag("Id"), Some(&TagValue::String("REQ-1".to_string())));
}

#[test]
fn test_relationship_indices() {
    let model = SourceModel::from_json_str(DOCUMENT).unwrap();
    assert_eq!(model.outgoing("engine").count(), 1);
    assert_eq!(model.incoming("req").count(), 1);
    assert_eq!(model.incoming("engine").count(), 0);
}

#[test]
fn test_children_in_document_order() {
    let model = SourceModel::new(
        vec![
            SourceElement::new("b", Metaclass::Class, "B"),
            SourceElement::new("z", Metaclass::Port, "z").owned_by("b"),
            SourceElement::new("a", Metaclass::Port, "a").owned_by("b"),
        ],
        vec![],
    )
    .unwrap();
    let ids: Vec<_> = model.children("b").map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
    assert_eq!(model.children("z").count(), 0);
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let err = SourceModel::new(
        vec![
            SourceElement::new("x", Metaclass::Class, "A"),
            SourceElement::new("x", Metaclass::Class, "B"),
        ],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, SysGraphError::Model { .. }));
}

#[test]
fn test_containment_cycle_is_rejected() {
    let err = SourceModel::new(
        vec![
            SourceElement::new("a", Metaclass::Package, "A").owned_by("b"),
            SourceElement::new("b", Metaclass::Package, "B").owned_by("a"),
        ],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, SysGraphError::Model { .. }));
}

#[test]
fn test_dangling_owner_is_tolerated() {
    let model = SourceModel::new(
        vec![SourceElement::new("a", Metaclass::Class, "A").owned_by("missing")],
        vec![],
    )
    .unwrap();
    let a = model.get("a").unwrap();
    assert!(model.owner(a).is_none());
    assert_eq!(a.qualified_name.as_deref(), Some("A"));
}

#[test]
fn test_explicit_qualified_name_is_kept() {
    let model = SourceModel::new(
        vec![
            SourceElement::new("p", Metaclass::Package, "P").qualified("Lib::P"),
            SourceElement::new("c", Metaclass::Class, "C").owned_by("p"),
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(model.get("c").unwrap().qualified_name.as_deref(), Some("Lib::P::C"));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, DOCUMENT).unwrap();
    let model = SourceModel::load(&path).unwrap();
    assert_eq!(model.relationships().len(), 1);

    let missing = SourceModel::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, SysGraphError::Model { .. }));
}
