use sysgraph::classify::*;
use sysgraph::context::MappingOptions;
use sysgraph::descriptor::{Descriptor, DEFAULT_VOCAB_BASE};
use sysgraph::graph::triples::{DCTERMS_TITLE, RDF_TYPE, XSD_BOOLEAN};
use sysgraph::graph::*;
use sysgraph::mapping::Mapper;
use sysgraph::model::*;
use sysgraph::types::*;

const BASE: &str = "http://example.com/sysgraph";

fn link(segment: &str, identity: &str) -> Link {
    Link::new(address(segment, identity))
}

fn address(segment: &str, identity: &str) -> String {
    format!("{}/{}/proj{}", BASE, segment, identity)
}

fn descriptor() -> Descriptor {
    Descriptor::new(BASE).unwrap()
}

/// A vehicle with a part, a proxy port, a connector, an item flow, a value
/// type with unit and quantity kind, and an association block.
fn vehicle_graph() -> ResourceGraph {
    let model = SourceModel::new(
        vec![
            SourceElement::new("vehicle", Metaclass::Class, "Vehicle").stereotyped(BLOCK),
            SourceElement::new("engine", Metaclass::Class, "Engine").stereotyped(BLOCK),
            SourceElement::new("fuel_in", Metaclass::Port, "fuelIn")
                .owned_by("engine")
                .stereotyped(PROXY_PORT)
                .with_multiplicity(1, 1),
            SourceElement::new("fuel_fp", Metaclass::Property, "fuel")
                .owned_by("engine")
                .stereotyped(FLOW_PROPERTY),
            SourceElement::new("tank", Metaclass::Property, "tank")
                .owned_by("vehicle")
                .typed_by("engine")
                .with_aggregation(Aggregation::Composite),
            SourceElement::new("c1", Metaclass::Connector, "c1").owned_by("vehicle"),
            SourceElement::new("e1", Metaclass::ConnectorEnd, "e1")
                .owned_by("c1")
                .with_role("fuel_in")
                .with_part_with_port("tank"),
            SourceElement::new("e2", Metaclass::ConnectorEnd, "e2")
                .owned_by("c1")
                .with_role("ghost_role"),
            SourceElement::new("ghost_role", Metaclass::Other, "ghost"),
            SourceElement::new("flow", Metaclass::InformationFlow, "fuel")
                .stereotyped(ITEM_FLOW)
                .with_tag(ITEM_PROPERTY_TAG, TagValue::Element("fuel_fp".to_string()))
                .with_flow("tank", "fuel_in")
                .realized_by("c1"),
            SourceElement::new("kg", Metaclass::InstanceSpecification, "kilogram")
                .stereotyped(UNIT)
                .with_tag(SYMBOL_TAG, TagValue::String("kg".to_string())),
            SourceElement::new("mass_kind", Metaclass::InstanceSpecification, "mass")
                .stereotyped(QUANTITY_KIND),
            SourceElement::new("mass", Metaclass::DataType, "Mass")
                .stereotyped(VALUE_TYPE)
                .with_tag(UNIT_TAG, TagValue::Element("kg".to_string()))
                .with_tag(QUANTITY_KIND_TAG, TagValue::Element("mass_kind".to_string())),
            SourceElement::new("assoc", Metaclass::AssociationClass, "Towing")
                .stereotyped(BLOCK)
                .with_member_end("tow")
                .with_member_end("ghost_role"),
            SourceElement::new("tow", Metaclass::Property, "tow")
                .owned_by("assoc")
                .typed_by("vehicle"),
            SourceElement::new("anon", Metaclass::Class, "").stereotyped(BLOCK),
        ],
        vec![],
    )
    .unwrap();
    Mapper::run(&model, MappingOptions::new("proj", descriptor())).unwrap()
}

// ----------------------------------------------------------------------------
// Structural links
// ----------------------------------------------------------------------------

#[test]
fn test_part_property_and_connector_links() {
    let graph = vehicle_graph();

    match &graph.find_by_source("vehicle").unwrap().body {
        ResourceBody::Block(d) => {
            assert_eq!(d.part_properties, Some(vec![link("partproperties", "Vehicle::tank")]));
            assert_eq!(d.connectors, Some(vec![link("connectors", "Vehicle::c1")]));
        }
        other => panic!("expected block, got {:?}", other),
    }

    match &graph.find_by_source("c1").unwrap().body {
        ResourceBody::Connector(d) => {
            assert_eq!(
                d.ends,
                Some(vec![
                    link("connectorends", "Vehicle::c1::e1"),
                    link("connectorends", "Vehicle::c1::e2"),
                ])
            );
            assert_eq!(d.owner, Some(link("blocks", "Vehicle")));
        }
        other => panic!("expected connector, got {:?}", other),
    }

    match &graph.find_by_source("e1").unwrap().body {
        ResourceBody::ConnectorEnd(d) => {
            assert_eq!(d.role, Some(link("proxyports", "Engine::fuelIn")));
            assert_eq!(d.part_with_port, Some(link("partproperties", "Vehicle::tank")));
            assert_eq!(d.connector, Some(link("connectors", "Vehicle::c1")));
        }
        other => panic!("expected connector end, got {:?}", other),
    }

    match &graph.find_by_source("e2").unwrap().body {
        ResourceBody::ConnectorEnd(d) => {
            assert_eq!(d.role, Some(link("unknown", "ghost")));
            assert_eq!(d.part_with_port, None);
        }
        other => panic!("expected connector end, got {:?}", other),
    }
}

#[test]
fn test_item_flow_links() {
    let graph = vehicle_graph();
    match &graph.find_by_source("flow").unwrap().body {
        ResourceBody::ItemFlow(d) => {
            assert_eq!(d.information_source, Some(link("partproperties", "Vehicle::tank")));
            assert_eq!(d.information_target, Some(link("proxyports", "Engine::fuelIn")));
            assert_eq!(d.realizing_connector, Some(link("connectors", "Vehicle::c1")));
            assert_eq!(d.item_property, Some(link("flowproperties", "Engine::fuel")));
        }
        other => panic!("expected item flow, got {:?}", other),
    }
}

#[test]
fn test_item_property_must_be_flow_property() {
    let model = SourceModel::new(
        vec![
            SourceElement::new("car", Metaclass::Class, "Car").stereotyped(BLOCK),
            SourceElement::new("wheel", Metaclass::Property, "wheel")
                .owned_by("car")
                .typed_by("car")
                .with_aggregation(Aggregation::Composite),
            SourceElement::new("flow", Metaclass::InformationFlow, "torque")
                .stereotyped(ITEM_FLOW)
                .with_tag(ITEM_PROPERTY_TAG, TagValue::Element("wheel".to_string())),
        ],
        vec![],
    )
    .unwrap();
    let graph = Mapper::run(&model, MappingOptions::new("proj", descriptor())).unwrap();
    assert!(graph.get(ResourceKind::PartProperty, "Car::wheel").is_some());
    match &graph.find_by_source("flow").unwrap().body {
        ResourceBody::ItemFlow(d) => assert_eq!(d.item_property, None),
        other => panic!("expected item flow, got {:?}", other),
    }
}

#[test]
fn test_value_type_keeps_unit_and_quantity_kind_apart() {
    let graph = vehicle_graph();
    match &graph.find_by_source("mass").unwrap().body {
        ResourceBody::ValueType(d) => {
            assert_eq!(d.unit, Some(link("units", "kilogram")));
            assert_eq!(d.quantity_kind, Some(link("quantitykinds", "mass")));
        }
        other => panic!("expected value type, got {:?}", other),
    }
    match &graph.find_by_source("kg").unwrap().body {
        ResourceBody::Unit(d) => assert_eq!(d.symbol.as_deref(), Some("kg")),
        other => panic!("expected unit, got {:?}", other),
    }
}

#[test]
fn test_association_block_member_ends() {
    let graph = vehicle_graph();
    match &graph.find_by_source("assoc").unwrap().body {
        ResourceBody::AssociationBlock(d) => {
            assert_eq!(
                d.member_ends,
                Some(vec![
                    link("referenceproperties", "Towing::tow"),
                    link("unknown", "ghost"),
                ])
            );
        }
        other => panic!("expected association block, got {:?}", other),
    }
}

// ----------------------------------------------------------------------------
// Aggregation
// ----------------------------------------------------------------------------

#[test]
fn test_all_resources_is_union_of_indices() {
    let graph = vehicle_graph();
    let total: usize = graph.indices().iter().map(|(_, index)| index.len()).sum();
    assert_eq!(graph.all_resources().count(), total);
    assert_eq!(graph.len(), total);
    assert_eq!(graph.resources_of(ResourceKind::ConnectorEnd).count(), 2);
    assert_eq!(graph.resources_of(ResourceKind::Unknown).count(), 0);
}

#[test]
fn test_lookup_by_identity_and_key() {
    let graph = vehicle_graph();
    let engine = graph.get(ResourceKind::Block, "Engine").unwrap();
    assert_eq!(engine.about(), Some(address("blocks", "Engine").as_str()));
    assert_eq!(
        graph.get_by_key(ResourceKind::Block, "proj/blocks/Engine"),
        Some(engine)
    );
    assert!(graph.get(ResourceKind::Requirement, "Engine").is_none());
}

#[test]
fn test_addresses_skip_unaddressed_resources() {
    let graph = vehicle_graph();
    let addresses = graph.addresses();
    assert!(addresses.contains(address("blocks", "Vehicle").as_str()));
    assert_eq!(addresses.len(), graph.len() - 1);
}

#[test]
fn test_document_serializes() {
    let graph = vehicle_graph();
    let doc = graph.to_document();
    let json = serde_json::to_string(&doc).unwrap();
    let back: GraphDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back.resources.len(), graph.len());
    assert_eq!(back.scope, "proj");
}

// ----------------------------------------------------------------------------
// Triples
// ----------------------------------------------------------------------------

#[test]
fn test_port_triples() {
    let graph = vehicle_graph();
    let port = graph.find_by_source("fuel_in").unwrap();
    let triples = resource_triples(port, &descriptor());
    let subject = Term::iri(address("proxyports", "Engine::fuelIn"));

    assert!(triples.iter().all(|t| t.subject == subject));
    assert!(triples.contains(&Triple {
        subject: subject.clone(),
        predicate: RDF_TYPE.to_string(),
        object: Term::iri(format!("{}ProxyPort", DEFAULT_VOCAB_BASE)),
    }));
    assert!(triples.contains(&Triple {
        subject: subject.clone(),
        predicate: DCTERMS_TITLE.to_string(),
        object: Term::literal("fuelIn"),
    }));
    assert!(triples.contains(&Triple {
        subject: subject.clone(),
        predicate: format!("{}isConjugated", DEFAULT_VOCAB_BASE),
        object: Term::typed_literal("false", XSD_BOOLEAN),
    }));
    assert!(triples.contains(&Triple {
        subject,
        predicate: format!("{}owner", DEFAULT_VOCAB_BASE),
        object: Term::iri(address("blocks", "Engine")),
    }));
}

#[test]
fn test_multi_valued_links_become_repeated_triples() {
    let graph = vehicle_graph();
    let connector = graph.find_by_source("c1").unwrap();
    let ends: Vec<_> = resource_triples(connector, &descriptor())
        .into_iter()
        .filter(|t| t.predicate == format!("{}end", DEFAULT_VOCAB_BASE))
        .collect();
    assert_eq!(ends.len(), 2);
}

#[test]
fn test_unaddressed_resource_is_blank_node() {
    let graph = vehicle_graph();
    let anon = graph.find_by_source("anon").unwrap();
    let triples = resource_triples(anon, &descriptor());
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].subject, Term::blank("anon"));
    assert_eq!(triples[0].predicate, RDF_TYPE);
}

#[test]
fn test_blank_nodes_stay_distinct_for_similar_ids() {
    let model = SourceModel::new(
        vec![
            SourceElement::new("_17.0:a", Metaclass::Class, "").stereotyped(BLOCK),
            SourceElement::new("_17.0_a", Metaclass::Class, "").stereotyped(BLOCK),
        ],
        vec![],
    )
    .unwrap();
    let graph = Mapper::run(&model, MappingOptions::new("proj", descriptor())).unwrap();
    assert_eq!(graph.len(), 2);

    let triples = graph_triples(&graph, &descriptor());
    let subjects: std::collections::HashSet<_> = triples.iter().map(|t| &t.subject).collect();
    assert_eq!(subjects.len(), 2);
    assert_ne!(Term::blank("_17.0:a"), Term::blank("_17.0_a"));
}

#[test]
fn test_graph_triples_cover_every_resource() {
    let graph = vehicle_graph();
    let triples = graph_triples(&graph, &descriptor());
    let typed = triples.iter().filter(|t| t.predicate == RDF_TYPE).count();
    assert_eq!(typed, graph.len());
}
