//! Projection of resources onto subject/predicate/object triples.
//!
//! This is the hand-off point to an external RDF serializer; no concrete
//! syntax is produced here.

use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;
use crate::graph::ResourceGraph;
use crate::types::*;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_CONTAINER: &str = "http://www.w3.org/2000/01/rdf-schema#Container";
pub const RDFS_MEMBER: &str = "http://www.w3.org/2000/01/rdf-schema#member";
pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DCTERMS_IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Node of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Term {
    Iri {
        value: String,
    },
    Blank {
        id: String,
    },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri {
            value: value.into(),
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: &str) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.to_string()),
        }
    }

    /// Blank node labelled from an opaque element id.
    pub fn blank(source_id: &str) -> Self {
        Term::Blank {
            id: blank_label(source_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

/// Hex-encoded so distinct ids never share a label.
fn blank_label(source_id: &str) -> String {
    format!("n{}", hex::encode(source_id.as_bytes()))
}

/// Collects triples for one subject.
struct Emitter<'a> {
    subject: Term,
    descriptor: &'a Descriptor,
    out: Vec<Triple>,
}

impl Emitter<'_> {
    fn push(&mut self, predicate: String, object: Term) {
        self.out.push(Triple {
            subject: self.subject.clone(),
            predicate,
            object,
        });
    }

    fn link(&mut self, local: &str, link: &Option<Link>) {
        if let Some(link) = link {
            let predicate = self.descriptor.vocabulary_term(local);
            self.push(predicate, Term::iri(link.as_str()));
        }
    }

    fn links(&mut self, local: &str, links: &Option<Vec<Link>>) {
        for link in links.iter().flatten() {
            let predicate = self.descriptor.vocabulary_term(local);
            self.push(predicate, Term::iri(link.as_str()));
        }
    }

    fn text(&mut self, local: &str, value: &Option<String>) {
        if let Some(value) = value {
            let predicate = self.descriptor.vocabulary_term(local);
            self.push(predicate, Term::literal(value.clone()));
        }
    }

    fn flag(&mut self, local: &str, value: bool) {
        let predicate = self.descriptor.vocabulary_term(local);
        self.push(predicate, Term::typed_literal(value.to_string(), XSD_BOOLEAN));
    }
}

/// Subject term of a resource: its address, or a blank node when unaddressed.
pub fn subject_of(resource: &Resource) -> Term {
    match resource.about() {
        Some(about) => Term::iri(about),
        None => Term::blank(&resource.source_id),
    }
}

/// Triples describing one resource.
pub fn resource_triples(resource: &Resource, descriptor: &Descriptor) -> Vec<Triple> {
    let mut e = Emitter {
        subject: subject_of(resource),
        descriptor,
        out: Vec::new(),
    };

    e.push(
        RDF_TYPE.to_string(),
        Term::iri(descriptor.vocabulary_term(resource.kind.rdf_class())),
    );
    if let Some(name) = resource.name() {
        e.push(DCTERMS_TITLE.to_string(), Term::literal(name));
    }

    match &resource.body {
        ResourceBody::Block(d) => {
            e.links("inheritedBlock", &d.inherited_blocks);
            e.links("nestedBlock", &d.nested_blocks);
            e.links("satisfy", &d.satisfies);
            e.links("port", &d.ports);
            e.links("proxyPort", &d.proxy_ports);
            e.links("fullPort", &d.full_ports);
            e.links("partProperty", &d.part_properties);
            e.links("referenceProperty", &d.reference_properties);
            e.links("valueProperty", &d.value_properties);
            e.links("flowProperty", &d.flow_properties);
            e.links("connector", &d.connectors);
        }
        ResourceBody::InterfaceBlock(d) => {
            e.links("inheritedBlock", &d.inherited_blocks);
            e.links("flowProperty", &d.flow_properties);
            e.links("proxyPort", &d.proxy_ports);
        }
        ResourceBody::Requirement(d) => {
            if let Some(id) = &d.identifier {
                e.push(DCTERMS_IDENTIFIER.to_string(), Term::literal(id.clone()));
            }
            e.text("text", &d.text);
            e.links("subRequirement", &d.sub_requirements);
            e.link("master", &d.master);
            e.links("derivedFrom", &d.derived_from);
            e.links("derived", &d.derived);
            e.links("satisfiedBy", &d.satisfied_by);
            e.links("elaboratedBy", &d.elaborated_by);
        }
        ResourceBody::Port(d) => {
            e.flag("isService", d.is_service);
            e.flag("isBehavior", d.is_behavior);
            e.flag("isConjugated", d.is_conjugated);
            e.text("lower", &d.lower);
            e.text("upper", &d.upper);
            e.link("type", &d.type_link);
            e.link("owner", &d.owner);
        }
        ResourceBody::Property(d) => {
            e.text("lower", &d.lower);
            e.text("upper", &d.upper);
            e.link("type", &d.type_link);
            e.link("owner", &d.owner);
        }
        ResourceBody::FlowProperty(d) => {
            e.text("direction", &d.direction.map(|dir| dir.as_str().to_string()));
            e.link("type", &d.type_link);
            e.link("owner", &d.owner);
        }
        ResourceBody::ValueType(d) => {
            e.link("unit", &d.unit);
            e.link("quantityKind", &d.quantity_kind);
        }
        ResourceBody::Connector(d) => {
            e.links("end", &d.ends);
            e.link("owner", &d.owner);
        }
        ResourceBody::ConnectorEnd(d) => {
            e.link("role", &d.role);
            e.link("partWithPort", &d.part_with_port);
            e.link("connector", &d.connector);
            e.text("lower", &d.lower);
            e.text("upper", &d.upper);
        }
        ResourceBody::Package(d) => {
            e.links("block", &d.blocks);
            e.links("requirement", &d.requirements);
        }
        ResourceBody::AssociationBlock(d) => {
            e.links("memberEnd", &d.member_ends);
        }
        ResourceBody::ItemFlow(d) => {
            e.link("informationSource", &d.information_source);
            e.link("informationTarget", &d.information_target);
            e.link("realizingConnector", &d.realizing_connector);
            e.link("itemProperty", &d.item_property);
        }
        ResourceBody::Unit(d) => {
            e.text("symbol", &d.symbol);
        }
        ResourceBody::Plain => {}
    }

    e.out
}

/// Triples of every resource in the graph.
pub fn graph_triples(graph: &ResourceGraph, descriptor: &Descriptor) -> Vec<Triple> {
    graph
        .all_resources()
        .flat_map(|r| resource_triples(r, descriptor))
        .collect()
}
