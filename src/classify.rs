//! Element classification.
//!
//! Stereotype names are compared here and nowhere else: every element is
//! classified once into a [`ResourceKind`] and the rest of the crate matches
//! on the kind.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Aggregation, Metaclass, SourceElement, SourceModel};
use crate::types::ResourceKind;

// ----------------------------------------------------------------------------
// Stereotype and tag names
// ----------------------------------------------------------------------------

pub const BLOCK: &str = "Block";
pub const INTERFACE_BLOCK: &str = "InterfaceBlock";
pub const REQUIREMENT: &str = "Requirement";
pub const PROXY_PORT: &str = "ProxyPort";
pub const FULL_PORT: &str = "FullPort";
pub const FLOW_PROPERTY: &str = "FlowProperty";
pub const PART_PROPERTY: &str = "PartProperty";
pub const REFERENCE_PROPERTY: &str = "ReferenceProperty";
pub const VALUE_PROPERTY: &str = "ValueProperty";
pub const VALUE_TYPE: &str = "ValueType";
pub const ITEM_FLOW: &str = "ItemFlow";
pub const UNIT: &str = "Unit";
pub const QUANTITY_KIND: &str = "QuantityKind";

pub const SATISFY: &str = "Satisfy";
pub const DERIVE_REQT: &str = "DeriveReqt";
pub const COPY: &str = "Copy";
pub const REFINE: &str = "Refine";

pub const REQUIREMENT_ID_TAG: &str = "Id";
pub const REQUIREMENT_TEXT_TAG: &str = "Text";
pub const DIRECTION_TAG: &str = "direction";
pub const UNIT_TAG: &str = "unit";
pub const QUANTITY_KIND_TAG: &str = "quantityKind";
pub const SYMBOL_TAG: &str = "symbol";
pub const ITEM_PROPERTY_TAG: &str = "itemProperty";

pub const BLOCK_DEFINITION_DIAGRAM: &str = "SysML Block Definition Diagram";
pub const INTERNAL_BLOCK_DIAGRAM: &str = "SysML Internal Block Diagram";

/// Returns `true` when the element's primary (first) stereotype is `name`.
pub fn has_stereotype(element: &SourceElement, name: &str) -> bool {
    element
        .stereotypes
        .first()
        .is_some_and(|s| s.name == name)
}

/// Returns `true` when any applied stereotype is `name`.
pub fn carries_stereotype(element: &SourceElement, name: &str) -> bool {
    element.stereotypes.iter().any(|s| s.name == name)
}

/// Port flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    Proxy,
    Full,
    Standard,
}

impl PortKind {
    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            PortKind::Proxy => ResourceKind::ProxyPort,
            PortKind::Full => ResourceKind::FullPort,
            PortKind::Standard => ResourceKind::Port,
        }
    }
}

/// Classifies a port. Proxy wins over Full; no stereotype means Standard.
pub fn port_kind(port: &SourceElement) -> PortKind {
    if carries_stereotype(port, PROXY_PORT) {
        PortKind::Proxy
    } else if carries_stereotype(port, FULL_PORT) {
        PortKind::Full
    } else {
        PortKind::Standard
    }
}

fn class_kind(element: &SourceElement) -> ResourceKind {
    if has_stereotype(element, BLOCK) {
        ResourceKind::Block
    } else if has_stereotype(element, INTERFACE_BLOCK) {
        ResourceKind::InterfaceBlock
    } else if has_stereotype(element, REQUIREMENT) {
        ResourceKind::Requirement
    } else {
        ResourceKind::Unknown
    }
}

fn property_kind(element: &SourceElement, model: &SourceModel) -> ResourceKind {
    if has_stereotype(element, FLOW_PROPERTY) {
        return ResourceKind::FlowProperty;
    }
    if has_stereotype(element, PART_PROPERTY) {
        return ResourceKind::PartProperty;
    }
    if has_stereotype(element, REFERENCE_PROPERTY) {
        return ResourceKind::ReferenceProperty;
    }
    if has_stereotype(element, VALUE_PROPERTY) {
        return ResourceKind::ValueProperty;
    }

    let Some(type_el) = element.type_ref.as_deref().and_then(|id| model.get(id)) else {
        return ResourceKind::Unknown;
    };
    if type_el.metaclass == Metaclass::DataType && has_stereotype(type_el, VALUE_TYPE) {
        return ResourceKind::ValueProperty;
    }
    match class_kind(type_el) {
        ResourceKind::Block | ResourceKind::InterfaceBlock => {
            if element.aggregation == Aggregation::Composite {
                ResourceKind::PartProperty
            } else {
                ResourceKind::ReferenceProperty
            }
        }
        _ => ResourceKind::Unknown,
    }
}

/// Classifies a single element.
pub fn classify(element: &SourceElement, model: &SourceModel) -> ResourceKind {
    match element.metaclass {
        Metaclass::Class => class_kind(element),
        Metaclass::AssociationClass if has_stereotype(element, BLOCK) => {
            ResourceKind::AssociationBlock
        }
        Metaclass::DataType if has_stereotype(element, VALUE_TYPE) => ResourceKind::ValueType,
        Metaclass::Port => port_kind(element).resource_kind(),
        Metaclass::Property => property_kind(element, model),
        Metaclass::Connector => ResourceKind::Connector,
        Metaclass::ConnectorEnd => ResourceKind::ConnectorEnd,
        Metaclass::Package | Metaclass::Model => ResourceKind::Package,
        Metaclass::UseCase => ResourceKind::UseCase,
        Metaclass::InformationFlow => ResourceKind::ItemFlow,
        Metaclass::InstanceSpecification if has_stereotype(element, UNIT) => ResourceKind::Unit,
        Metaclass::InstanceSpecification if has_stereotype(element, QUANTITY_KIND) => {
            ResourceKind::QuantityKind
        }
        Metaclass::Diagram => match element.diagram_type.as_deref() {
            Some(BLOCK_DEFINITION_DIAGRAM) => ResourceKind::BlockDiagram,
            Some(INTERNAL_BLOCK_DIAGRAM) => ResourceKind::InternalBlockDiagram,
            _ => ResourceKind::Unknown,
        },
        _ => ResourceKind::Unknown,
    }
}

/// The classification of every element of a model, computed once per run.
#[derive(Debug, Clone)]
pub struct Classification {
    kinds: Vec<ResourceKind>,
    by_kind: BTreeMap<ResourceKind, Vec<usize>>,
}

impl Classification {
    /// Classifies every element of `model`.
    pub fn of_model(model: &SourceModel) -> Self {
        Self::with_exclusions(model, &[])
    }

    /// Classifies every element, treating packages named in `excluded` and
    /// everything they contain as `Unknown`.
    pub fn with_exclusions(model: &SourceModel, excluded: &[String]) -> Self {
        let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
        let mut kinds = Vec::with_capacity(model.len());
        let mut by_kind: BTreeMap<ResourceKind, Vec<usize>> = BTreeMap::new();

        for (pos, element) in model.elements().iter().enumerate() {
            let kind = if !excluded.is_empty() && inside_excluded(element, model, &excluded) {
                tracing::debug!(element = %element.id, "element inside excluded package");
                ResourceKind::Unknown
            } else {
                classify(element, model)
            };
            kinds.push(kind);
            by_kind.entry(kind).or_default().push(pos);
        }

        Self { kinds, by_kind }
    }

    /// Kind of the element with `id`. Missing elements are `Unknown`.
    pub fn kind_of(&self, model: &SourceModel, id: &str) -> ResourceKind {
        model
            .position(id)
            .map(|pos| self.kinds[pos])
            .unwrap_or(ResourceKind::Unknown)
    }

    /// Positions of elements classified as `kind`, in document order.
    pub fn positions_of(&self, kind: ResourceKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Element count per kind, `Unknown` included.
    pub fn counts(&self) -> BTreeMap<ResourceKind, usize> {
        self.by_kind
            .iter()
            .map(|(kind, positions)| (*kind, positions.len()))
            .collect()
    }
}

fn inside_excluded(element: &SourceElement, model: &SourceModel, excluded: &HashSet<&str>) -> bool {
    let mut current = Some(element);
    while let Some(el) = current {
        if el.metaclass == Metaclass::Package && excluded.contains(el.name.as_str()) {
            return true;
        }
        current = model.owner(el);
    }
    false
}
