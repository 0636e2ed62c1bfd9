//! The source design model consumed by the mapper.
//!
//! Loading the proprietary model files is somebody else's job; this module
//! defines the queryable arena the mapper walks and a JSON interchange
//! document any exporter can produce.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SysGraphError};

/// Separator used when qualified names are derived from the containment chain.
pub const QUALIFIED_NAME_SEPARATOR: &str = "::";

/// UML metaclass of a source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metaclass {
    Model,
    Package,
    Class,
    AssociationClass,
    DataType,
    Port,
    Property,
    Connector,
    ConnectorEnd,
    InformationFlow,
    InstanceSpecification,
    UseCase,
    Diagram,
    Other,
}

/// Aggregation of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    None,
    Shared,
    Composite,
}

/// A typed tag value carried by an applied stereotype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    EnumLiteral(String),
    /// Reference to another element by id.
    Element(String),
}

impl TagValue {
    /// Textual rendering of scalar tag values. Element references yield `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            TagValue::String(s) | TagValue::EnumLiteral(s) => Some(s.clone()),
            TagValue::Boolean(b) => Some(b.to_string()),
            TagValue::Integer(i) => Some(i.to_string()),
            TagValue::Element(_) => None,
        }
    }

    /// The referenced element id, for element tag values.
    pub fn as_element(&self) -> Option<&str> {
        match self {
            TagValue::Element(id) => Some(id),
            _ => None,
        }
    }
}

/// A stereotype applied to an element, with its tag values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedStereotype {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<TagValue>>,
}

impl AppliedStereotype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
        }
    }

    /// First value of the named tag.
    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name).and_then(|values| values.first())
    }
}

/// Multiplicity bounds. An upper bound of `-1` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    pub lower: i64,
    pub upper: i64,
}

/// One node of the design model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceElement {
    pub id: String,
    pub metaclass: Metaclass,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stereotypes: Vec<AppliedStereotype>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub is_service: bool,
    #[serde(default)]
    pub is_behavior: bool,
    #[serde(default)]
    pub is_conjugated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_with_port: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_ends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub information_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub information_targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub realizing_connectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_type: Option<String>,
}

impl SourceElement {
    pub fn new(id: impl Into<String>, metaclass: Metaclass, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metaclass,
            name: name.into(),
            qualified_name: None,
            owner: None,
            stereotypes: Vec::new(),
            general: Vec::new(),
            type_ref: None,
            multiplicity: None,
            aggregation: Aggregation::None,
            is_service: false,
            is_behavior: false,
            is_conjugated: false,
            role: None,
            part_with_port: None,
            member_ends: Vec::new(),
            information_sources: Vec::new(),
            information_targets: Vec::new(),
            realizing_connectors: Vec::new(),
            diagram_type: None,
        }
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn qualified(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = Some(qualified_name.into());
        self
    }

    pub fn stereotyped(mut self, name: impl Into<String>) -> Self {
        self.stereotypes.push(AppliedStereotype::new(name));
        self
    }

    /// Adds a tag value to the most recently applied stereotype.
    ///
    /// Does nothing when no stereotype has been applied yet.
    pub fn with_tag(mut self, tag: impl Into<String>, value: TagValue) -> Self {
        if let Some(stereotype) = self.stereotypes.last_mut() {
            stereotype.tags.entry(tag.into()).or_default().push(value);
        }
        self
    }

    pub fn with_general(mut self, general: impl Into<String>) -> Self {
        self.general.push(general.into());
        self
    }

    pub fn typed_by(mut self, type_id: impl Into<String>) -> Self {
        self.type_ref = Some(type_id.into());
        self
    }

    pub fn with_multiplicity(mut self, lower: i64, upper: i64) -> Self {
        self.multiplicity = Some(Multiplicity { lower, upper });
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_part_with_port(mut self, part: impl Into<String>) -> Self {
        self.part_with_port = Some(part.into());
        self
    }

    pub fn with_member_end(mut self, end: impl Into<String>) -> Self {
        self.member_ends.push(end.into());
        self
    }

    pub fn with_flow(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.information_sources.push(source.into());
        self.information_targets.push(target.into());
        self
    }

    pub fn realized_by(mut self, connector: impl Into<String>) -> Self {
        self.realizing_connectors.push(connector.into());
        self
    }

    pub fn with_diagram_type(mut self, diagram_type: impl Into<String>) -> Self {
        self.diagram_type = Some(diagram_type.into());
        self
    }

    /// First value of `tag` on the first applied stereotype that carries it.
    pub fn tag(&self, tag: &str) -> Option<&TagValue> {
        self.stereotypes.iter().find_map(|s| s.tag(tag))
    }
}

/// A directed relationship such as Satisfy or DeriveReqt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectedRelationship {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl DirectedRelationship {
    pub fn new(
        id: impl Into<String>,
        stereotype: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            stereotype: Some(stereotype.into()),
            sources: vec![source.into()],
            targets: vec![target.into()],
        }
    }
}

/// JSON interchange document for a whole model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub elements: Vec<SourceElement>,
    #[serde(default)]
    pub relationships: Vec<DirectedRelationship>,
}

/// Read-only arena over the elements and relationships of one model.
#[derive(Debug, Clone)]
pub struct SourceModel {
    elements: Vec<SourceElement>,
    relationships: Vec<DirectedRelationship>,
    positions: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl SourceModel {
    /// Builds the arena.
    ///
    /// Fails with `SysGraphError::Model` on duplicate element ids or a
    /// containment cycle. Dangling owner and feature references are kept.
    pub fn new(
        mut elements: Vec<SourceElement>,
        relationships: Vec<DirectedRelationship>,
    ) -> Result<Self> {
        let mut positions = HashMap::with_capacity(elements.len());
        for (pos, element) in elements.iter().enumerate() {
            if positions.insert(element.id.clone(), pos).is_some() {
                return Err(SysGraphError::Model {
                    message: format!("duplicate element id '{}'", element.id),
                });
            }
        }

        for element in &elements {
            let mut seen = HashSet::new();
            seen.insert(element.id.as_str());
            let mut current = element.owner.as_deref();
            while let Some(owner_id) = current {
                if !seen.insert(owner_id) {
                    return Err(SysGraphError::Model {
                        message: format!("containment cycle through element '{}'", element.id),
                    });
                }
                current = positions
                    .get(owner_id)
                    .and_then(|&pos| elements[pos].owner.as_deref());
            }
        }

        let derived: Vec<Option<String>> = elements
            .iter()
            .map(|el| {
                if el.name.is_empty() || el.qualified_name.is_some() {
                    None
                } else {
                    Some(derive_qualified_name(el, &elements, &positions))
                }
            })
            .collect();
        for (element, qualified) in elements.iter_mut().zip(derived) {
            if qualified.is_some() {
                element.qualified_name = qualified;
            }
        }

        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, element) in elements.iter().enumerate() {
            if let Some(owner) = &element.owner {
                children.entry(owner.clone()).or_default().push(pos);
            }
        }

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, rel) in relationships.iter().enumerate() {
            for source in &rel.sources {
                outgoing.entry(source.clone()).or_default().push(pos);
            }
            for target in &rel.targets {
                incoming.entry(target.clone()).or_default().push(pos);
            }
        }

        Ok(Self {
            elements,
            relationships,
            positions,
            children,
            outgoing,
            incoming,
        })
    }

    /// Builds a model from a [`ModelDocument`].
    pub fn from_document(doc: ModelDocument) -> Result<Self> {
        Self::new(doc.elements, doc.relationships)
    }

    /// Parses a JSON model document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Reads and parses a JSON model document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SysGraphError::Model {
            message: format!("failed to read model file '{}': {}", path.display(), e),
        })?;
        let doc: ModelDocument =
            serde_json::from_str(&contents).map_err(|e| SysGraphError::Model {
                message: format!("failed to parse model file '{}': {}", path.display(), e),
            })?;
        Self::from_document(doc)
    }

    pub fn get(&self, id: &str) -> Option<&SourceElement> {
        self.positions.get(id).map(move |&pos| &self.elements[pos])
    }

    /// Document position of the element with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn element_at(&self, pos: usize) -> &SourceElement {
        &self.elements[pos]
    }

    pub fn elements(&self) -> &[SourceElement] {
        &self.elements
    }

    pub fn relationships(&self) -> &[DirectedRelationship] {
        &self.relationships
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Owned elements of `id`, in document order.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &SourceElement> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.elements[pos])
    }

    /// Relationships that have `id` among their sources.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &DirectedRelationship> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.relationships[pos])
    }

    /// Relationships that have `id` among their targets.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &DirectedRelationship> {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.relationships[pos])
    }

    pub fn owner(&self, element: &SourceElement) -> Option<&SourceElement> {
        element.owner.as_deref().and_then(|id| self.get(id))
    }
}

// ----------------------------------------------------------------------------
// Qualified-name derivation
// ----------------------------------------------------------------------------

/// Joins the names of the containment chain. The chain stops at the model
/// root, at an unnamed or missing owner, or at an owner with an explicit
/// qualified name (which is used as the prefix).
fn derive_qualified_name(
    element: &SourceElement,
    elements: &[SourceElement],
    positions: &HashMap<String, usize>,
) -> String {
    let mut parts = vec![element.name.as_str()];
    let mut current = element.owner.as_deref();
    while let Some(owner_id) = current {
        let Some(&pos) = positions.get(owner_id) else {
            break;
        };
        let owner = &elements[pos];
        if owner.metaclass == Metaclass::Model || owner.name.is_empty() {
            break;
        }
        if let Some(qualified) = &owner.qualified_name {
            parts.push(qualified.as_str());
            break;
        }
        parts.push(owner.name.as_str());
        current = owner.owner.as_deref();
    }
    parts.reverse();
    parts.join(QUALIFIED_NAME_SEPARATOR)
}
