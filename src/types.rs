use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of resources in the mapped graph.
///
/// Each kind owns an index and a URL segment, except `Unknown`, which only
/// exists as a fallback segment for links whose target could not be
/// classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Block,
    InterfaceBlock,
    Requirement,
    Port,
    ProxyPort,
    FullPort,
    PartProperty,
    ReferenceProperty,
    ValueProperty,
    ValueType,
    FlowProperty,
    Connector,
    ConnectorEnd,
    Package,
    AssociationBlock,
    ItemFlow,
    BlockDiagram,
    InternalBlockDiagram,
    Unit,
    QuantityKind,
    UseCase,
    Unknown,
}

#[allow(clippy::should_implement_trait)]
impl ResourceKind {
    /// Every kind that owns an index, in mapping order.
    pub const INDEXED: [ResourceKind; 21] = [
        ResourceKind::Package,
        ResourceKind::Requirement,
        ResourceKind::Block,
        ResourceKind::InterfaceBlock,
        ResourceKind::AssociationBlock,
        ResourceKind::ValueType,
        ResourceKind::Unit,
        ResourceKind::QuantityKind,
        ResourceKind::UseCase,
        ResourceKind::Port,
        ResourceKind::ProxyPort,
        ResourceKind::FullPort,
        ResourceKind::PartProperty,
        ResourceKind::ReferenceProperty,
        ResourceKind::ValueProperty,
        ResourceKind::FlowProperty,
        ResourceKind::Connector,
        ResourceKind::ConnectorEnd,
        ResourceKind::ItemFlow,
        ResourceKind::BlockDiagram,
        ResourceKind::InternalBlockDiagram,
    ];

    /// Returns the URL segment of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Block => "blocks",
            ResourceKind::InterfaceBlock => "interfaceblocks",
            ResourceKind::Requirement => "requirements",
            ResourceKind::Port => "ports",
            ResourceKind::ProxyPort => "proxyports",
            ResourceKind::FullPort => "fullports",
            ResourceKind::PartProperty => "partproperties",
            ResourceKind::ReferenceProperty => "referenceproperties",
            ResourceKind::ValueProperty => "valueproperties",
            ResourceKind::ValueType => "valuetypes",
            ResourceKind::FlowProperty => "flowproperties",
            ResourceKind::Connector => "connectors",
            ResourceKind::ConnectorEnd => "connectorends",
            ResourceKind::Package => "packages",
            ResourceKind::AssociationBlock => "associationblocks",
            ResourceKind::ItemFlow => "itemflows",
            ResourceKind::BlockDiagram => "blockdiagrams",
            ResourceKind::InternalBlockDiagram => "internalblockdiagrams",
            ResourceKind::Unit => "units",
            ResourceKind::QuantityKind => "quantitykinds",
            ResourceKind::UseCase => "usecases",
            ResourceKind::Unknown => "unknown",
        }
    }

    /// Parses a URL segment into a `ResourceKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<ResourceKind> {
        match s {
            "blocks" => Some(ResourceKind::Block),
            "interfaceblocks" => Some(ResourceKind::InterfaceBlock),
            "requirements" => Some(ResourceKind::Requirement),
            "ports" => Some(ResourceKind::Port),
            "proxyports" => Some(ResourceKind::ProxyPort),
            "fullports" => Some(ResourceKind::FullPort),
            "partproperties" => Some(ResourceKind::PartProperty),
            "referenceproperties" => Some(ResourceKind::ReferenceProperty),
            "valueproperties" => Some(ResourceKind::ValueProperty),
            "valuetypes" => Some(ResourceKind::ValueType),
            "flowproperties" => Some(ResourceKind::FlowProperty),
            "connectors" => Some(ResourceKind::Connector),
            "connectorends" => Some(ResourceKind::ConnectorEnd),
            "packages" => Some(ResourceKind::Package),
            "associationblocks" => Some(ResourceKind::AssociationBlock),
            "itemflows" => Some(ResourceKind::ItemFlow),
            "blockdiagrams" => Some(ResourceKind::BlockDiagram),
            "internalblockdiagrams" => Some(ResourceKind::InternalBlockDiagram),
            "units" => Some(ResourceKind::Unit),
            "quantitykinds" => Some(ResourceKind::QuantityKind),
            "usecases" => Some(ResourceKind::UseCase),
            "unknown" => Some(ResourceKind::Unknown),
            _ => None,
        }
    }

    /// Local name of the RDF class resources of this kind are typed with.
    pub fn rdf_class(&self) -> &'static str {
        match self {
            ResourceKind::Block => "Block",
            ResourceKind::InterfaceBlock => "InterfaceBlock",
            ResourceKind::Requirement => "Requirement",
            ResourceKind::Port => "Port",
            ResourceKind::ProxyPort => "ProxyPort",
            ResourceKind::FullPort => "FullPort",
            ResourceKind::PartProperty => "PartProperty",
            ResourceKind::ReferenceProperty => "ReferenceProperty",
            ResourceKind::ValueProperty => "ValueProperty",
            ResourceKind::ValueType => "ValueType",
            ResourceKind::FlowProperty => "FlowProperty",
            ResourceKind::Connector => "Connector",
            ResourceKind::ConnectorEnd => "ConnectorEnd",
            ResourceKind::Package => "Package",
            ResourceKind::AssociationBlock => "AssociationBlock",
            ResourceKind::ItemFlow => "ItemFlow",
            ResourceKind::BlockDiagram => "BlockDiagram",
            ResourceKind::InternalBlockDiagram => "InternalBlockDiagram",
            ResourceKind::Unit => "Unit",
            ResourceKind::QuantityKind => "QuantityKind",
            ResourceKind::UseCase => "UseCase",
            ResourceKind::Unknown => "Unknown",
        }
    }

    /// Returns `true` for the three port kinds.
    pub fn is_port(&self) -> bool {
        matches!(
            self,
            ResourceKind::Port | ResourceKind::ProxyPort | ResourceKind::FullPort
        )
    }

    /// Returns `true` for part, reference, and value properties.
    pub fn is_structural_property(&self) -> bool {
        matches!(
            self,
            ResourceKind::PartProperty
                | ResourceKind::ReferenceProperty
                | ResourceKind::ValueProperty
        )
    }
}

/// A directed reference to another resource's address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Link(String);

impl Link {
    pub fn new(address: impl Into<String>) -> Self {
        Link(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wraps a link list so that an empty list is never attached to a resource.
pub fn attach(links: Vec<Link>) -> Option<Vec<Link>> {
    if links.is_empty() {
        None
    } else {
        Some(links)
    }
}

/// Whether a resource received an address.
///
/// Only elements with a non-empty name are addressed; unnamed elements are
/// still indexed but stay `Unaddressed`, and nothing links to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "addressing", rename_all = "snake_case")]
pub enum Addressing {
    Addressed { about: String, name: String },
    Unaddressed,
}

/// Flow direction of a flow property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    In,
    Out,
    InOut,
}

#[allow(clippy::should_implement_trait)]
impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDirection::In => "in",
            FlowDirection::Out => "out",
            FlowDirection::InOut => "inout",
        }
    }

    pub fn from_str(s: &str) -> Option<FlowDirection> {
        match s {
            "in" => Some(FlowDirection::In),
            "out" => Some(FlowDirection::Out),
            "inout" => Some(FlowDirection::InOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_blocks: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_blocks: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfies: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_ports: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_ports: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_properties: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_properties: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_properties: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_properties: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectors: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceBlockData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_blocks: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_properties: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_ports: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_requirements: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfied_by: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elaborated_by: Option<Vec<Link>>,
}

/// Attributes shared by standard, proxy, and full ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortData {
    pub is_service: bool,
    pub is_behavior: bool,
    pub is_conjugated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Link>,
}

/// Attributes shared by part, reference, and value properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowPropertyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlowDirection>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueTypeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_kind: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorEndData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_with_port: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationBlockData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ends: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFlowData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_source: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_target: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realizing_connector: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_property: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Kind-specific attributes and links of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceBody {
    Block(BlockData),
    InterfaceBlock(InterfaceBlockData),
    Requirement(RequirementData),
    Port(PortData),
    Property(PropertyData),
    FlowProperty(FlowPropertyData),
    ValueType(ValueTypeData),
    Connector(ConnectorData),
    ConnectorEnd(ConnectorEndData),
    Package(PackageData),
    AssociationBlock(AssociationBlockData),
    ItemFlow(ItemFlowData),
    Unit(UnitData),
    /// Diagrams, quantity kinds, and use cases carry nothing beyond a name.
    Plain,
}

impl ResourceBody {
    /// Returns an empty body of the right shape for `kind`.
    pub fn empty_for(kind: ResourceKind) -> ResourceBody {
        match kind {
            ResourceKind::Block => ResourceBody::Block(BlockData::default()),
            ResourceKind::InterfaceBlock => {
                ResourceBody::InterfaceBlock(InterfaceBlockData::default())
            }
            ResourceKind::Requirement => ResourceBody::Requirement(RequirementData::default()),
            ResourceKind::Port | ResourceKind::ProxyPort | ResourceKind::FullPort => {
                ResourceBody::Port(PortData::default())
            }
            ResourceKind::PartProperty
            | ResourceKind::ReferenceProperty
            | ResourceKind::ValueProperty => ResourceBody::Property(PropertyData::default()),
            ResourceKind::FlowProperty => ResourceBody::FlowProperty(FlowPropertyData::default()),
            ResourceKind::ValueType => ResourceBody::ValueType(ValueTypeData::default()),
            ResourceKind::Connector => ResourceBody::Connector(ConnectorData::default()),
            ResourceKind::ConnectorEnd => ResourceBody::ConnectorEnd(ConnectorEndData::default()),
            ResourceKind::Package => ResourceBody::Package(PackageData::default()),
            ResourceKind::AssociationBlock => {
                ResourceBody::AssociationBlock(AssociationBlockData::default())
            }
            ResourceKind::ItemFlow => ResourceBody::ItemFlow(ItemFlowData::default()),
            ResourceKind::Unit => ResourceBody::Unit(UnitData::default()),
            ResourceKind::BlockDiagram
            | ResourceKind::InternalBlockDiagram
            | ResourceKind::QuantityKind
            | ResourceKind::UseCase
            | ResourceKind::Unknown => ResourceBody::Plain,
        }
    }
}

/// The mapped output for one source element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    /// Key identity within the kind's index.
    pub identity: String,
    /// Opaque id of the source element this resource was created from.
    pub source_id: String,
    #[serde(flatten)]
    pub addressing: Addressing,
    pub body: ResourceBody,
}

impl Resource {
    /// Returns the resource address, if it has one.
    pub fn about(&self) -> Option<&str> {
        match &self.addressing {
            Addressing::Addressed { about, .. } => Some(about),
            Addressing::Unaddressed => None,
        }
    }

    /// Returns the display name, if the resource is addressed.
    pub fn name(&self) -> Option<&str> {
        match &self.addressing {
            Addressing::Addressed { name, .. } => Some(name),
            Addressing::Unaddressed => None,
        }
    }

    /// Builds a link pointing at this resource. Unaddressed resources cannot
    /// be linked to.
    pub fn link(&self) -> Option<Link> {
        self.about().map(Link::new)
    }
}

/// Counters describing one transformation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingStats {
    pub resources_by_kind: BTreeMap<String, usize>,
    pub links_resolved: usize,
    pub links_omitted: usize,
    pub links_unknown: usize,
    pub skipped_elements: usize,
    pub collisions: usize,
    pub duration_ms: u64,
}

impl MappingStats {
    /// Total number of resources across every kind.
    pub fn resource_count(&self) -> usize {
        self.resources_by_kind.values().sum()
    }
}

/// Output format for rendered graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Triples,
}

#[allow(clippy::should_implement_trait)]
impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Triples => "triples",
        }
    }

    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s {
            "json" => Some(OutputFormat::Json),
            "triples" => Some(OutputFormat::Triples),
            _ => None,
        }
    }

    /// MIME type sent with HTTP uploads.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Triples => "application/x-ndjson",
        }
    }
}
