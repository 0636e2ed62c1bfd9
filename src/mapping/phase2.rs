//! Phase 2: resolve links against the indices completed by phase 1.
//!
//! Resolution reads the indices only; the resolved bodies are written back
//! once every element has been visited.

use crate::classify::{
    COPY, DERIVE_REQT, ITEM_PROPERTY_TAG, QUANTITY_KIND_TAG, REFINE, SATISFY, UNIT_TAG,
};
use crate::context::RunContext;
use crate::errors::Result;
use crate::identity::identity_for;
use crate::index::index_key;
use crate::model::SourceElement;
use crate::resolution::LinkResolver;
use crate::types::*;

const FLOW_END_KINDS: [ResourceKind; 4] = [
    ResourceKind::PartProperty,
    ResourceKind::ProxyPort,
    ResourceKind::FullPort,
    ResourceKind::Port,
];

const ROLE_KINDS: [ResourceKind; 6] = [
    ResourceKind::Port,
    ResourceKind::ProxyPort,
    ResourceKind::FullPort,
    ResourceKind::PartProperty,
    ResourceKind::ReferenceProperty,
    ResourceKind::ValueProperty,
];

const MEMBER_END_KINDS: [ResourceKind; 3] = [
    ResourceKind::ReferenceProperty,
    ResourceKind::PartProperty,
    ResourceKind::ValueProperty,
];

pub(crate) fn run(ctx: &mut RunContext<'_>) -> Result<()> {
    let mut updates: Vec<(ResourceKind, String, ResourceBody)> = Vec::new();

    let counts = {
        let resolver = ctx.resolver();
        for kind in ResourceKind::INDEXED {
            for &pos in ctx.classification.positions_of(kind) {
                let element = ctx.model.element_at(pos);
                let key = index_key(&ctx.scope, kind, &identity_for(kind, element, ctx.model));
                let Some(resource) = ctx.indices.lookup(kind, &key) else {
                    continue;
                };
                if resource.source_id != element.id {
                    tracing::debug!(
                        element = %element.id,
                        key = %key,
                        winner = %resource.source_id,
                        "element displaced by collision, links not written"
                    );
                    continue;
                }
                let mut body = resource.body.clone();
                resolve_body(&resolver, element, &mut body);
                updates.push((kind, key, body));
            }
        }
        resolver.counts()
    };

    for (kind, key, body) in updates {
        if let Some(resource) = ctx.indices.get_mut(kind).and_then(|index| index.get_mut(&key)) {
            resource.body = body;
        }
    }

    ctx.stats.links_resolved += counts.resolved;
    ctx.stats.links_omitted += counts.omitted;
    ctx.stats.links_unknown += counts.unknown;
    Ok(())
}

fn first_link<F>(ids: &[String], resolve: F) -> Option<Link>
where
    F: Fn(&str) -> Option<Link>,
{
    ids.first().and_then(|id| resolve(id.as_str()))
}

fn owner_link(resolver: &LinkResolver<'_>, element: &SourceElement) -> Option<Link> {
    element
        .owner
        .as_deref()
        .and_then(|id| resolver.link_classified(id))
}

fn type_link(resolver: &LinkResolver<'_>, element: &SourceElement) -> Option<Link> {
    element
        .type_ref
        .as_deref()
        .and_then(|id| resolver.link_classified(id))
}

fn tag_link(
    resolver: &LinkResolver<'_>,
    element: &SourceElement,
    tag: &str,
    kinds: &[ResourceKind],
) -> Option<Link> {
    element
        .tag(tag)
        .and_then(|v| v.as_element())
        .and_then(|id| resolver.link_as(id, kinds))
}

/// Fills the link fields of `body`. Attribute fields are left untouched.
fn resolve_body(resolver: &LinkResolver<'_>, element: &SourceElement, body: &mut ResourceBody) {
    match body {
        ResourceBody::Block(data) => {
            data.inherited_blocks = attach(
                element
                    .general
                    .iter()
                    .filter_map(|id| resolver.link_as(id, &[ResourceKind::Block]))
                    .collect(),
            );
            data.nested_blocks = attach(resolver.children_links(element, ResourceKind::Block));
            data.satisfies = attach(resolver.directed_links(element, true, SATISFY));
            data.ports = attach(resolver.children_links(element, ResourceKind::Port));
            data.proxy_ports = attach(resolver.children_links(element, ResourceKind::ProxyPort));
            data.full_ports = attach(resolver.children_links(element, ResourceKind::FullPort));
            data.part_properties =
                attach(resolver.children_links(element, ResourceKind::PartProperty));
            data.reference_properties =
                attach(resolver.children_links(element, ResourceKind::ReferenceProperty));
            data.value_properties =
                attach(resolver.children_links(element, ResourceKind::ValueProperty));
            data.flow_properties =
                attach(resolver.children_links(element, ResourceKind::FlowProperty));
            data.connectors = attach(resolver.children_links(element, ResourceKind::Connector));
        }
        ResourceBody::InterfaceBlock(data) => {
            data.inherited_blocks = attach(
                element
                    .general
                    .iter()
                    .filter_map(|id| {
                        resolver.link_as(id, &[ResourceKind::InterfaceBlock, ResourceKind::Block])
                    })
                    .collect(),
            );
            data.flow_properties =
                attach(resolver.children_links(element, ResourceKind::FlowProperty));
            data.proxy_ports = attach(resolver.children_links(element, ResourceKind::ProxyPort));
        }
        ResourceBody::Requirement(data) => {
            data.sub_requirements =
                attach(resolver.children_links(element, ResourceKind::Requirement));
            data.master = resolver
                .directed_links(element, true, COPY)
                .into_iter()
                .next();
            data.derived_from = attach(resolver.directed_links(element, true, DERIVE_REQT));
            data.derived = attach(resolver.directed_links(element, false, DERIVE_REQT));
            data.satisfied_by = attach(resolver.directed_links(element, false, SATISFY));
            data.elaborated_by = attach(resolver.directed_links(element, false, REFINE));
        }
        ResourceBody::Port(data) => {
            data.type_link = type_link(resolver, element);
            data.owner = owner_link(resolver, element);
        }
        ResourceBody::Property(data) => {
            data.type_link = type_link(resolver, element);
            data.owner = owner_link(resolver, element);
        }
        ResourceBody::FlowProperty(data) => {
            data.type_link = type_link(resolver, element);
            data.owner = owner_link(resolver, element);
        }
        ResourceBody::ValueType(data) => {
            data.unit = tag_link(resolver, element, UNIT_TAG, &[ResourceKind::Unit]);
            data.quantity_kind = tag_link(
                resolver,
                element,
                QUANTITY_KIND_TAG,
                &[ResourceKind::QuantityKind],
            );
        }
        ResourceBody::Connector(data) => {
            data.ends = attach(resolver.children_links(element, ResourceKind::ConnectorEnd));
            data.owner = owner_link(resolver, element);
        }
        ResourceBody::ConnectorEnd(data) => {
            data.role = element
                .role
                .as_deref()
                .and_then(|id| resolver.link_or_unknown(id, &ROLE_KINDS));
            data.part_with_port = element
                .part_with_port
                .as_deref()
                .and_then(|id| resolver.link_as(id, &[ResourceKind::PartProperty]));
            data.connector = element
                .owner
                .as_deref()
                .and_then(|id| resolver.link_as(id, &[ResourceKind::Connector]));
        }
        ResourceBody::Package(data) => {
            data.blocks = attach(resolver.children_links(element, ResourceKind::Block));
            data.requirements = attach(resolver.children_links(element, ResourceKind::Requirement));
        }
        ResourceBody::AssociationBlock(data) => {
            data.member_ends = attach(
                element
                    .member_ends
                    .iter()
                    .filter_map(|id| resolver.link_or_unknown(id, &MEMBER_END_KINDS))
                    .collect(),
            );
        }
        ResourceBody::ItemFlow(data) => {
            data.information_source = first_link(&element.information_sources, |id| {
                resolver.link_or_unknown(id, &FLOW_END_KINDS)
            });
            data.information_target = first_link(&element.information_targets, |id| {
                resolver.link_or_unknown(id, &FLOW_END_KINDS)
            });
            data.realizing_connector = first_link(&element.realizing_connectors, |id| {
                resolver.link_as(id, &[ResourceKind::Connector])
            });
            data.item_property = element
                .tag(ITEM_PROPERTY_TAG)
                .and_then(|v| v.as_element())
                .and_then(|id| resolver.link_as(id, &[ResourceKind::FlowProperty]));
        }
        ResourceBody::Unit(_) | ResourceBody::Plain => {}
    }
}
