//! Phase 1: create and index a resource for every classified element.

use crate::classify::{DIRECTION_TAG, REQUIREMENT_TEXT_TAG, SYMBOL_TAG};
use crate::context::RunContext;
use crate::errors::{Result, SysGraphError};
use crate::factory::ResourceFactory;
use crate::identity::requirement_id;
use crate::model::{Multiplicity, SourceElement};
use crate::types::*;

pub(crate) fn run(ctx: &mut RunContext<'_>) -> Result<()> {
    let factory = ResourceFactory::new(&ctx.descriptor, &ctx.scope, ctx.model);

    for kind in ResourceKind::INDEXED {
        for &pos in ctx.classification.positions_of(kind) {
            let element = ctx.model.element_at(pos);
            let body = initial_body(kind, element);
            match factory.create(kind, element, body, &mut ctx.indices, ctx.policy) {
                Ok(created) => {
                    if let Some(collision) = created.collision {
                        tracing::warn!(
                            kind = kind.as_str(),
                            key = %collision.key,
                            kept = %collision.kept,
                            discarded = %collision.discarded,
                            "identity collision"
                        );
                        ctx.stats.collisions += 1;
                        ctx.collisions.push(collision);
                    }
                }
                Err(SysGraphError::Address { message, address }) => {
                    tracing::warn!(
                        element = %element.id,
                        kind = kind.as_str(),
                        address = %address,
                        "skipping element: {}",
                        message
                    );
                    ctx.stats.skipped_elements += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    for (kind, index) in ctx.indices.iter() {
        if !index.is_empty() {
            ctx.stats
                .resources_by_kind
                .insert(kind.as_str().to_string(), index.len());
        }
    }
    Ok(())
}

fn bounds(multiplicity: Option<Multiplicity>) -> (Option<String>, Option<String>) {
    match multiplicity {
        Some(m) => (Some(m.lower.to_string()), Some(m.upper.to_string())),
        None => (None, None),
    }
}

/// Body with every attribute that does not depend on another resource.
fn initial_body(kind: ResourceKind, element: &SourceElement) -> ResourceBody {
    let (lower, upper) = bounds(element.multiplicity);
    match ResourceBody::empty_for(kind) {
        ResourceBody::Requirement(_) => ResourceBody::Requirement(RequirementData {
            identifier: requirement_id(element),
            text: element
                .tag(REQUIREMENT_TEXT_TAG)
                .and_then(|v| v.as_text()),
            ..RequirementData::default()
        }),
        ResourceBody::Port(_) => ResourceBody::Port(PortData {
            is_service: element.is_service,
            is_behavior: element.is_behavior,
            is_conjugated: element.is_conjugated,
            lower,
            upper,
            ..PortData::default()
        }),
        ResourceBody::Property(_) => ResourceBody::Property(PropertyData {
            lower,
            upper,
            ..PropertyData::default()
        }),
        ResourceBody::FlowProperty(_) => ResourceBody::FlowProperty(FlowPropertyData {
            direction: element
                .tag(DIRECTION_TAG)
                .and_then(|v| v.as_text())
                .and_then(|d| FlowDirection::from_str(&d)),
            ..FlowPropertyData::default()
        }),
        ResourceBody::ConnectorEnd(_) => ResourceBody::ConnectorEnd(ConnectorEndData {
            lower,
            upper,
            ..ConnectorEndData::default()
        }),
        ResourceBody::Unit(_) => ResourceBody::Unit(UnitData {
            symbol: element.tag(SYMBOL_TAG).and_then(|v| v.as_text()),
        }),
        body => body,
    }
}
