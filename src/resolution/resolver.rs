use std::cell::Cell;

use crate::classify::Classification;
use crate::descriptor::Descriptor;
use crate::identity::{identity, identity_for};
use crate::index::{index_key, Indices};
use crate::model::{SourceElement, SourceModel};
use crate::types::{Link, ResourceKind};

/// Kinds a directed relationship end may resolve to.
const RELATIONSHIP_END_KINDS: [ResourceKind; 3] = [
    ResourceKind::Block,
    ResourceKind::Requirement,
    ResourceKind::UseCase,
];

/// Tally of link resolution outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionCounts {
    pub resolved: usize,
    pub omitted: usize,
    pub unknown: usize,
}

/// Turns element references into links against the completed indices.
///
/// The resolver only reads. Targets that are missing from the model, missing
/// from their index, or unaddressed are omitted; targets that cannot be
/// classified get a link under the `unknown` segment where the caller asks
/// for it.
pub struct LinkResolver<'a> {
    model: &'a SourceModel,
    classification: &'a Classification,
    descriptor: &'a Descriptor,
    scope: &'a str,
    indices: &'a Indices,
    resolved: Cell<usize>,
    omitted: Cell<usize>,
    unknown: Cell<usize>,
}

impl<'a> LinkResolver<'a> {
    pub fn new(
        model: &'a SourceModel,
        classification: &'a Classification,
        descriptor: &'a Descriptor,
        scope: &'a str,
        indices: &'a Indices,
    ) -> Self {
        Self {
            model,
            classification,
            descriptor,
            scope,
            indices,
            resolved: Cell::new(0),
            omitted: Cell::new(0),
            unknown: Cell::new(0),
        }
    }

    pub fn counts(&self) -> ResolutionCounts {
        ResolutionCounts {
            resolved: self.resolved.get(),
            omitted: self.omitted.get(),
            unknown: self.unknown.get(),
        }
    }

    /// Link to the element `id` as a resource of `kind`.
    pub fn link_to(&self, kind: ResourceKind, id: &str) -> Option<Link> {
        let Some(element) = self.model.get(id) else {
            tracing::debug!(target_id = id, kind = kind.as_str(), "link target not in model");
            return self.omit();
        };
        let key = index_key(self.scope, kind, &identity_for(kind, element, self.model));
        match self.indices.lookup(kind, &key).and_then(|r| r.link()) {
            Some(link) => {
                self.resolved.set(self.resolved.get() + 1);
                Some(link)
            }
            None => {
                tracing::debug!(key = %key, "link target unindexed or unaddressed");
                self.omit()
            }
        }
    }

    /// Link to `id` using whatever kind it was classified as.
    pub fn link_classified(&self, id: &str) -> Option<Link> {
        match self.classification.kind_of(self.model, id) {
            ResourceKind::Unknown => {
                tracing::debug!(target_id = id, "link target not classified");
                self.omit()
            }
            kind => self.link_to(kind, id),
        }
    }

    /// Link to `id` only when it was classified as one of `kinds`.
    pub fn link_as(&self, id: &str, kinds: &[ResourceKind]) -> Option<Link> {
        let kind = self.classification.kind_of(self.model, id);
        if kinds.contains(&kind) {
            self.link_to(kind, id)
        } else {
            tracing::debug!(target_id = id, kind = kind.as_str(), "link target of unexpected kind");
            self.omit()
        }
    }

    /// Like [`link_as`](Self::link_as), but targets of any other kind link
    /// under the `unknown` segment instead of being dropped.
    pub fn link_or_unknown(&self, id: &str, kinds: &[ResourceKind]) -> Option<Link> {
        let kind = self.classification.kind_of(self.model, id);
        if kinds.contains(&kind) {
            self.link_to(kind, id)
        } else {
            self.unknown_link(id)
        }
    }

    /// Link under the `unknown` segment. Elements missing from the model
    /// cannot be addressed at all and are omitted.
    pub fn unknown_link(&self, id: &str) -> Option<Link> {
        let Some(element) = self.model.get(id) else {
            return self.omit();
        };
        let id_part = format!("{}{}", self.scope, identity(element));
        match self
            .descriptor
            .resource(ResourceKind::Unknown.as_str(), &id_part)
        {
            Ok(address) => {
                self.unknown.set(self.unknown.get() + 1);
                Some(Link::new(address))
            }
            Err(e) => {
                tracing::debug!(target_id = id, error = %e, "unknown link not addressable");
                self.omit()
            }
        }
    }

    /// Links to the owned elements of `owner` classified as `kind`.
    pub fn children_links(&self, owner: &SourceElement, kind: ResourceKind) -> Vec<Link> {
        self.model
            .children(&owner.id)
            .filter(|child| self.classification.kind_of(self.model, &child.id) == kind)
            .filter_map(|child| self.link_to(kind, &child.id))
            .collect()
    }

    /// Links to the other ends of the element's directed relationships with
    /// the given stereotype.
    ///
    /// With `as_source` the element is a source and the targets are linked;
    /// otherwise the element is a target and the sources are linked. Ends
    /// that are neither blocks, requirements nor use cases link under
    /// `unknown`. The result is empty, never absent, when nothing matches.
    pub fn directed_links(
        &self,
        element: &SourceElement,
        as_source: bool,
        stereotype: &str,
    ) -> Vec<Link> {
        let relationships: Vec<_> = if as_source {
            self.model.outgoing(&element.id).collect()
        } else {
            self.model.incoming(&element.id).collect()
        };

        let mut links = Vec::new();
        for rel in relationships {
            if rel.stereotype.as_deref() != Some(stereotype) {
                continue;
            }
            let ends = if as_source { &rel.targets } else { &rel.sources };
            for end in ends {
                if let Some(link) = self.link_or_unknown(end, &RELATIONSHIP_END_KINDS) {
                    links.push(link);
                }
            }
        }
        links
    }

    fn omit(&self) -> Option<Link> {
        self.omitted.set(self.omitted.get() + 1);
        None
    }
}
