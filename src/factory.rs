use crate::descriptor::Descriptor;
use crate::errors::Result;
use crate::identity::identity_for;
use crate::index::{index_key, Collision, CollisionPolicy, Indices};
use crate::model::{SourceElement, SourceModel};
use crate::types::{Addressing, Resource, ResourceBody, ResourceKind};

/// Result of creating one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// Index key the resource was stored under.
    pub key: String,
    pub collision: Option<Collision>,
}

/// Creates resources and registers them in the per-kind indices.
pub struct ResourceFactory<'a> {
    descriptor: &'a Descriptor,
    scope: &'a str,
    model: &'a SourceModel,
}

impl<'a> ResourceFactory<'a> {
    pub fn new(descriptor: &'a Descriptor, scope: &'a str, model: &'a SourceModel) -> Self {
        Self {
            descriptor,
            scope,
            model,
        }
    }

    /// Builds the resource for `element` as `kind` without indexing it.
    ///
    /// Only elements with a non-empty name are addressed.
    pub fn build(
        &self,
        kind: ResourceKind,
        element: &SourceElement,
        body: ResourceBody,
    ) -> Result<Resource> {
        let identity = identity_for(kind, element, self.model);
        let addressing = if element.name.is_empty() {
            Addressing::Unaddressed
        } else {
            Addressing::Addressed {
                about: self
                    .descriptor
                    .resource_address(kind, self.scope, &identity)?,
                name: element.name.clone(),
            }
        };
        Ok(Resource {
            kind,
            identity,
            source_id: element.id.clone(),
            addressing,
            body,
        })
    }

    /// Builds the resource and inserts it into the index of `kind`.
    pub fn create(
        &self,
        kind: ResourceKind,
        element: &SourceElement,
        body: ResourceBody,
        indices: &mut Indices,
        policy: CollisionPolicy,
    ) -> Result<Created> {
        let resource = self.build(kind, element, body)?;
        let key = index_key(self.scope, kind, &resource.identity);
        tracing::debug!(
            kind = kind.as_str(),
            key = %key,
            addressed = resource.about().is_some(),
            "created resource"
        );
        let collision = indices.insert(key.clone(), resource, policy)?;
        Ok(Created { key, collision })
    }
}
