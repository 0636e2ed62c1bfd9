//! Deterministic identity strings used to key resources within their index.

use crate::classify::REQUIREMENT_ID_TAG;
use crate::model::{SourceElement, SourceModel};
use crate::types::ResourceKind;

/// Replaces each newline with `-` and each space with `_`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' => '-',
            ' ' => '_',
            other => other,
        })
        .collect()
}

/// Identity of an element: its normalized qualified name, or the opaque id
/// when the element is unnamed.
pub fn identity(element: &SourceElement) -> String {
    if element.name.is_empty() {
        return element.id.clone();
    }
    match &element.qualified_name {
        Some(qualified) if !qualified.is_empty() => normalize(qualified),
        _ => normalize(&element.name),
    }
}

/// The external requirement identifier carried by the `Id` tag, if non-empty.
pub fn requirement_id(element: &SourceElement) -> Option<String> {
    element
        .tag(REQUIREMENT_ID_TAG)
        .and_then(|v| v.as_text())
        .filter(|id| !id.is_empty())
}

/// Identity of an element as a resource of `kind`.
///
/// Requirements are keyed by their `Id` tag and diagrams by their owner's
/// identity joined with their own name. Every other kind uses [`identity`].
pub fn identity_for(kind: ResourceKind, element: &SourceElement, model: &SourceModel) -> String {
    match kind {
        ResourceKind::Requirement => {
            requirement_id(element).unwrap_or_else(|| identity(element))
        }
        ResourceKind::BlockDiagram | ResourceKind::InternalBlockDiagram => {
            if element.name.is_empty() {
                return element.id.clone();
            }
            match model.owner(element) {
                Some(owner) => format!("{}::{}", identity(owner), normalize(&element.name)),
                None => normalize(&element.name),
            }
        }
        _ => identity(element),
    }
}
