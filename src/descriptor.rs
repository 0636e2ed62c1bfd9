use url::Url;

use crate::errors::{Result, SysGraphError};
use crate::types::ResourceKind;

/// Default namespace of the SysML vocabulary terms.
pub const DEFAULT_VOCAB_BASE: &str = "http://omg.org/spec/SysML/rdf#";

/// Default prefix bound to [`DEFAULT_VOCAB_BASE`].
pub const DEFAULT_VOCAB_PREFIX: &str = "sysml";

/// Address scheme for resources and vocabulary terms.
///
/// Resource addresses have the form `{base}{/rest}/{segment}/{id}`; each
/// segment is percent-encoded by [`Url`] so identities can never escape
/// their path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    base: Url,
    rest_path: Option<String>,
    vocab_base: String,
    vocab_prefix: String,
}

impl Descriptor {
    /// Creates a descriptor rooted at `base`.
    ///
    /// Fails with `SysGraphError::Config` when `base` is not an absolute
    /// hierarchical URI.
    pub fn new(base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| SysGraphError::Config {
            message: format!("invalid base URI '{}': {}", base, e),
        })?;
        if url.cannot_be_a_base() {
            return Err(SysGraphError::Config {
                message: format!("base URI '{}' cannot carry a path", base),
            });
        }
        Ok(Self {
            base: url,
            rest_path: None,
            vocab_base: DEFAULT_VOCAB_BASE.to_string(),
            vocab_prefix: DEFAULT_VOCAB_PREFIX.to_string(),
        })
    }

    /// Inserts a fixed path (for example a REST service root) between the
    /// base and the kind segment.
    pub fn with_rest_path(mut self, rest: &str) -> Self {
        let trimmed = rest.trim_matches('/');
        self.rest_path = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_vocabulary(mut self, prefix: &str, base: &str) -> Self {
        self.vocab_prefix = prefix.to_string();
        self.vocab_base = base.to_string();
        self
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn vocab_base(&self) -> &str {
        &self.vocab_base
    }

    pub fn vocab_prefix(&self) -> &str {
        &self.vocab_prefix
    }

    /// Builds the address of `id` under `segment`.
    pub fn resource(&self, segment: &str, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(SysGraphError::Address {
                message: "empty resource id".to_string(),
                address: format!("{}/{}/", self.base.as_str().trim_end_matches('/'), segment),
            });
        }
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| SysGraphError::Address {
                message: "base URI cannot carry a path".to_string(),
                address: self.base.to_string(),
            })?;
            segments.pop_if_empty();
            if let Some(rest) = &self.rest_path {
                segments.extend(rest.split('/').filter(|s| !s.is_empty()));
            }
            segments.push(segment);
            segments.push(id);
        }
        Ok(url.to_string())
    }

    /// Address of a resource of `kind` in `scope` with the given identity.
    pub fn resource_address(&self, kind: ResourceKind, scope: &str, identity: &str) -> Result<String> {
        self.resource(kind.as_str(), &format!("{}{}", scope, identity))
    }

    /// Full IRI of a vocabulary term.
    pub fn vocabulary_term(&self, local: &str) -> String {
        format!("{}{}", self.vocab_base, local)
    }
}
