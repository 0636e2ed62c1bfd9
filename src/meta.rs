//! Graph-level meta-information: user supplied `prefix:local=value`
//! properties, an optional graph id, and the container resource that ties
//! every subject of the graph to them.

use std::collections::{BTreeMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::descriptor::Descriptor;
use crate::errors::{Result, SysGraphError};
use crate::graph::triples::{RDFS_CONTAINER, RDFS_MEMBER, RDF_TYPE};
use crate::graph::{Term, Triple};

/// Meta-property name whose value becomes the graph id.
pub const ID_PROPERTY: &str = "graph";

/// Path segment of the container resource.
pub const CONTAINER_SEGMENT: &str = "container";

/// Prefixes that are always known.
pub fn default_prefixes(descriptor: &Descriptor) -> BTreeMap<String, String> {
    let mut prefixes = BTreeMap::new();
    prefixes.insert(
        "rdf".to_string(),
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_string(),
    );
    prefixes.insert(
        "rdfs".to_string(),
        "http://www.w3.org/2000/01/rdf-schema#".to_string(),
    );
    prefixes.insert(
        "dcterms".to_string(),
        "http://purl.org/dc/terms/".to_string(),
    );
    prefixes.insert(
        "xsd".to_string(),
        "http://www.w3.org/2001/XMLSchema#".to_string(),
    );
    prefixes.insert(
        descriptor.vocab_prefix().to_string(),
        descriptor.vocab_base().to_string(),
    );
    prefixes
}

/// Parses `prefix=namespace` entries into a prefix table.
pub fn parse_prefixes(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut prefixes = BTreeMap::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((prefix, ns)) if !prefix.is_empty() && !ns.is_empty() => {
                prefixes.insert(prefix.to_string(), ns.to_string());
            }
            _ => {
                return Err(SysGraphError::Config {
                    message: format!("malformed namespace prefix '{}', expected prefix=namespace", entry),
                })
            }
        }
    }
    Ok(prefixes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaInformation {
    /// Property IRI to literal value.
    properties: BTreeMap<String, String>,
    /// Prefixes actually used by the properties.
    vocabularies: BTreeMap<String, String>,
    id: String,
}

impl MetaInformation {
    /// Parses meta entries against a prefix table.
    ///
    /// Each entry is either `prefix:local=value` or `graph=<id>`. An unknown
    /// prefix or any other shape is a `SysGraphError::Config`.
    pub fn parse(vocabs: &BTreeMap<String, String>, metas: &[String]) -> Result<Self> {
        let mut properties = BTreeMap::new();
        let mut vocabularies = BTreeMap::new();
        let mut id = None;

        for meta in metas {
            let Some((key, value)) = meta.split_once('=') else {
                return Err(SysGraphError::Config {
                    message: format!("malformed meta-property '{}'", meta),
                });
            };
            if let Some((prefix, local)) = key.split_once(':') {
                let ns = vocabs.get(prefix).ok_or_else(|| SysGraphError::Config {
                    message: format!("unknown namespace for prefix '{}'", prefix),
                })?;
                properties.insert(format!("{}{}", ns, local), value.to_string());
                vocabularies.insert(prefix.to_string(), ns.clone());
            } else if key == ID_PROPERTY {
                id = Some(value.to_string());
            } else {
                return Err(SysGraphError::Config {
                    message: format!("malformed meta-property '{}', expected prefix:name=value", meta),
                });
            }
        }

        let id = match id {
            Some(id) => id,
            None if properties.is_empty() => timestamp_id(),
            None => digest_id(&properties),
        };
        Ok(Self {
            properties,
            vocabularies,
            id,
        })
    }

    /// Meta-information with no properties and a timestamp id.
    pub fn empty() -> Self {
        Self {
            properties: BTreeMap::new(),
            vocabularies: BTreeMap::new(),
            id: timestamp_id(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn vocabularies(&self) -> &BTreeMap<String, String> {
        &self.vocabularies
    }

    /// Triples of the container resource, or nothing when there are no
    /// properties. Every distinct subject of `triples` becomes a member.
    pub fn container_triples(&self, triples: &[Triple], descriptor: &Descriptor) -> Result<Vec<Triple>> {
        if self.properties.is_empty() {
            return Ok(Vec::new());
        }
        let container = Term::iri(descriptor.resource(CONTAINER_SEGMENT, &self.id)?);

        let mut out = vec![Triple {
            subject: container.clone(),
            predicate: RDF_TYPE.to_string(),
            object: Term::iri(RDFS_CONTAINER),
        }];
        let mut seen = HashSet::new();
        for triple in triples {
            if triple.subject != container && seen.insert(&triple.subject) {
                out.push(Triple {
                    subject: container.clone(),
                    predicate: RDFS_MEMBER.to_string(),
                    object: triple.subject.clone(),
                });
            }
        }
        for (property, value) in &self.properties {
            out.push(Triple {
                subject: container.clone(),
                predicate: property.clone(),
                object: Term::literal(value.clone()),
            });
        }
        Ok(out)
    }

    /// Appends the container triples to `triples`.
    pub fn customize(&self, triples: &mut Vec<Triple>, descriptor: &Descriptor) -> Result<()> {
        let container = self.container_triples(triples, descriptor)?;
        triples.extend(container);
        Ok(())
    }
}

fn digest_id(properties: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (property, value) in properties {
        hasher.update(property.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}
