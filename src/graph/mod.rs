/// The aggregated resource graph produced by a run.
pub mod aggregate;

/// Projection of the graph onto RDF-style triples.
pub mod triples;

pub use aggregate::{GraphDocument, ResourceGraph};
pub use triples::{graph_triples, resource_triples, Term, Triple};
