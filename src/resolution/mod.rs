/// Link resolution module.
///
/// Resolves element references into links by looking targets up in the
/// per-kind indices built during the first mapping phase.
mod resolver;

pub use resolver::{LinkResolver, ResolutionCounts};
