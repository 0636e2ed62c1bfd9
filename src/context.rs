use crate::classify::Classification;
use crate::config::GraphConfig;
use crate::descriptor::Descriptor;
use crate::errors::Result;
use crate::index::{Collision, CollisionPolicy, Indices};
use crate::model::SourceModel;
use crate::resolution::LinkResolver;
use crate::types::MappingStats;

/// Caller-supplied settings for one transformation run.
#[derive(Debug, Clone)]
pub struct MappingOptions {
    /// Namespace segment prepended to every identity.
    pub project_scope: String,
    pub descriptor: Descriptor,
    pub collision_policy: CollisionPolicy,
    /// Names of library packages that are not mapped.
    pub excluded_packages: Vec<String>,
}

impl MappingOptions {
    pub fn new(project_scope: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            project_scope: project_scope.into(),
            descriptor,
            collision_policy: CollisionPolicy::default(),
            excluded_packages: Vec::new(),
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_excluded_packages(mut self, packages: Vec<String>) -> Self {
        self.excluded_packages = packages;
        self
    }

    /// Derives options from a loaded configuration.
    pub fn from_config(config: &GraphConfig, project_scope: impl Into<String>) -> Result<Self> {
        Ok(Self {
            project_scope: project_scope.into(),
            descriptor: config.descriptor()?,
            collision_policy: config.collision_policy,
            excluded_packages: config.excluded_packages.clone(),
        })
    }
}

/// All mutable state of one run. Nothing outlives it except the finished
/// graph.
pub struct RunContext<'m> {
    pub model: &'m SourceModel,
    pub classification: Classification,
    pub descriptor: Descriptor,
    pub scope: String,
    pub policy: CollisionPolicy,
    pub indices: Indices,
    pub stats: MappingStats,
    pub collisions: Vec<Collision>,
}

impl<'m> RunContext<'m> {
    /// Classifies the model and prepares empty indices.
    pub fn new(model: &'m SourceModel, options: MappingOptions) -> Self {
        let classification = Classification::with_exclusions(model, &options.excluded_packages);
        Self {
            model,
            classification,
            descriptor: options.descriptor,
            scope: options.project_scope,
            policy: options.collision_policy,
            indices: Indices::new(),
            stats: MappingStats::default(),
            collisions: Vec::new(),
        }
    }

    /// A resolver reading the current indices.
    pub fn resolver(&self) -> LinkResolver<'_> {
        LinkResolver::new(
            self.model,
            &self.classification,
            &self.descriptor,
            &self.scope,
            &self.indices,
        )
    }
}
