//! Two-phase mapping of a source model into a resource graph.
//!
//! Phase 1 creates every resource of every kind; phase 2 resolves links
//! against the finished indices. The phases never interleave, and a graph is
//! only handed out once both have completed.

mod phase1;
mod phase2;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::context::{MappingOptions, RunContext};
use crate::errors::{Result, SysGraphError};
use crate::graph::ResourceGraph;
use crate::model::SourceModel;

/// Lifecycle of a [`Mapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapperState {
    Idle,
    Phase1Running,
    Phase1Complete,
    Phase2Running,
    Done,
    Aborted,
}

#[allow(clippy::should_implement_trait)]
impl MapperState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapperState::Idle => "idle",
            MapperState::Phase1Running => "phase1_running",
            MapperState::Phase1Complete => "phase1_complete",
            MapperState::Phase2Running => "phase2_running",
            MapperState::Done => "done",
            MapperState::Aborted => "aborted",
        }
    }
}

/// Drives one transformation run.
pub struct Mapper<'m> {
    state: MapperState,
    ctx: RunContext<'m>,
    started: Instant,
}

impl<'m> Mapper<'m> {
    /// Classifies the model and prepares an idle run.
    pub fn new(model: &'m SourceModel, options: MappingOptions) -> Self {
        Self {
            state: MapperState::Idle,
            ctx: RunContext::new(model, options),
            started: Instant::now(),
        }
    }

    /// Maps `model` end to end.
    pub fn run(model: &'m SourceModel, options: MappingOptions) -> Result<ResourceGraph> {
        let mut mapper = Mapper::new(model, options);
        mapper.run_phase1()?;
        mapper.run_phase2()?;
        mapper.finish()
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    pub fn context(&self) -> &RunContext<'m> {
        &self.ctx
    }

    /// Creates and indexes every resource. Only valid from `Idle`.
    pub fn run_phase1(&mut self) -> Result<()> {
        self.expect_state(MapperState::Idle, "phase 1")?;
        self.state = MapperState::Phase1Running;
        self.started = Instant::now();

        if let Err(e) = phase1::run(&mut self.ctx) {
            tracing::warn!(error = %e, "phase 1 failed, run aborted");
            self.state = MapperState::Aborted;
            return Err(e);
        }

        tracing::info!(
            scope = %self.ctx.scope,
            resources = self.ctx.indices.total_len(),
            skipped = self.ctx.stats.skipped_elements,
            collisions = self.ctx.stats.collisions,
            "phase 1 complete"
        );
        self.state = MapperState::Phase1Complete;
        Ok(())
    }

    /// Resolves every link. Only valid from `Phase1Complete`.
    pub fn run_phase2(&mut self) -> Result<()> {
        self.expect_state(MapperState::Phase1Complete, "phase 2")?;
        self.state = MapperState::Phase2Running;

        if let Err(e) = phase2::run(&mut self.ctx) {
            tracing::warn!(error = %e, "phase 2 failed, run aborted");
            self.state = MapperState::Aborted;
            return Err(e);
        }

        tracing::info!(
            scope = %self.ctx.scope,
            resolved = self.ctx.stats.links_resolved,
            omitted = self.ctx.stats.links_omitted,
            unknown = self.ctx.stats.links_unknown,
            "phase 2 complete"
        );
        self.state = MapperState::Done;
        Ok(())
    }

    /// Abandons the run. A later [`finish`](Self::finish) fails.
    pub fn abort(&mut self) {
        if self.state != MapperState::Done {
            tracing::debug!(from = self.state.as_str(), "mapper aborted");
        }
        self.state = MapperState::Aborted;
    }

    /// Hands out the graph. Fails unless both phases completed.
    pub fn finish(self) -> Result<ResourceGraph> {
        if self.state != MapperState::Done {
            return Err(SysGraphError::Phase {
                message: format!(
                    "cannot finish a run in state '{}'",
                    self.state.as_str()
                ),
            });
        }
        let mut ctx = self.ctx;
        ctx.stats.duration_ms = self.started.elapsed().as_millis() as u64;
        Ok(ResourceGraph::new(
            ctx.scope,
            ctx.indices,
            ctx.stats,
            ctx.collisions,
        ))
    }

    fn expect_state(&self, expected: MapperState, what: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SysGraphError::Phase {
                message: format!(
                    "cannot run {} in state '{}' (expected '{}')",
                    what,
                    self.state.as_str(),
                    expected.as_str()
                ),
            })
        }
    }
}
