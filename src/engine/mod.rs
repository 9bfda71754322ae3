//! The derivation engine.
//!
//! [`Engine::new`] validates the configuration and topologically sorts the
//! built-in step set once; [`Engine::calculate`] then executes the graph
//! over a per-invocation fact store. The engine holds no mutable state:
//! concurrent invocations share only the read-only configuration and graph.

mod assembler;
mod facts;
mod graph;
mod resolver;
mod steps;

pub use facts::{FactKey, FactStore};
pub use graph::{DerivationGraph, DerivationStep, StepContext, StepFn};
pub use resolver::{ContributionVariant, RuleResolver};
pub use steps::{builtin_steps, progressive_tax};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{PayrollPayload, PayrollResult};

/// A stateless payroll calculation engine over immutable configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::engine::Engine;
///
/// let config = ConfigLoader::load("./config/pl").unwrap();
/// let engine = Engine::new(config).unwrap();
/// ```
pub struct Engine {
    resolver: RuleResolver,
    graph: DerivationGraph,
}

impl Engine {
    /// Builds an engine from a loaded configuration.
    ///
    /// Validates rule-table coverage and the step dependency graph; both
    /// checks run here, once, so request-time execution cannot encounter a
    /// configuration error the load did not.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let graph = DerivationGraph::new(steps::builtin_steps())?;
        Ok(Self {
            resolver: RuleResolver::new(config),
            graph,
        })
    }

    /// Runs one calculation over an already-validated payload.
    ///
    /// Pure apart from the result's timestamp and generated id: identical
    /// inputs under identical configuration produce identical amounts.
    pub fn calculate(&self, payload: &PayrollPayload) -> EngineResult<PayrollResult> {
        let mut facts = FactStore::new();
        let mut warnings = Vec::new();

        for step in self.graph.ordered() {
            let mut ctx = StepContext {
                payload,
                config: self.resolver.config(),
                resolver: &self.resolver,
                facts: &mut facts,
                warnings: &mut warnings,
            };
            (step.run)(&mut ctx)?;
        }

        assembler::assemble(payload, &facts, warnings)
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &EngineConfig {
        self.resolver.config()
    }
}
