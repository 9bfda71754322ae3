//! The derivation graph: named steps with declared dependencies.
//!
//! Steps declare which facts they read and which they produce; the graph
//! topologically sorts them at construction time and fails fast on cycles,
//! dangling dependencies or duplicate producers. The check runs once when
//! the engine is built, never per request, since the step set is fixed
//! configuration.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalcWarning, PayrollPayload};

use super::facts::{FactKey, FactStore};
use super::resolver::RuleResolver;

/// Everything a derivation step may consult or mutate during one invocation.
///
/// The payload, configuration and resolver are read-only; the fact store and
/// warning list are local to the invocation.
pub struct StepContext<'a> {
    /// The validated input payload.
    pub payload: &'a PayrollPayload,
    /// The load-once engine configuration.
    pub config: &'a EngineConfig,
    /// The rule-variant resolver.
    pub resolver: &'a RuleResolver,
    /// Facts produced so far in this invocation.
    pub facts: &'a mut FactStore,
    /// Non-fatal events reported so far in this invocation.
    pub warnings: &'a mut Vec<CalcWarning>,
}

/// The signature of a derivation step body.
///
/// Steps are pure apart from writing their declared facts and warnings:
/// no I/O, no retained state, re-executed from scratch per request.
pub type StepFn = fn(&mut StepContext<'_>) -> EngineResult<()>;

/// A named derivation step with its declared dependency sets.
pub struct DerivationStep {
    /// Step name, e.g. "base-salary".
    pub name: &'static str,
    /// Facts this step reads. Raw payload facts are always available and
    /// are not declared here.
    pub depends_on: &'static [FactKey],
    /// Facts this step produces, each exactly once.
    pub produces: &'static [FactKey],
    /// The step body.
    pub run: StepFn,
}

/// An ordered, validated set of derivation steps.
pub struct DerivationGraph {
    steps: Vec<DerivationStep>,
    order: Vec<usize>,
}

impl DerivationGraph {
    /// Validates the step set and computes a topological execution order.
    ///
    /// Fails with a configuration error when a fact has two producers, a
    /// dependency has no producer, or the dependencies are cyclic.
    pub fn new(steps: Vec<DerivationStep>) -> EngineResult<Self> {
        let mut producer_of: BTreeMap<FactKey, usize> = BTreeMap::new();
        for (index, step) in steps.iter().enumerate() {
            for &fact in step.produces {
                if producer_of.insert(fact, index).is_some() {
                    return Err(EngineError::DuplicateProducer {
                        fact: fact.as_str().to_string(),
                    });
                }
            }
        }

        for step in &steps {
            for &fact in step.depends_on {
                if !producer_of.contains_key(&fact) {
                    return Err(EngineError::UnknownDependency {
                        step: step.name.to_string(),
                        fact: fact.as_str().to_string(),
                    });
                }
            }
        }

        // Kahn's algorithm, kept stable: each pass schedules steps in
        // declaration order once all their dependencies are available.
        let mut order = Vec::with_capacity(steps.len());
        let mut scheduled = vec![false; steps.len()];
        let mut available: BTreeMap<FactKey, ()> = BTreeMap::new();

        while order.len() < steps.len() {
            let mut progressed = false;
            for (index, step) in steps.iter().enumerate() {
                if scheduled[index] {
                    continue;
                }
                if step
                    .depends_on
                    .iter()
                    .all(|fact| available.contains_key(fact))
                {
                    scheduled[index] = true;
                    for &fact in step.produces {
                        available.insert(fact, ());
                    }
                    order.push(index);
                    progressed = true;
                }
            }
            if !progressed {
                let remaining = steps
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !scheduled[*index])
                    .map(|(_, step)| step.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(EngineError::CyclicDependency { steps: remaining });
            }
        }

        Ok(Self { steps, order })
    }

    /// Iterates over the steps in execution order.
    pub fn ordered(&self) -> impl Iterator<Item = &DerivationStep> {
        self.order.iter().map(|&index| &self.steps[index])
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the graph has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
