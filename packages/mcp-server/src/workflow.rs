//! Workflow template expansion.
//!
//! Expands a named template into per-step results and an estimated total
//! cost. Steps are marked completed without dispatching anything; this is a
//! cost/plan simulation, so the budget tracker is never touched. Real
//! chained execution through the dispatcher is a separate, future concern.

use serde::Serialize;
use thiserror::Error;

use mediaforge_catalog::{workflow, ModelCatalog};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),
}

#[derive(Debug, Serialize)]
pub struct StepResult {
    pub step: String,
    pub model: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WorkflowResult {
    pub workflow: String,
    pub status: &'static str,
    pub steps: Vec<StepResult>,
    pub total_cost: f64,
    pub description: String,
}

/// Expand a workflow template into step results and a cost estimate.
///
/// `total_cost` sums the catalog cost of each resolvable step model;
/// unresolvable models contribute 0 rather than failing the workflow.
pub fn run_workflow(name: &str, catalog: &ModelCatalog) -> Result<WorkflowResult, WorkflowError> {
    let template = workflow(name).ok_or_else(|| WorkflowError::UnknownWorkflow(name.to_string()))?;

    let mut steps = Vec::with_capacity(template.steps.len());
    let mut total_cost = 0.0;

    for step in &template.steps {
        steps.push(StepResult {
            step: step.step.clone(),
            model: step.model.clone(),
            status: "completed",
        });
        if let Some(entry) = catalog.resolve(&step.model) {
            total_cost += entry.cost_per_run;
        }
    }

    Ok(WorkflowResult {
        workflow: name.to_string(),
        status: "completed",
        steps,
        total_cost,
        description: template.description.clone(),
    })
}
