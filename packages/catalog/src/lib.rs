// ABOUTME: Generative media model catalog and workflow templates
// ABOUTME: Code-defined registry of Replicate models with in-memory lookup

pub mod registry;
pub mod types;
pub mod workflows;

pub use registry::{ModelCatalog, CATALOG};
pub use types::{ModelCategory, ModelEntry};
pub use workflows::{workflow, WorkflowStep, WorkflowTemplate, WORKFLOW_TEMPLATES};
