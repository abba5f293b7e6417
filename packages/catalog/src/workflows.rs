//! Named multi-step workflow templates.
//!
//! A template is read-only static data describing a creative pipeline as an
//! ordered sequence of model invocations. Templates are expanded by the
//! server's workflow runner; this crate only stores and looks them up.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a workflow: a logical step name, the model identifier it
/// runs, and suggested invocation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step: String,
    pub model: String,
    #[serde(default)]
    pub params: Value,
}

/// A named, ordered sequence of model-invocation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    /// Lookup key (e.g. "logo_to_brand_video").
    pub key: String,
    /// Display name.
    pub name: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
}

lazy_static! {
    /// All workflow templates, parsed once from the embedded data.
    pub static ref WORKFLOW_TEMPLATES: Vec<WorkflowTemplate> =
        serde_json::from_str(include_str!("workflows.json"))
            .expect("embedded workflow data is valid");
}

/// Look up a workflow template by key.
pub fn workflow(name: &str) -> Option<&'static WorkflowTemplate> {
    WORKFLOW_TEMPLATES.iter().find(|w| w.key == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_load() {
        let keys: Vec<&str> = WORKFLOW_TEMPLATES.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "logo_to_brand_video",
                "character_animation",
                "product_showcase",
                "social_media_content"
            ]
        );
    }

    #[test]
    fn test_logo_to_brand_video_has_seven_ordered_steps() {
        let template = workflow("logo_to_brand_video").unwrap();
        assert_eq!(template.steps.len(), 7);
        assert_eq!(template.steps[0].step, "generate_logo");
        assert_eq!(template.steps[6].step, "sync_audio_video");
    }

    #[test]
    fn test_unknown_workflow_is_none() {
        assert!(workflow("nonexistent").is_none());
    }

    #[test]
    fn test_step_params_carry_structured_values() {
        let template = workflow("social_media_content").unwrap();
        let reframe = template.steps.last().unwrap();
        assert_eq!(reframe.model, "luma/reframe-video");
        assert!(reframe.params["formats"].is_array());
    }
}
