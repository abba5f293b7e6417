//! Shared data structures for the model registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog section. The declared order here is the catalog's iteration
/// order, which `ModelCatalog::resolve` relies on as its tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    ImageGeneration,
    ImageManipulation,
    VideoGeneration,
    VideoEditing,
    AudioGeneration,
    #[serde(rename = "3d_generation")]
    ThreeDGeneration,
    UtilityModels,
}

impl ModelCategory {
    /// All categories in defined catalog order.
    pub const ALL: [ModelCategory; 7] = [
        ModelCategory::ImageGeneration,
        ModelCategory::ImageManipulation,
        ModelCategory::VideoGeneration,
        ModelCategory::VideoEditing,
        ModelCategory::AudioGeneration,
        ModelCategory::ThreeDGeneration,
        ModelCategory::UtilityModels,
    ];

    /// Section name as used in the catalog JSON shape (e.g. "image_generation").
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::ImageGeneration => "image_generation",
            ModelCategory::ImageManipulation => "image_manipulation",
            ModelCategory::VideoGeneration => "video_generation",
            ModelCategory::VideoEditing => "video_editing",
            ModelCategory::AudioGeneration => "audio_generation",
            ModelCategory::ThreeDGeneration => "3d_generation",
            ModelCategory::UtilityModels => "utility_models",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single model entry in the catalog. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Catalog key, unique within its section (e.g. "flux-schnell").
    pub key: String,
    /// Remote identifier in `owner/name` form (e.g. "black-forest-labs/flux-schnell").
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Short description of what the model does.
    pub description: String,
    /// Estimated cost per run in budget units (USD). Always >= 0.
    pub cost_per_run: f64,
    /// Capability tags (e.g. "text2img", "upscaling").
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Pinned revision identifier. When present, invocations go through the
    /// version-pinned prediction path instead of "run latest".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Maximum output resolution in pixels, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resolution: Option<u32>,
    /// Maximum output duration in seconds, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
    /// Maximum upscale factor, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_scale: Option<u32>,
}

impl ModelEntry {
    /// Synthesize an entry for an identifier the catalog does not know.
    ///
    /// Unknown models stay dispatchable at the caller's category default
    /// cost estimate instead of failing outright; the identifier doubles as
    /// key, remote id, and display name.
    pub fn fallback(identifier: &str, default_cost: f64) -> Self {
        Self {
            key: identifier.to_string(),
            id: identifier.to_string(),
            name: identifier.to_string(),
            description: String::new(),
            cost_per_run: default_cost,
            capabilities: Vec::new(),
            version: None,
            max_resolution: None,
            max_duration: None,
            max_scale: None,
        }
    }
}
