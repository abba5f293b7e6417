//! Budget-gated model dispatch.
//!
//! Each generation tool resolves its model through the catalog (falling
//! back to a synthesized entry at the tool's default cost), checks the
//! budget, invokes the remote call, debits on success, and shapes the
//! response. A rejected or failed dispatch never mutates budget state.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use mediaforge_catalog::ModelEntry;
use mediaforge_replicate::ReplicateError;

use crate::context::ToolContext;

// Per-tool default model identifiers and fallback costs, used when the
// caller names no model or names one the catalog does not know.
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/flux-schnell";
pub const DEFAULT_VIDEO_MODEL: &str = "wan-video/wan-2.2-t2v-480p-fast";
pub const DEFAULT_AUDIO_MODEL: &str = "suno-ai/bark";
pub const DEFAULT_3D_MODEL: &str = "camenduru/wonder3d";
pub const DEFAULT_UPSCALE_MODEL: &str = "philz1337x/clarity-upscaler";
pub const BACKGROUND_REMOVAL_MODEL: &str = "cjwbw/rembg";
pub const LOGO_MODEL: &str = "recraft-ai/recraft-v3-svg";

const DEFAULT_IMAGE_COST: f64 = 0.01;
const DEFAULT_VIDEO_COST: f64 = 0.05;
const DEFAULT_AUDIO_COST: f64 = 0.01;
const DEFAULT_3D_COST: f64 = 0.04;
const DEFAULT_UPSCALE_COST: f64 = 0.022;
const DEFAULT_BG_REMOVAL_COST: f64 = 0.005;
const DEFAULT_LOGO_COST: f64 = 0.01;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Budget limit exceeded")]
    BudgetExceeded,

    #[error("{0}")]
    Remote(#[from] ReplicateError),
}

/// The uniform success payload of every dispatch:
/// `{status, model, output, cost, budget_remaining}`.
#[derive(Debug, Serialize)]
pub struct DispatchResult {
    pub status: &'static str,
    pub model: String,
    pub output: Vec<Value>,
    pub cost: f64,
    pub budget_remaining: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub negative_prompt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub num_outputs: Option<u32>,
    pub seed: Option<i64>,
    pub guidance_scale: Option<f64>,
    pub image: Option<String>,
    pub mask: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateVideoRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub image: Option<String>,
    pub duration: Option<u32>,
    pub fps: Option<u32>,
    pub resolution: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateAudioRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub duration: Option<u32>,
    pub voice_preset: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Generate3dRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub image: Option<String>,
    pub output_format: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpscaleImageRequest {
    pub image_url: String,
    pub model: Option<String>,
    pub scale: Option<u32>,
    pub face_enhance: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveBackgroundRequest {
    pub media_url: String,
    /// "image" or "video". Accepted for schema compatibility; the payload
    /// is the same either way.
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateLogoRequest {
    pub prompt: String,
    /// "svg", "png", or "both"; maps to the payload's output_format.
    pub format: Option<String>,
}

/// Incrementally builds the remote input payload. Optional fields are only
/// included when the caller provided them; absent fields are omitted, not
/// null-filled.
struct Payload(Map<String, Value>);

impl Payload {
    fn new() -> Self {
        Payload(Map::new())
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn set_opt(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Resolve the caller's model identifier (or the tool default) against the
/// catalog; unknown identifiers become a dispatchable fallback entry at the
/// tool's default cost.
fn resolve_model(
    context: &ToolContext,
    requested: Option<&str>,
    default_model: &str,
    default_cost: f64,
) -> ModelEntry {
    let identifier = requested.unwrap_or(default_model);
    match context.catalog.resolve(identifier) {
        Some(entry) => entry.clone(),
        None => {
            warn!("Model not in catalog, dispatching with defaults: {}", identifier);
            ModelEntry::fallback(identifier, default_cost)
        }
    }
}

/// The dispatch sequence shared by every generation tool: budget check,
/// remote invocation (version-pinned or latest), debit, response shaping.
async fn dispatch(
    context: &ToolContext,
    entry: &ModelEntry,
    input: Value,
) -> Result<DispatchResult, DispatchError> {
    let cost = entry.cost_per_run;

    if !context.budget.can_afford(cost) {
        warn!(
            "Rejecting dispatch of {}: cost {} exceeds remaining budget {}",
            entry.id,
            cost,
            context.budget.remaining()
        );
        return Err(DispatchError::BudgetExceeded);
    }

    let raw = match &entry.version {
        Some(version) => context.client.create_prediction(version, &input).await?,
        None => context.client.run(&entry.id, &input).await?,
    };

    // Success and debit are not transactional; a remote failure above
    // returns before any budget mutation.
    context.budget.debit(cost);
    info!("Dispatched {} for {} budget units", entry.id, cost);

    Ok(DispatchResult {
        status: "success",
        model: entry.name.clone(),
        output: normalize_output(raw),
        cost,
        budget_remaining: context.budget.remaining(),
    })
}

/// Normalize the remote return value into a list of results: direct arrays
/// pass through, objects exposing an `output` field are unwrapped, anything
/// else becomes a one-element list.
fn normalize_output(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut object) if object.contains_key("output") => {
            match object.remove("output") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other],
            }
        }
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

pub async fn generate_image(
    request: GenerateImageRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        request.model.as_deref(),
        DEFAULT_IMAGE_MODEL,
        DEFAULT_IMAGE_COST,
    );
    let input = Payload::new()
        .set("prompt", request.prompt)
        .set("num_outputs", request.num_outputs.unwrap_or(1))
        .set_opt("negative_prompt", request.negative_prompt)
        .set_opt("width", request.width)
        .set_opt("height", request.height)
        .set_opt("guidance_scale", request.guidance_scale)
        .set_opt("seed", request.seed)
        .set_opt("image", request.image)
        .set_opt("mask", request.mask)
        .into_value();
    dispatch(context, &entry, input).await
}

pub async fn generate_video(
    request: GenerateVideoRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        request.model.as_deref(),
        DEFAULT_VIDEO_MODEL,
        DEFAULT_VIDEO_COST,
    );
    let input = Payload::new()
        .set("prompt", request.prompt)
        .set_opt("image", request.image)
        .set_opt("duration", request.duration)
        .set_opt("fps", request.fps)
        .set_opt("resolution", request.resolution)
        .into_value();
    dispatch(context, &entry, input).await
}

pub async fn generate_audio(
    request: GenerateAudioRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        request.model.as_deref(),
        DEFAULT_AUDIO_MODEL,
        DEFAULT_AUDIO_COST,
    );
    let input = Payload::new()
        .set("prompt", request.prompt)
        .set_opt("duration", request.duration)
        .set_opt("voice_preset", request.voice_preset)
        .set_opt("format", request.format)
        .into_value();
    dispatch(context, &entry, input).await
}

pub async fn generate_3d(
    request: Generate3dRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        request.model.as_deref(),
        DEFAULT_3D_MODEL,
        DEFAULT_3D_COST,
    );
    let input = Payload::new()
        .set("prompt", request.prompt)
        .set_opt("image", request.image)
        .set_opt("output_format", request.output_format)
        .into_value();
    dispatch(context, &entry, input).await
}

pub async fn upscale_image(
    request: UpscaleImageRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        request.model.as_deref(),
        DEFAULT_UPSCALE_MODEL,
        DEFAULT_UPSCALE_COST,
    );
    let mut payload = Payload::new()
        .set("image", request.image_url)
        .set("scale", request.scale.unwrap_or(2));
    if request.face_enhance == Some(true) {
        payload = payload.set("face_enhance", true);
    }
    dispatch(context, &entry, payload.into_value()).await
}

pub async fn remove_background(
    request: RemoveBackgroundRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(
        context,
        None,
        BACKGROUND_REMOVAL_MODEL,
        DEFAULT_BG_REMOVAL_COST,
    );
    let input = json!({ "image": request.media_url });
    dispatch(context, &entry, input).await
}

pub async fn generate_logo(
    request: GenerateLogoRequest,
    context: &ToolContext,
) -> Result<DispatchResult, DispatchError> {
    let entry = resolve_model(context, None, LOGO_MODEL, DEFAULT_LOGO_COST);
    let input = Payload::new()
        .set("prompt", request.prompt)
        .set_opt("output_format", request.format)
        .into_value();
    dispatch(context, &entry, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_direct_list() {
        let normalized = normalize_output(json!(["a", "b"]));
        assert_eq!(normalized, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_normalize_prediction_object() {
        let normalized = normalize_output(json!({"status": "succeeded", "output": ["u"]}));
        assert_eq!(normalized, vec![json!("u")]);
    }

    #[test]
    fn test_normalize_scalar_wraps() {
        let normalized = normalize_output(json!("https://one.png"));
        assert_eq!(normalized, vec![json!("https://one.png")]);
    }

    #[test]
    fn test_normalize_null_output() {
        assert!(normalize_output(json!(null)).is_empty());
        assert!(normalize_output(json!({"output": null})).is_empty());
    }

    #[test]
    fn test_typed_requests_reject_unknown_fields() {
        let result: Result<GenerateImageRequest, _> =
            serde_json::from_value(json!({"prompt": "a cat", "stlye": "photo"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_typed_requests_require_prompt() {
        let result: Result<GenerateVideoRequest, _> =
            serde_json::from_value(json!({"duration": 5}));
        assert!(result.is_err());
    }
}
