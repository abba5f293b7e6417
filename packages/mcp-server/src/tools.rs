use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::error;

use mediaforge_catalog::{ModelCategory, ModelEntry};

use crate::context::ToolContext;
use crate::dispatch::{
    self, Generate3dRequest, GenerateAudioRequest, GenerateImageRequest, GenerateLogoRequest,
    GenerateVideoRequest, RemoveBackgroundRequest, UpscaleImageRequest,
};
use crate::workflow::run_workflow;

// MCP Tool Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsRequest {
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<Tool>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub type_name: String,
    pub properties: HashMap<String, ToolInputSchemaProperty>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchemaProperty {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

// Request types for the catalog and workflow tools; the generation tools'
// typed requests live in dispatch.rs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListModelsRequest {
    #[serde(default = "default_category")]
    pub category: String,
    pub sort_by: Option<String>,
}

fn default_category() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecuteWorkflowRequest {
    pub workflow: String,
    /// Workflow seed inputs. Accepted for schema compatibility; expansion
    /// is a cost simulation and does not consume them.
    pub inputs: Option<Value>,
}

fn prop(type_name: &str, description: &str) -> ToolInputSchemaProperty {
    ToolInputSchemaProperty {
        type_name: Some(type_name.to_string()),
        description: Some(description.to_string()),
        enum_values: None,
    }
}

fn enum_prop(description: &str, values: &[&str]) -> ToolInputSchemaProperty {
    ToolInputSchemaProperty {
        type_name: Some("string".to_string()),
        description: Some(description.to_string()),
        enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
    }
}

fn tool(name: &str, description: &str, required: &[&str], properties: Vec<(&str, ToolInputSchemaProperty)>) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema: ToolInputSchema {
            type_name: "object".to_string(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            required: required.iter().map(|r| r.to_string()).collect(),
        },
    }
}

// Tool handlers
pub async fn tools_list(_request: Option<ListToolsRequest>) -> Result<ListToolsResult> {
    let tools = vec![
        tool(
            "generate_image",
            "Generate images using AI models",
            &["prompt"],
            vec![
                ("prompt", prop("string", "Text description of the image to generate")),
                ("model", prop("string", "Model key or id; defaults to flux-schnell")),
                ("negative_prompt", prop("string", "What to avoid in the image")),
                ("width", prop("integer", "Output width in pixels")),
                ("height", prop("integer", "Output height in pixels")),
                ("num_outputs", prop("integer", "Number of images to generate (default 1)")),
                ("seed", prop("integer", "Seed for reproducible generation")),
                ("guidance_scale", prop("number", "Prompt adherence strength")),
                ("image", prop("string", "Source image URL for img2img")),
                ("mask", prop("string", "Mask image URL for inpainting")),
            ],
        ),
        tool(
            "generate_video",
            "Generate videos from text or images",
            &["prompt"],
            vec![
                ("prompt", prop("string", "Text description of the video")),
                ("model", prop("string", "Model key or id; defaults to wan-2.2")),
                ("image", prop("string", "Source image URL for img2video")),
                ("duration", prop("integer", "Video duration in seconds")),
                ("fps", prop("integer", "Frames per second")),
                ("resolution", prop("string", "Output resolution, e.g. 1080p")),
            ],
        ),
        tool(
            "generate_audio",
            "Generate music or speech from text",
            &["prompt"],
            vec![
                ("prompt", prop("string", "Text description or speech content")),
                ("model", prop("string", "Model key or id; defaults to bark")),
                ("duration", prop("integer", "Audio duration in seconds")),
                ("voice_preset", prop("string", "Voice preset for speech models")),
                ("format", prop("string", "Output audio format")),
            ],
        ),
        tool(
            "generate_3d",
            "Generate 3D models from text or images",
            &["prompt"],
            vec![
                ("prompt", prop("string", "Text description of the 3D asset")),
                ("model", prop("string", "Model key or id; defaults to wonder3d")),
                ("image", prop("string", "Source image URL for img23d")),
                ("output_format", prop("string", "Mesh output format, e.g. glb")),
            ],
        ),
        tool(
            "list_models",
            "List available AI models by category",
            &[],
            vec![
                ("category", enum_prop("Category filter", &["all", "image", "video", "audio", "3d"])),
                ("sort_by", enum_prop("Sort models within each section", &["cost", "name"])),
            ],
        ),
        tool("check_budget", "Check current budget status", &[], vec![]),
        tool(
            "upscale_image",
            "Upscale image resolution up to 10x",
            &["image_url"],
            vec![
                ("image_url", prop("string", "Image URL to upscale")),
                ("scale", prop("integer", "Upscale factor (default 2)")),
                ("face_enhance", prop("boolean", "Apply face enhancement")),
                ("model", prop("string", "Model key or id; defaults to clarity-upscaler")),
            ],
        ),
        tool(
            "remove_background",
            "Remove background from image or video",
            &["media_url"],
            vec![
                ("media_url", prop("string", "Media URL to process")),
                ("media_type", enum_prop("Kind of media", &["image", "video"])),
            ],
        ),
        tool(
            "execute_workflow",
            "Execute complete media creation workflow",
            &["workflow"],
            vec![
                (
                    "workflow",
                    enum_prop(
                        "Workflow template to expand",
                        &[
                            "logo_to_brand_video",
                            "character_animation",
                            "product_showcase",
                            "social_media_content",
                        ],
                    ),
                ),
                ("inputs", prop("object", "Workflow seed inputs")),
            ],
        ),
        tool(
            "generate_logo",
            "Generate professional logos (SVG/PNG)",
            &["prompt"],
            vec![
                ("prompt", prop("string", "Logo concept description")),
                ("format", enum_prop("Output format", &["svg", "png", "both"])),
            ],
        ),
    ];

    Ok(ListToolsResult {
        tools,
        next_cursor: None,
    })
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![ToolContent {
            content_type: "text".to_string(),
            text,
        }],
        is_error: None,
    }
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![ToolContent {
            content_type: "text".to_string(),
            text: json!({ "error": message }).to_string(),
        }],
        is_error: Some(true),
    }
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| json!({ "error": format!("Serialization error: {}", e) }).to_string())
}

/// Parse a tool's typed arguments; unrecognized fields are rejected, not
/// silently forwarded.
fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, String> {
    let arguments = arguments.unwrap_or_else(|| json!({}));
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}

pub async fn tools_call(
    request: Option<CallToolRequest>,
    context: &ToolContext,
) -> Result<CallToolResult> {
    let call_request = request.ok_or_else(|| anyhow!("Missing tool call request"))?;

    macro_rules! dispatch_tool {
        ($req_ty:ty, $handler:path) => {{
            let args: $req_ty = match parse_args(call_request.arguments) {
                Ok(args) => args,
                Err(message) => return Ok(error_result(message)),
            };
            match $handler(args, context).await {
                Ok(result) => Ok(text_result(pretty(&result))),
                Err(e) => {
                    error!("Tool error: {}", e);
                    Ok(text_result(json!({ "error": e.to_string() }).to_string()))
                }
            }
        }};
    }

    match call_request.name.as_str() {
        "generate_image" => dispatch_tool!(GenerateImageRequest, dispatch::generate_image),
        "generate_video" => dispatch_tool!(GenerateVideoRequest, dispatch::generate_video),
        "generate_audio" => dispatch_tool!(GenerateAudioRequest, dispatch::generate_audio),
        "generate_3d" => dispatch_tool!(Generate3dRequest, dispatch::generate_3d),
        "upscale_image" => dispatch_tool!(UpscaleImageRequest, dispatch::upscale_image),
        "remove_background" => dispatch_tool!(RemoveBackgroundRequest, dispatch::remove_background),
        "generate_logo" => dispatch_tool!(GenerateLogoRequest, dispatch::generate_logo),
        "list_models" => {
            let args: ListModelsRequest = match parse_args(call_request.arguments) {
                Ok(args) => args,
                Err(message) => return Ok(error_result(message)),
            };
            Ok(text_result(pretty(&list_models(args, context))))
        }
        "check_budget" => Ok(text_result(pretty(&context.budget().status()))),
        "execute_workflow" => {
            let args: ExecuteWorkflowRequest = match parse_args(call_request.arguments) {
                Ok(args) => args,
                Err(message) => return Ok(error_result(message)),
            };
            match run_workflow(&args.workflow, context.catalog()) {
                Ok(result) => Ok(text_result(pretty(&result))),
                Err(e) => Ok(text_result(json!({ "error": e.to_string() }).to_string())),
            }
        }
        _ => Ok(error_result(format!(
            "Unknown tool: {}",
            call_request.name
        ))),
    }
}

/// Map a category filter to catalog sections and list their models.
fn list_models(request: ListModelsRequest, context: &ToolContext) -> Value {
    let sections: &[ModelCategory] = match request.category.as_str() {
        "all" => &ModelCategory::ALL,
        "image" => &[ModelCategory::ImageGeneration, ModelCategory::ImageManipulation],
        "video" => &[ModelCategory::VideoGeneration, ModelCategory::VideoEditing],
        "audio" => &[ModelCategory::AudioGeneration],
        "3d" => &[ModelCategory::ThreeDGeneration],
        // Unknown filters list nothing rather than everything.
        _ => &[],
    };

    let mut models = serde_json::Map::new();
    for &category in sections {
        let mut entries: Vec<ModelEntry> = context.catalog().category(category).to_vec();
        match request.sort_by.as_deref() {
            Some("cost") => entries.sort_by(|a, b| {
                a.cost_per_run
                    .partial_cmp(&b.cost_per_run)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            Some("name") => entries.sort_by(|a, b| a.name.cmp(&b.name)),
            _ => {}
        }
        models.insert(
            category.to_string(),
            serde_json::to_value(entries).unwrap_or(Value::Null),
        );
    }

    json!({ "models": models })
}
