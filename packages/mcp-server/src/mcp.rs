use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// MCP Protocol Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeRequest {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    #[serde(rename = "clientInfo")]
    pub client_info: ClientInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCapabilities {
    pub roots: Option<RootsCapability>,
    pub sampling: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub logging: Option<Value>,
    pub prompts: Option<PromptsCapability>,
    pub resources: Option<ResourcesCapability>,
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCapability {
    pub subscribe: Option<bool>,
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingLevel {
    pub level: String,
}

// MCP Protocol Handlers
pub async fn initialize(_request: Option<InitializeRequest>) -> Result<InitializeResult> {
    let response = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            logging: None,
            prompts: Some(PromptsCapability {
                list_changed: Some(false),
            }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: Some(false),
            }),
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
        },
        server_info: ServerInfo {
            name: "mediaforge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };
    Ok(response)
}

pub async fn ping(_request: Option<Value>) -> Result<Value> {
    Ok(json!({}))
}

pub async fn logging_set_level(_request: Option<LoggingLevel>) -> Result<Value> {
    Ok(json!({}))
}

pub async fn resources_list(_request: Option<Value>) -> Result<Value> {
    Ok(json!({
        "resources": [],
        "nextCursor": null
    }))
}

pub async fn resources_read(_request: Option<Value>) -> Result<Value> {
    Ok(json!({
        "contents": []
    }))
}

pub async fn prompts_list(_request: Option<Value>) -> Result<Value> {
    Ok(json!({
        "prompts": [],
        "nextCursor": null
    }))
}

pub async fn prompts_get(_request: Option<Value>) -> Result<Value> {
    Ok(json!({
        "messages": []
    }))
}
