#!/usr/bin/env -S cargo run --bin mediaforge-mcp --

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod budget;
mod config;
mod context;
mod dispatch;
mod mcp;
mod tools;
mod workflow;

#[cfg(test)]
mod tests;

use config::Config;
use context::ToolContext;
use mcp::*;
use tools::{tools_call, tools_list};

#[derive(Parser)]
#[command(name = "mediaforge-mcp")]
#[command(about = "MediaForge MCP Server - generative media tools backed by Replicate")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Enable MCP server mode (default behavior)")]
    mcp: bool,
    #[arg(long, help = "Display available tools")]
    tools: bool,
    #[arg(long, help = "Display available workflow templates")]
    workflows: bool,
}

async fn handle_rpc_request(
    method: &str,
    params: Option<Value>,
    context: &ToolContext,
) -> Result<Value> {
    match method {
        "initialize" => {
            let request = if let Some(p) = params {
                Some(serde_json::from_value(p)?)
            } else {
                None
            };
            let result = initialize(request).await?;
            Ok(serde_json::to_value(result)?)
        }
        "ping" => {
            let result = ping(params).await?;
            Ok(result)
        }
        "logging/setLevel" => {
            let request = if let Some(p) = params {
                Some(serde_json::from_value(p)?)
            } else {
                None
            };
            let result = logging_set_level(request).await?;
            Ok(result)
        }
        "resources/list" => {
            let result = resources_list(params).await?;
            Ok(result)
        }
        "resources/read" => {
            let result = resources_read(params).await?;
            Ok(result)
        }
        "prompts/list" => {
            let result = prompts_list(params).await?;
            Ok(result)
        }
        "prompts/get" => {
            let result = prompts_get(params).await?;
            Ok(result)
        }
        "tools/list" => {
            let request = if let Some(p) = params {
                Some(serde_json::from_value(p)?)
            } else {
                None
            };
            let result = tools_list(request).await?;
            Ok(serde_json::to_value(result)?)
        }
        "tools/call" => {
            let request = if let Some(p) = params {
                Some(serde_json::from_value(p)?)
            } else {
                None
            };
            let result = tools_call(request, context).await?;
            Ok(serde_json::to_value(result)?)
        }
        _ => Err(anyhow::anyhow!("Unknown method: {}", method)),
    }
}

#[cfg(unix)]
fn install_shutdown_flag(running: Arc<AtomicBool>) {
    use signal_hook::{consts::SIGINT, iterator::Signals};
    std::thread::spawn(move || {
        let mut signals = Signals::new([SIGINT]).expect("failed to register SIGINT handler");
        for _ in signals.forever() {
            running.store(false, Ordering::SeqCst);
            break;
        }
    });
}

#[cfg(windows)]
fn install_shutdown_flag(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("failed to register ctrl-c handler");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.tools {
        println!("Available tools:");
        for tool in tools_list(None).await?.tools {
            println!("- {}: {}", tool.name, tool.description.unwrap_or_default());
        }
        return Ok(());
    }

    if cli.workflows {
        println!("Available workflows:");
        for template in mediaforge_catalog::WORKFLOW_TEMPLATES.iter() {
            println!(
                "- {}: {} ({} steps)",
                template.key,
                template.description,
                template.steps.len()
            );
        }
        return Ok(());
    }

    // Default behavior is to start MCP server unless showing capabilities

    // Generation tools are useless without a credential; refuse to serve.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Please set your Replicate API token:");
            eprintln!("export REPLICATE_API_TOKEN='your_token_here'");
            std::process::exit(1);
        }
    };

    let context = ToolContext::new(&config);

    // Set up signal handling for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    install_shutdown_flag(running.clone());

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);

    for line_result in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        debug!("Received: {}", line);

        let request: Value = serde_json::from_str(&line)?;

        if let Some(method) = request.get("method").and_then(|m| m.as_str()) {
            match method {
                "notifications/initialized"
                | "notifications/cancelled"
                | "notifications/progress" => {
                    // Notifications don't require responses
                    continue;
                }
                method_name => {
                    let params = request.get("params").cloned();

                    match handle_rpc_request(method_name, params, &context).await {
                        Ok(result) => {
                            let response_json = json!({
                                "jsonrpc": "2.0",
                                "id": request.get("id"),
                                "result": result
                            });
                            println!("{}", serde_json::to_string(&response_json)?);
                        }
                        Err(error) => {
                            let error_response = json!({
                                "jsonrpc": "2.0",
                                "id": request.get("id"),
                                "error": {
                                    "code": -32603,
                                    "message": error.to_string()
                                }
                            });
                            println!("{}", serde_json::to_string(&error_response)?);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
