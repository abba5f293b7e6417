use crate::tests::test_helpers::mock_context;
use crate::tools::{tools_call, CallToolRequest};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn content_json(result: &crate::tools::CallToolResult) -> Value {
    serde_json::from_str(&result.content[0].text).expect("tool content is JSON")
}

#[tokio::test]
async fn test_generate_image_debits_budget() {
    let (server, context) = mock_context(10.0).await;

    Mock::given(method("POST"))
        .and(path("/models/black-forest-labs/flux-1.1-pro/predictions"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("Prefer", "wait"))
        .and(body_partial_json(json!({"input": {"prompt": "a lighthouse at dusk"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "succeeded",
            "output": ["https://replicate.delivery/img.png"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CallToolRequest {
        name: "generate_image".to_string(),
        arguments: Some(json!({"prompt": "a lighthouse at dusk", "model": "flux-pro"})),
    };

    let response = tools_call(Some(request), &context).await.unwrap();
    let result = content_json(&response);

    assert_eq!(result["status"], "success");
    assert_eq!(result["model"], "FLUX 1.1 Pro");
    assert_eq!(result["output"], json!(["https://replicate.delivery/img.png"]));
    assert_eq!(result["cost"], 0.055);
    assert_eq!(result["budget_remaining"], 9.945);
    assert_eq!(context.budget().spent(), 0.055);
}

#[tokio::test]
async fn test_upscale_uses_pinned_version_endpoint() {
    let (server, context) = mock_context(10.0).await;

    // clarity-upscaler carries a pinned version, so the call goes through
    // the version-addressed predictions endpoint.
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .and(body_partial_json(json!({
            "version": "dfad41707589d68ecdccd1dfa600d55a208f9310748e44bfe35b4a6291453d5e",
            "input": {"image": "https://example.com/low.png", "scale": 4}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "succeeded",
            "output": "https://replicate.delivery/high.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CallToolRequest {
        name: "upscale_image".to_string(),
        arguments: Some(json!({"image_url": "https://example.com/low.png", "scale": 4})),
    };

    let response = tools_call(Some(request), &context).await.unwrap();
    let result = content_json(&response);

    assert_eq!(result["status"], "success");
    assert_eq!(result["model"], "Clarity Upscaler");
    assert_eq!(result["output"], json!(["https://replicate.delivery/high.png"]));
    assert_eq!(context.budget().spent(), 0.005);
}

#[tokio::test]
async fn test_remote_failure_leaves_budget_untouched() {
    let (server, context) = mock_context(10.0).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let request = CallToolRequest {
        name: "generate_video".to_string(),
        arguments: Some(json!({"prompt": "waves crashing"})),
    };

    let response = tools_call(Some(request), &context).await.unwrap();
    let payload = content_json(&response);

    let message = payload["error"].as_str().unwrap();
    assert!(message.contains("500"), "unexpected message: {message}");
    assert_eq!(context.budget().spent(), 0.0);
}

#[tokio::test]
async fn test_unknown_model_dispatches_with_fallback_cost() {
    let (server, context) = mock_context(10.0).await;

    Mock::given(method("POST"))
        .and(path("/models/someone/brand-new-model/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "succeeded",
            "output": ["https://replicate.delivery/new.png"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CallToolRequest {
        name: "generate_image".to_string(),
        arguments: Some(json!({"prompt": "a fox", "model": "someone/brand-new-model"})),
    };

    let response = tools_call(Some(request), &context).await.unwrap();
    let result = content_json(&response);

    assert_eq!(result["status"], "success");
    assert_eq!(result["model"], "someone/brand-new-model");
    assert_eq!(result["cost"], 0.01);
    assert_eq!(context.budget().spent(), 0.01);
}

#[tokio::test]
async fn test_generate_logo_maps_format() {
    let (server, context) = mock_context(10.0).await;

    Mock::given(method("POST"))
        .and(path("/models/recraft-ai/recraft-v3-svg/predictions"))
        .and(body_partial_json(json!({
            "input": {"prompt": "minimal mountain emblem", "output_format": "svg"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "succeeded",
            "output": ["https://replicate.delivery/logo.svg"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CallToolRequest {
        name: "generate_logo".to_string(),
        arguments: Some(json!({"prompt": "minimal mountain emblem", "format": "svg"})),
    };

    let response = tools_call(Some(request), &context).await.unwrap();
    let result = content_json(&response);

    assert_eq!(result["status"], "success");
    assert_eq!(result["model"], "Recraft V3 SVG");
    assert_eq!(result["output"], json!(["https://replicate.delivery/logo.svg"]));
}

#[tokio::test]
async fn test_spending_accumulates_across_calls() {
    let (server, context) = mock_context(0.11).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "succeeded",
            "output": ["https://replicate.delivery/a.png"]
        })))
        .mount(&server)
        .await;

    for _ in 0..2 {
        let request = CallToolRequest {
            name: "generate_image".to_string(),
            arguments: Some(json!({"prompt": "a tree", "model": "flux-pro"})),
        };
        let response = tools_call(Some(request), &context).await.unwrap();
        assert_eq!(content_json(&response)["status"], "success");
    }

    // Two 0.055 runs exhaust the 0.11 ceiling exactly; the third is
    // rejected before reaching the network.
    let request = CallToolRequest {
        name: "generate_image".to_string(),
        arguments: Some(json!({"prompt": "a tree", "model": "flux-pro"})),
    };
    let response = tools_call(Some(request), &context).await.unwrap();
    assert_eq!(content_json(&response)["error"], "Budget limit exceeded");
    assert_eq!(context.budget().spent(), 0.11);

    let budget = CallToolRequest {
        name: "check_budget".to_string(),
        arguments: None,
    };
    let status = content_json(&tools_call(Some(budget), &context).await.unwrap());
    assert_eq!(status["budget_spent"], 0.11);
    assert_eq!(status["budget_remaining"], 0.0);
    assert_eq!(status["percentage_used"], 100.0);
}
