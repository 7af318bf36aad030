/// HTTP Transport
///
/// Exposes the dispatcher over HTTP with Actix Web:
/// - `GET /health` liveness, with no upstream dependency
/// - `GET /`, `GET /servers`, `GET /tools` introspection
/// - `POST /mcp` (and `POST /` for reverse proxies) JSON-RPC endpoint
/// - `OPTIONS` on any path answers 204; every response is CORS-open

use std::sync::Arc;

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer,
    error::PayloadError,
    http::Method,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde_json::json;

use crate::core::config::{GatewayConfig, HTTP_HOST, HTTP_PORT};
use crate::core::dispatcher::Dispatcher;
use crate::core::error::GatewayError;
use crate::core::protocol::{PROTOCOL_VERSION, SERVER_VERSION, SERVICE_ID, SERVICE_TITLE};
use crate::core::registry::{ServerRegistry, ToolRegistry};
use crate::tools::ToolExecutor;
use crate::upstream::ollama::OllamaClient;

/// State shared by every worker thread. Everything in it is read-only.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub tools: Arc<ToolRegistry>,
    pub servers: Arc<ServerRegistry>,
    /// Optional cap on JSON-RPC request bodies; `None` reads bodies of any size
    pub max_body_bytes: Option<usize>,
}

impl AppState {
    /// Build the registries and upstream clients from startup configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let tools = Arc::new(ToolRegistry::builtin());
        let servers = Arc::new(ServerRegistry::from_config(config));
        let ollama = OllamaClient::new(config.ollama_url.clone(), config.upstream_timeout)?;

        let dispatcher = Dispatcher::new(tools.clone(), ToolExecutor::new(Arc::new(ollama)));
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            tools,
            servers,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Why a request body could not be read.
#[derive(Debug, thiserror::Error)]
enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(#[from] PayloadError),
}

/// Drain the request stream into memory, stopping early once `limit` is passed.
async fn read_body(mut payload: web::Payload, limit: Option<usize>) -> Result<BytesMut, BodyError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if let Some(limit) = limit {
            if body.len() + chunk.len() > limit {
                return Err(BodyError::TooLarge(limit));
            }
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Health check endpoint for liveness checks.
///
/// Answers from local state only, so it stays `ok` while Ollama or n8n are down.
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": SERVICE_ID,
        "version": SERVER_VERSION
    }))
}

/// Service description: identity, protocol, registered servers and tools,
/// and the endpoint map.
///
/// # Arguments
/// * `state` - Shared registries to list
async fn describe(state: web::Data<AppState>) -> HttpResponse {
    let servers: Vec<&str> = state.servers.names().collect();
    let tools: Vec<&str> = state.tools.names().collect();
    HttpResponse::Ok().json(json!({
        "service": SERVICE_TITLE,
        "version": SERVER_VERSION,
        "protocol": format!("MCP {PROTOCOL_VERSION}"),
        "servers": servers,
        "tools": tools,
        "endpoints": {
            "mcp": "/mcp (POST - JSON-RPC)",
            "health": "/health",
            "servers": "/servers",
            "tools": "/tools"
        }
    }))
}

/// Dump of the upstream catalog as `{servers: {name: {url, description}}}`.
async fn list_servers(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "servers": state.servers.by_name() }))
}

/// Dump of the tool catalog as `{tools: {name: definition}}`.
async fn list_tools(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "tools": state.tools.by_name() }))
}

/// JSON-RPC endpoint. Protocol errors travel inside a 200 envelope; only a
/// body that cannot be read or parsed is reported as an HTTP error.
///
/// # Arguments
/// * `state` - Shared dispatcher and body limit
/// * `payload` - Raw request stream, read in full before dispatch
///
/// # Returns
/// 200 with the JSON-RPC response, 400 for an unreadable or malformed body,
/// or 413 when the configured body limit is exceeded. Errors are `{error}` JSON.
async fn rpc(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
    let body = match read_body(payload, state.max_body_bytes).await {
        Ok(body) => body,
        Err(e @ BodyError::TooLarge(_)) => {
            tracing::warn!(error = %e, "rejecting oversized JSON-RPC body");
            return HttpResponse::PayloadTooLarge().json(json!({ "error": e.to_string() }));
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read JSON-RPC body");
            return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
        }
    };

    match state.dispatcher.handle_body(&body).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed JSON-RPC body");
            HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
        }
    }
}

/// Anything no route claims: CORS preflight or 404.
async fn fallback(req: HttpRequest) -> HttpResponse {
    if *req.method() == Method::OPTIONS {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(json!({ "error": "Not found" }))
    }
}

/// Permissive CORS plus basic hardening headers on every response.
pub fn default_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
        .add(("X-Content-Type-Options", "nosniff"))
}

/// Register every route. Each resource falls back to `fallback` so that
/// unsupported methods on known paths behave like unknown paths; the app
/// itself must also use `fallback` as its default service.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
            web::resource("/")
                .route(web::get().to(describe))
                .route(web::post().to(rpc))
                .default_service(web::to(fallback)),
        )
        .service(
            web::resource("/mcp")
                .route(web::post().to(rpc))
                .default_service(web::to(fallback)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(health))
                .default_service(web::to(fallback)),
        )
        .service(
            web::resource("/servers")
                .route(web::get().to(list_servers))
                .default_service(web::to(fallback)),
        )
        .service(
            web::resource("/tools")
                .route(web::get().to(list_tools))
                .default_service(web::to(fallback)),
        );
}

/// Run the gateway's HTTP listener on the fixed port until shutdown.
pub async fn run_server_http(config: &GatewayConfig, state: AppState) -> std::io::Result<()> {
    let bind_addr = format!("{HTTP_HOST}:{HTTP_PORT}");
    let workers = config.worker_count();
    let state = web::Data::new(state);

    tracing::info!(
        bind = %bind_addr,
        workers,
        max_body_bytes = ?config.max_body_bytes,
        ollama = %config.ollama_url,
        n8n = %config.n8n_url,
        "MCP Gateway running on port {}",
        HTTP_PORT
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Compress::default())
            .wrap(default_headers())
            .wrap(Logger::new("%r %s %Dms"))
            .configure(routes)
            .default_service(web::to(fallback))
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::FakeLlm;
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    fn state(llm: FakeLlm) -> AppState {
        limited_state(llm, None)
    }

    fn limited_state(llm: FakeLlm, max_body_bytes: Option<usize>) -> AppState {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();
        let tools = Arc::new(ToolRegistry::builtin());
        let dispatcher = Dispatcher::new(tools.clone(), ToolExecutor::new(Arc::new(llm)));
        AppState {
            dispatcher: Arc::new(dispatcher),
            tools,
            servers: Arc::new(ServerRegistry::from_config(&config)),
            max_body_bytes,
        }
    }

    macro_rules! app {
        (state $state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .wrap(default_headers())
                    .configure(routes)
                    .default_service(web::to(fallback)),
            )
            .await
        };
        ($llm:expr) => {
            app!(state state($llm))
        };
    }

    #[actix_web::test]
    async fn health_is_ok_even_when_upstream_is_down() {
        let app = app!(FakeLlm::failing("unreachable"));
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"status": "ok", "service": "mcp-gateway", "version": "1.0.0"}));
    }

    #[actix_web::test]
    async fn responses_carry_cors_headers() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::get().uri("/tools").to_request();
        let resp = test::call_service(&app, req).await;

        let headers = resp.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers.get("access-control-allow-headers").unwrap(), "Content-Type");
    }

    #[actix_web::test]
    async fn options_preflight_is_no_content_on_any_path() {
        let app = app!(FakeLlm::replying(""));
        for path in ["/mcp", "/health", "/", "/anything/else"] {
            let req = test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri(path)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NO_CONTENT, "path {path}");
            assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
        }
    }

    #[actix_web::test]
    async fn tools_dump_is_keyed_by_name() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::get().uri("/tools").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let tools = body["tools"].as_object().unwrap();
        let names: Vec<&String> = tools.keys().collect();
        assert_eq!(names.len(), 3);
        assert_eq!(tools["chat"]["description"], json!("Send a message to an LLM and get a response"));
        assert_eq!(tools["list_models"]["inputSchema"], json!({"type": "object", "properties": {}}));
    }

    #[actix_web::test]
    async fn servers_dump_lists_upstreams() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::get().uri("/servers").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["servers"]["ollama"]["url"], json!("http://ollama:11434"));
        assert_eq!(body["servers"]["n8n"]["description"], json!("Workflow automation"));
    }

    #[actix_web::test]
    async fn root_describes_the_service() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["service"], json!("Ziggie MCP Gateway"));
        assert_eq!(body["protocol"], json!("MCP 2024-11-05"));
        assert_eq!(body["servers"], json!(["ollama", "n8n"]));
        assert_eq!(body["tools"], json!(["chat", "list_models", "trigger_workflow"]));
        assert_eq!(body["endpoints"]["mcp"], json!("/mcp (POST - JSON-RPC)"));
    }

    #[actix_web::test]
    async fn mcp_endpoint_runs_chat_tool() {
        let app = app!(FakeLlm::replying("hello"));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("content-type", "application/json"))
            .set_payload(
                r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"chat","arguments":{"message":"hi"}},"id":1}"#,
            )
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "result": {"content": [{"type": "text", "text": "hello"}]}, "id": 1})
        );
    }

    #[actix_web::test]
    async fn root_post_is_an_rpc_alias() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"jsonrpc":"2.0","method":"frobnicate","id":"abc"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "error": {"code": -32601, "message": "Method not found"}, "id": "abc"})
        );
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request() {
        let app = app!(FakeLlm::replying(""));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert!(body.get("jsonrpc").is_none());

        // The listener keeps serving afterwards.
        let req = test::TestRequest::get().uri("/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_routes_are_not_found() {
        let app = app!(FakeLlm::replying(""));
        for req in [
            test::TestRequest::get().uri("/nope").to_request(),
            test::TestRequest::get().uri("/mcp").to_request(),
            test::TestRequest::post().uri("/health").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"error": "Not found"}));
        }
    }

    #[actix_web::test]
    async fn large_body_is_accepted_without_a_limit() {
        let app = app!(FakeLlm::replying("read it"));
        let message = "x".repeat(5 * 1024 * 1024);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "chat", "arguments": {"message": message}},
            "id": 9
        });
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload(payload.to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["result"]["content"][0]["text"], json!("read it"));
    }

    #[actix_web::test]
    async fn body_over_configured_limit_gets_json_error() {
        let llm = FakeLlm::replying("unused");
        let app = app!(state limited_state(llm, Some(64)));
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "chat", "arguments": {"message": "y".repeat(256)}},
            "id": 1
        });
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload(payload.to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "request body exceeds 64 bytes"}));
    }

    #[actix_web::test]
    async fn body_within_configured_limit_is_dispatched() {
        let app = app!(state limited_state(FakeLlm::replying(""), Some(1024)));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload(r#"{"jsonrpc":"2.0","method":"prompts/list","id":2}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"jsonrpc": "2.0", "result": {"prompts": []}, "id": 2}));
    }

    #[actix_web::test]
    async fn state_builds_from_default_config() {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.tools.list_tools().len(), 3);
        assert_eq!(state.servers.names().collect::<Vec<_>>(), ["ollama", "n8n"]);
        assert_eq!(state.max_body_bytes, None);
    }
}
