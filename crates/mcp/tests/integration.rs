use gaokao_core::{HeaderPool, MajorCatalog, MajorFetcher, OutputFormat};
use gaokao_mcp::{McpServer, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CS_DETAIL_PATH: &str = "/www/2.0/special/276/pc_special_detail.json";

fn request(method: &str, params: Option<Value>) -> String {
    let req = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    });
    serde_json::to_string(&req).unwrap()
}

fn tool_call(name: &str, arguments: Value) -> String {
    request(
        "tools/call",
        Some(json!({
            "name": name,
            "arguments": arguments
        })),
    )
}

fn parse_response(response: &str) -> Value {
    serde_json::from_str(response).unwrap()
}

fn get_text_content(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or("")
}

fn is_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}

fn create_server(feed_url: &str, format: OutputFormat) -> McpServer {
    let headers = Arc::new(HeaderPool::embedded().unwrap());
    let registry = ToolRegistry::new(
        Arc::new(MajorCatalog::embedded().unwrap()),
        MajorFetcher::new(headers).unwrap().with_base_url(feed_url),
        format,
    );
    McpServer::new(Arc::new(registry))
}

fn offline_server() -> McpServer {
    create_server("http://127.0.0.1:1", OutputFormat::Json)
}

fn cs_detail() -> Value {
    json!({
        "code": "0000",
        "data": {
            "name": "计算机科学与技术",
            "level1_name": "工学",
            "type": "计算机类",
            "type_detail": "计算机类",
            "code": "080901",
            "limit_year": "四年",
            "degree": "工学学士",
            "jobrate": [
                {"year": "2022", "rate": "94%"},
                {"year": "2023", "rate": "95%"}
            ],
            "professionalsalary": {
                "majorsalaryavg": [9200, 12800, 0, 0],
                "allmajorsalaryavg": [6500, 8600, 11200, 15800]
            },
            "jobdetail": {
                "1": [{"name": "互联网", "rate": 30}],
                "2": [{"area": "广东", "rate": 25}],
                "3": [{"detail_pos": "软件工程师", "rate": 12, "detail_job": "Java开发", "name": "IT/互联网"}]
            }
        }
    })
}

async fn mount_cs_detail(feed: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CS_DETAIL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cs_detail()))
        .expect(1)
        .mount(feed)
        .await;
}

// ============================================================================
// MCP Protocol Tests
// ============================================================================

#[tokio::test]
async fn initialize_returns_server_info() {
    let server = offline_server();
    let resp = server
        .handle_request(&request("initialize", Some(json!({}))))
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["id"], 1);
    assert_eq!(json["result"]["serverInfo"]["name"], "gaokao-mcp");
    assert!(json["result"]["serverInfo"]["version"].as_str().is_some());
    assert_eq!(json["result"]["protocolVersion"], "2024-11-05");
    assert!(json["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn initialized_notification_returns_nothing() {
    let server = offline_server();
    let notification = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
    assert!(server.handle_request(notification).await.is_none());
}

#[tokio::test]
async fn initialized_with_id_returns_nothing() {
    let server = offline_server();
    assert!(server
        .handle_request(&request("initialized", None))
        .await
        .is_none());
    assert!(server
        .handle_request(&request("notifications/initialized", None))
        .await
        .is_none());
}

#[tokio::test]
async fn null_id_request_is_answered() {
    let server = offline_server();
    let resp = server
        .handle_request(r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#)
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    assert_eq!(json["id"], Value::Null);
    assert!(json.as_object().unwrap().contains_key("id"));
    assert_eq!(json["result"], json!({}));
}

#[tokio::test]
async fn ping_returns_empty_object() {
    let server = offline_server();
    let resp = server.handle_request(&request("ping", None)).await.unwrap();
    let json: Value = parse_response(&resp);

    assert_eq!(json["result"], json!({}));
}

#[tokio::test]
async fn tools_list_returns_query_major_info() {
    let server = offline_server();
    let resp = server
        .handle_request(&request("tools/list", None))
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    let tools = json["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);

    let tool = &tools[0];
    assert_eq!(tool["name"], "query_major_info");
    assert!(tool["description"].as_str().unwrap().contains("就业率"));

    let schema = &tool["inputSchema"];
    assert_eq!(schema["type"], "object");
    assert!(schema["properties"]["major_name"].is_object());
    assert_eq!(schema["properties"]["major_level"]["enum"], json!(["本科", "专科"]));
    assert!(schema.get("title").is_none());
}

#[tokio::test]
async fn unknown_method_returns_error() {
    let server = offline_server();
    let resp = server
        .handle_request(&request("resources/list", None))
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    assert!(json["error"].is_object());
    assert_eq!(json["error"]["code"], -32601);
}

#[tokio::test]
async fn invalid_json_returns_parse_error() {
    let server = offline_server();
    let resp = server.handle_request("not valid json").await.unwrap();
    let json: Value = parse_response(&resp);

    assert!(json["error"].is_object());
    assert_eq!(json["error"]["code"], -32700);
    assert_eq!(json["id"], Value::Null);
}

#[tokio::test]
async fn request_without_method_is_invalid() {
    let server = offline_server();
    let resp = server
        .handle_request(r#"{"jsonrpc": "2.0", "id": 7}"#)
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    assert_eq!(json["error"]["code"], -32600);
    assert_eq!(json["id"], 7);
}

#[tokio::test]
async fn tool_call_missing_params_returns_error() {
    let server = offline_server();
    let resp = server
        .handle_request(&request("tools/call", None))
        .await
        .unwrap();
    let json: Value = parse_response(&resp);

    assert_eq!(json["error"]["code"], -32602);
}

// ============================================================================
// query_major_info Tests
// ============================================================================

#[tokio::test]
async fn query_major_info_returns_json() {
    let feed = MockServer::start().await;
    mount_cs_detail(&feed).await;
    let server = create_server(&feed.uri(), OutputFormat::Json);

    let resp = server
        .handle_request(&tool_call(
            "query_major_info",
            json!({"major_name": "计算机科学与技术", "major_level": "本科"}),
        ))
        .await
        .unwrap();
    let json = parse_response(&resp);
    let text = get_text_content(&json);

    assert!(!is_error(&json));
    let payload = text
        .strip_prefix("query_major_info invocation succeeded. Result:\n")
        .unwrap();
    let result: Value = serde_json::from_str(payload).unwrap();

    assert_eq!(result["名称"], "计算机科学与技术");
    assert_eq!(result["类别"], "工学>计算机类>计算机类");
    assert_eq!(result["就业率"], json!({"year": ["2022", "2023"], "rate": ["94%", "95%"]}));
    assert_eq!(result["薪酬"]["本专业平均薪酬/月"], json!([9200, 12800, 0, 0]));
    assert_eq!(result["就业行业分布"], json!([{"行业": "互联网", "rate": "30%"}]));
    assert_eq!(result["就业地区分布"], json!([{"地区": "广东", "rate": "25%"}]));
    assert_eq!(result["社会名人"], Value::Null);
}

#[tokio::test]
async fn query_major_info_returns_markdown() {
    let feed = MockServer::start().await;
    mount_cs_detail(&feed).await;
    let server = create_server(&feed.uri(), OutputFormat::Markdown);

    let resp = server
        .handle_request(&tool_call(
            "query_major_info",
            json!({"major_name": "计算机", "major_level": "本科"}),
        ))
        .await
        .unwrap();
    let json = parse_response(&resp);
    let text = get_text_content(&json);

    assert!(!is_error(&json));
    assert!(text.starts_with("query_major_info invocation succeeded. Result:\n# 计算机科学与技术"));
    assert!(text.contains("**代码:** 080901"));
    assert!(text.contains("- 2023: 95%"));
    assert!(text.contains("- 5年经验: N/A"));
    assert!(text.contains("- 2年经验: 12800 元"));
    assert!(text.contains("**社会名人:** N/A"));
}

#[tokio::test]
async fn unknown_tool_returns_failed_result() {
    let server = offline_server();
    let resp = server
        .handle_request(&tool_call("query_school_info", json!({})))
        .await
        .unwrap();
    let json = parse_response(&resp);

    assert!(json.get("error").is_none());
    assert!(is_error(&json));
    let text = get_text_content(&json);
    assert!(text.starts_with("query_school_info invocation failed. Error:"));
    assert!(text.contains("unknown tool: query_school_info"));
}

#[tokio::test]
async fn missing_major_level_never_reaches_feed() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cs_detail()))
        .expect(0)
        .mount(&feed)
        .await;
    let server = create_server(&feed.uri(), OutputFormat::Json);

    let resp = server
        .handle_request(&tool_call(
            "query_major_info",
            json!({"major_name": "计算机科学与技术"}),
        ))
        .await
        .unwrap();
    let json = parse_response(&resp);

    assert!(is_error(&json));
    let text = get_text_content(&json);
    assert!(text.starts_with("query_major_info invocation failed. Error: invalid arguments:"));
    assert!(text.contains("major_level"));
}

#[tokio::test]
async fn extra_argument_is_rejected() {
    let server = offline_server();
    let resp = server
        .handle_request(&tool_call(
            "query_major_info",
            json!({"major_name": "哲学", "major_level": "本科", "year": 2024}),
        ))
        .await
        .unwrap();
    let json = parse_response(&resp);

    assert!(is_error(&json));
    assert!(get_text_content(&json).contains("invalid arguments"));
}

#[tokio::test]
async fn unknown_major_reports_name_and_level() {
    let server = offline_server();
    let resp = server
        .handle_request(&tool_call(
            "query_major_info",
            json!({"major_name": "航天工程", "major_level": "专科"}),
        ))
        .await
        .unwrap();
    let json = parse_response(&resp);

    assert!(is_error(&json));
    let text = get_text_content(&json);
    assert!(text.contains("\"航天工程\""));
    assert!(text.contains("专科"));
}

#[tokio::test]
async fn feed_error_status_returns_failed_result() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CS_DETAIL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed)
        .await;

    for format in [OutputFormat::Json, OutputFormat::Markdown] {
        let server = create_server(&feed.uri(), format);
        let resp = server
            .handle_request(&tool_call(
                "query_major_info",
                json!({"major_name": "计算机科学与技术", "major_level": "本科"}),
            ))
            .await
            .unwrap();
        let json = parse_response(&resp);

        assert!(is_error(&json));
        let text = get_text_content(&json);
        assert!(text.starts_with("query_major_info invocation failed. Error:"));
        assert!(text.contains("503"));
    }
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CS_DETAIL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cs_detail()))
        .expect(8)
        .mount(&feed)
        .await;
    let server = create_server(&feed.uri(), OutputFormat::Json);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            server
                .handle_request(&tool_call(
                    "query_major_info",
                    json!({"major_name": "计算机科学与技术", "major_level": "本科"}),
                ))
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let json = parse_response(&handle.await.unwrap());
        assert!(!is_error(&json));
    }
}
