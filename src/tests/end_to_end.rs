use super::*;
use crate::{HttpConnector, find_tool, runner::Runner, scenario::work_item_arguments};
use serde_json::json;
use tokio::test;

#[test]
async fn test_both_scenarios_pass_against_server() {
    let server = TestServer::start(TOKEN, ORGANIZATION).await.unwrap();
    let config = config(server.url());
    let connector = HttpConnector::new();
    let mut console = Console::plain(Vec::new());

    let summary = Runner::new(&connector, &config).run(&mut console).await;
    let output = String::from_utf8(console.into_inner()).unwrap();

    assert!(summary.all_passed(), "{output}");
    assert!(output.contains("Connected to MCP server with 4 tools available"));
    assert!(output.contains("✅ Tool available: core_list_projects"));
    assert!(output.contains("✅ Tool available: wit_my_work_items"));
    assert!(output.contains("✅ Tool available: core_list_project_teams"));
    assert!(output.contains(r#"Retrieved work item details: {"id":741532,"project":"IS7"}"#));
    assert!(output.contains("✅ Disconnected from MCP server"));
}

#[test]
async fn test_session_lists_and_invokes_tools() {
    let server = TestServer::start(TOKEN, ORGANIZATION).await.unwrap();
    let connection = config(server.url()).connection().unwrap();

    let session = HttpConnector::new().connect(&connection).await.unwrap();
    let tools = session.list_tools().await.unwrap();
    let mut names: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "core_list_project_teams",
            "core_list_projects",
            "wit_get_work_item",
            "wit_my_work_items",
        ]
    );
    assert!(tools.iter().all(|tool| tool.description.is_some()));

    let tool = find_tool(&tools, &session, "wit_get_work_item").unwrap();
    assert_eq!(tool.name(), "wit_get_work_item");
    let value = tool.invoke(work_item_arguments()).await.unwrap();
    assert_eq!(value, json!({ "id": 741532, "project": "IS7" }));

    session.close().await.unwrap();
}

#[test]
async fn test_wrong_token_fails_both_scenarios() {
    let server = TestServer::start("another-pat", ORGANIZATION).await.unwrap();
    let config = config(server.url());
    let connector = HttpConnector::new();

    let (passed, output) = run(Scenario::ContextManaged, &connector, &config).await;
    assert!(!passed);
    assert!(output.contains("Error type: Connect"), "{output}");

    let (passed, output) = run(Scenario::ManualLifecycle, &connector, &config).await;
    assert!(!passed);
    assert!(output.contains("Manual connection test failed"), "{output}");
}

#[test]
async fn test_wrong_organization_is_rejected() {
    let server = TestServer::start(TOKEN, "fabrikam").await.unwrap();
    let connection = config(server.url()).connection().unwrap();

    let err = HttpConnector::new().connect(&connection).await.err().unwrap();
    assert_eq!(err.kind(), "Connect");
}

#[test]
async fn test_unreachable_server() {
    // grab a free port and release it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config(&format!("http://{addr}"));
    let (passed, output) = run(Scenario::ContextManaged, &HttpConnector::new(), &config).await;

    assert!(!passed);
    assert!(output.contains(&format!("failed to connect to http://{addr}/mcp")));
}

#[test]
async fn test_server_rejects_requests_without_both_headers() {
    let server = TestServer::start(TOKEN, ORGANIZATION).await.unwrap();
    let endpoint = format!("{}/mcp", server.url());
    let http = reqwest::Client::new();
    let initialize = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}});

    let bare = http.post(&endpoint).json(&initialize).send().await.unwrap();
    assert_eq!(bare.status(), reqwest::StatusCode::UNAUTHORIZED);

    let token_only = http
        .post(&endpoint)
        .bearer_auth(TOKEN)
        .json(&initialize)
        .send()
        .await
        .unwrap();
    assert_eq!(token_only.status(), reqwest::StatusCode::UNAUTHORIZED);
}
