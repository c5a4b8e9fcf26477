use crate::{
    Config,
    config::{ORGANIZATION_VAR, TOKEN_VAR},
    console::Console,
    runner::Summary,
    scenario::Scenario,
};
use std::io::Write;

const SUMMARY_WIDTH: usize = 65;
const LABEL_WIDTH: usize = 23;

/// Prints the pass/fail table, then either the integration snippet (when
/// the streamable HTTP scenario passed) or a troubleshooting checklist.
pub fn print_summary<W: Write>(console: &mut Console<W>, summary: &Summary, config: &Config) {
    console.banner("📊 TEST SUMMARY", SUMMARY_WIDTH);
    for outcome in &summary.outcomes {
        let label = format!("{}:", outcome.name());
        let status = console.status(outcome.passed);
        console.line(format!("{label:<LABEL_WIDTH$}{status}"));
    }

    console.blank();
    if summary.passed(Scenario::ContextManaged) {
        console.line("🎉 SUCCESS! Use the streamable HTTP transport:");
        console.line(usage_snippet(config));
    } else {
        console.fail("All tests failed. Check your server and configuration.");
        for line in checklist(config) {
            console.line(line);
        }
    }
}

pub fn checklist(config: &Config) -> Vec<String> {
    vec![
        "Make sure:".to_string(),
        "1. The MCP server is running".to_string(),
        format!("2. Environment variables are set: {TOKEN_VAR}, {ORGANIZATION_VAR}"),
        "3. PAT token has correct permissions".to_string(),
        format!("4. Server is accessible at {}", config.server_url),
    ]
}

/// Ready to paste example of the recommended integration.
pub fn usage_snippet(config: &Config) -> String {
    let url = config.server_url.trim_end_matches('/');
    format!(
        r#"
// Recommended integration:
use ado_mcp_smoke::{{Config, Connector, HttpConnector, Lifecycle, Session, with_session}};

let config = Config::new("{url}")
    .with_token("YOUR_PAT_TOKEN")
    .with_organization("YOUR_ORG_NAME");
let connection = config.connection()?;
let connector = HttpConnector::new();

// Scoped approach (recommended): the session is closed when the body returns
let mut lifecycle = Lifecycle::new("example");
with_session(&connector, &connection, &mut lifecycle, async |session, _| {{
    let projects = session.call_tool("core_list_projects", Default::default()).await?;
    let work_items = session.call_tool("wit_my_work_items", Default::default()).await?;
    Ok(())
}})
.await?;

// Or manual approach
let session = connector.connect(&connection).await?;
let tools = session.list_tools().await?;
println!("Available tools: {{:?}}", tools.iter().map(|tool| &tool.name).collect::<Vec<_>>());
session.close().await?;
"#
    )
}
