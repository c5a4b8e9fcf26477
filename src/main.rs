use ado_mcp_smoke::{Args, HttpConnector, console::Console, report, runner::Runner};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.config();
    tracing::debug!(?config, "loaded configuration");

    let mut console = Console::stdout(!args.no_color);
    console.line("🚀 Azure DevOps MCP Server - Streamable HTTP Integration Test");
    console.rule(65);

    // failures are reported, never turned into an exit code
    let connector = HttpConnector::new();
    let summary = Runner::new(&connector, &config).run(&mut console).await;
    report::print_summary(&mut console, &summary, &config);

    Ok(())
}
