use clap::Parser;
use std::process;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vota::agents::MemorySaver;
use vota::cli::Args;
use vota::config::{load_dotenv, ConfigManager};
use vota::contracts::{TestChain, VotingDeployer};
use vota::error::VotaResult;
use vota::providers::ClaudeClient;
use vota::scenarios::ScenarioContext;
use vota::tools::TavilySearchTool;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing; logs go to stderr so stdout only carries agent output
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> VotaResult<()> {
    let env_file = load_dotenv()?;
    info!("🗳️  vota v{} (env from {})", vota::VERSION, env_file.display());

    let config = ConfigManager::new(args.config.clone()).load_config().await?;

    let chain = TestChain::spawn(&config.chain)?;
    let contract = VotingDeployer::from_config(&config.chain).deploy(&chain).await?;

    let context = ScenarioContext {
        model: Arc::new(ClaudeClient::new(&config.model)?),
        search: Arc::new(TavilySearchTool::new(&config.search)?),
        contract: Arc::new(contract),
        memory: Arc::new(MemorySaver::new()),
        agent: config.agent.clone(),
    };

    let scenarios = args.scenarios();
    if scenarios.is_empty() {
        info!("No scenario selected; pass -w, -m or -c");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for scenario in scenarios {
        context.run(scenario, &mut out).await?;
    }

    Ok(())
}
