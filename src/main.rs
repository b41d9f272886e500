use clap::{Parser, Subcommand};
use futures::future::join_all;

use versionator::config::Config;
use versionator::version::factory::build_registry;
use versionator::version::http::HttpClient;

#[derive(Parser)]
#[command(name = "versionator")]
#[command(version, about = "Look up the latest published version of packages across registries")]
struct Cli {
    /// Request timeout in seconds (overrides VERSIONATOR_REQUEST_TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Query one or more packages and print the results as JSON
    Get {
        /// Registry name or alias (e.g. npm, python, cargo)
        manager: String,
        /// Package identifiers
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// List supported registries and their aliases
    Registries,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout_secs(seconds)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let _guard = versionator::log::init()?;
            runtime.block_on(versionator::mcp::run_server(config))
        }
        Command::Get { manager, packages } => runtime.block_on(get(config, &manager, &packages)),
        Command::Registries => registries(config),
    }
}

async fn get(config: Config, manager: &str, packages: &[String]) -> anyhow::Result<()> {
    let factory = build_registry(HttpClient::new(config.request_timeout)?)?;

    let results = join_all(
        packages
            .iter()
            .map(|package| factory.get_latest_version(manager, package)),
    )
    .await;

    let mut failures = 0;
    for (package, result) in packages.iter().zip(results) {
        match result {
            Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", package, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} lookups failed", failures, packages.len());
    }
    Ok(())
}

fn registries(config: Config) -> anyhow::Result<()> {
    let factory = build_registry(HttpClient::new(config.request_timeout)?)?;

    for name in factory.registry_names() {
        let aliases = factory.aliases_of(name);
        if aliases.is_empty() {
            println!("{}", name);
        } else {
            println!("{} ({})", name, aliases.join(", "));
        }
    }
    Ok(())
}
