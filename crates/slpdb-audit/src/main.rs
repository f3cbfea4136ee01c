//! `slpdb-audit` - schema audit for an SLPDB instance.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slpdb_audit::{checks, AuditConfig, Check, ConfigOverrides, Runner, SlpdbClient};
use slpdb_query::Collection;

/// SLPDB schema audit: asserts no document violates field presence, type
/// and format invariants.
#[derive(Parser, Debug)]
#[command(name = "slpdb-audit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Arguments for `run`, which is also the default command
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the audit against an slpserve endpoint
    Run(RunArgs),
    /// List the checks without contacting the endpoint
    List {
        /// Only list checks for these collections (tag or name)
        #[arg(short, long)]
        collection: Vec<String>,
    },
    /// Print the query a check sends
    Query {
        /// Check id, as printed by `list`
        id: String,
        /// Also print the request URL for this endpoint
        #[arg(long, env = "SLPSERVE_URL")]
        endpoint: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// slpserve query endpoint, e.g. https://slpserve.example/q
    #[arg(short, long, env = "SLPSERVE_URL")]
    endpoint: Option<String>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only audit these collections (tag or name)
    #[arg(short, long)]
    collection: Vec<String>,

    /// Number of checks in flight
    #[arg(long, env = "SLPDB_AUDIT_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Violating documents returned per check, for diagnostics
    #[arg(long)]
    limit: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also print passing checks
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl RunArgs {
    /// File config first, flags and environment on top.
    fn into_config(self) -> anyhow::Result<AuditConfig> {
        let file = match &self.config {
            Some(path) => AuditConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => AuditConfig::default(),
        };
        let config = file.merge(ConfigOverrides {
            endpoint: self.endpoint,
            collections: self.collection,
            concurrency: self.concurrency,
            limit: self.limit,
            timeout_secs: self.timeout,
        });
        config.validate()?;
        Ok(config)
    }
}

fn selected_checks(collections: &[Collection]) -> Vec<Check> {
    collections
        .iter()
        .flat_map(|c| checks::for_collection(*c))
        .collect()
}

async fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let format = args.format;
    let verbose = args.verbose;
    let progress = !args.no_progress && format == OutputFormat::Text;

    let config = args.into_config()?;
    let checks = selected_checks(&config.selected_collections()?);
    tracing::info!("Auditing {} checks via {}", checks.len(), config.endpoint);

    let client = SlpdbClient::new(&config)?;
    let report = Runner::from_config(client, &config)
        .with_progress(progress)
        .run(&checks)
        .await;

    match format {
        OutputFormat::Text => print!("{}", report.render_text(verbose)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list(collections: &[String]) -> anyhow::Result<()> {
    let config = AuditConfig {
        collections: collections.to_vec(),
        ..AuditConfig::default()
    };
    for check in selected_checks(&config.selected_collections()?) {
        println!("{:<60} {}", check.id(), check.description());
    }
    Ok(())
}

fn query(id: &str, endpoint: Option<&str>) -> anyhow::Result<()> {
    let check = checks::find(id).with_context(|| format!("no check with id '{id}'"))?;
    let query = check.query(slpdb_query::DEFAULT_LIMIT)?;

    println!("{}", check.description());
    println!("{}", query.to_json()?);
    if let Some(endpoint) = endpoint {
        println!("{}", query.request_url(endpoint)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so JSON output on stdout stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run(cli.run).await,
        Some(Command::Run(args)) => run(args).await,
        Some(Command::List { collection }) => list(&collection).map(|()| ExitCode::SUCCESS),
        Some(Command::Query { id, endpoint }) => {
            query(&id, endpoint.as_deref()).map(|()| ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_the_default_command() {
        let cli = Cli::try_parse_from(["slpdb-audit", "--endpoint", "http://localhost:3000/q"])
            .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.endpoint.as_deref(), Some("http://localhost:3000/q"));
        assert_eq!(cli.run.format, OutputFormat::Text);
    }

    #[test]
    fn test_query_subcommand() {
        let cli = Cli::try_parse_from(["slpdb-audit", "query", "t:exists:tokenDetails"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Query { ref id, .. }) if id == "t:exists:tokenDetails"
        ));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"endpoint: http://file:3000/q\nconcurrency: 2\nlimit: 4\n",
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "slpdb-audit",
            "run",
            "--config",
            path,
            "--endpoint",
            "http://flag:3000/q",
            "--concurrency",
            "3",
        ])
        .unwrap();
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        let config = args.into_config().unwrap();

        assert_eq!(config.endpoint, "http://flag:3000/q");
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.limit, 4);
    }
}
