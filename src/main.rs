use clap::{Parser, Subcommand};
use search_proxy::api;
use search_proxy::config::Config;
use search_proxy::upstream::SearchClient;

#[derive(Parser, Debug)]
#[command(version, about = "Local JSON proxy for DuckDuckGo Lite results")]
struct Cli {
    /// Address to bind (overrides SEARCH_PROXY_BIND)
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides SEARCH_PROXY_PORT)
    #[arg(long, short, global = true)]
    port: Option<u16>,

    /// Upstream results page (overrides SEARCH_UPSTREAM_URL)
    #[arg(long, global = true)]
    upstream: Option<String>,

    /// Outbound request timeout in milliseconds (overrides SEARCH_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Maximum results per response (overrides SEARCH_RESULT_CAP)
    #[arg(long, global = true)]
    result_cap: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP proxy (default)
    Serve,
    /// Run a single search against the upstream and print the JSON response
    Query {
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(upstream) = &self.upstream {
            config.upstream_url = upstream.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(result_cap) = self.result_cap {
            config.result_cap = result_cap;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env());

    match cli.command {
        Some(Command::Query { terms }) => {
            let client = SearchClient::new(&config)?;
            let response = client.search(&terms.join(" ")).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some(Command::Serve) | None => api::serve(config).await?,
    }
    Ok(())
}
