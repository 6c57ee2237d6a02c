use clap::{Parser, ValueEnum};
use vantage_mcp::constants::server::{HTTP_BIND, NAME, VERSION};
use vantage_mcp::mcp::server::{run_http, run_stdio};
use vantage_mcp::services::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

/// MCP server exposing read-only Vantage cost data.
#[derive(Debug, Parser)]
#[command(name = NAME, disable_version_flag = true)]
struct Cli {
    /// Print the server version and exit.
    #[arg(long)]
    version: bool,

    /// Transport to serve on. `http` binds 127.0.0.1:8787.
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", VERSION);
        return;
    }

    let settings = Settings::from_env();
    let result = match cli.transport {
        Transport::Stdio => run_stdio(settings).await,
        Transport::Http => run_http(settings, HTTP_BIND).await,
    };
    if let Err(err) = result {
        eprintln!("{}: {}", NAME, err);
        std::process::exit(1);
    }
}
