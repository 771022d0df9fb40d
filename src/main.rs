use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fun_fortune::Config;

#[derive(Parser)]
#[command(name = "fun-fortune", version, about = "Fun Fortune personality quiz API")]
struct Cli {
    /// Host to bind (overrides HOST).
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind (overrides PORT).
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap so its env fallbacks see the file.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fun_fortune=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    fun_fortune::app::run(config).await?;
    Ok(())
}
