use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use uts_language_server::config::ServerConfig;
use uts_language_server::logging::init_logger;
use uts_language_server::lsp::backend::UtsBackend;

/// Language server for UTS sources, speaking LSP over stdio.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Log level filter for stderr, e.g. `debug` or `uts_language_server=trace`.
    /// Defaults to RUST_LOG, then `info`.
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in log output.
    #[arg(long)]
    no_color: bool,

    /// Do not write a session log to the cache directory.
    #[arg(long)]
    no_file_logging: bool,

    /// Communicate over stdin/stdout. Accepted for client compatibility;
    /// stdio is the only transport.
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logger(args.no_color, args.log_level.as_deref(), !args.no_file_logging)?;

    let config = ServerConfig::from_env_or_default(None);
    info!("Starting {} {} with {:?}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), config);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(|client| UtsBackend::new(client, config));

    Server::new(stdin, stdout, socket).serve(service).await;
    info!("Language server stopped");
    Ok(())
}
