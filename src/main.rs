use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use aspnet_language_server::config::{ClrVersion, ServerConfig};
use aspnet_language_server::logging::init_logger;
use aspnet_language_server::lsp::features::adapters::BuilderRegistry;
use aspnet_language_server::lsp::AspNetBackend;
use aspnet_language_server::type_system::TypeSystem;

/// Language server for ASP.NET Web Forms markup, speaking LSP over stdio.
#[derive(Parser, Debug)]
#[command(name = "aspnet-language-server", version)]
struct Args {
    /// Stderr log filter, e.g. "debug" or "aspnet_language_server=trace"
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Do not write a session log file
    #[arg(long)]
    no_file_logging: bool,

    /// Extra type index file or directory; may be repeated
    #[arg(long = "type-index", value_name = "PATH")]
    type_index: Vec<PathBuf>,

    /// Target runtime: 1.1, 2.0 or 4.0
    #[arg(long, value_name = "VERSION")]
    clr_version: Option<ClrVersion>,

    /// Column shift applied to tag ranges in the outline
    #[arg(long, value_name = "N")]
    outline_tag_column_offset: Option<u32>,

    /// Disable signature help inside expression blocks
    #[arg(long)]
    no_parameter_insight: bool,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(version) = self.clr_version {
            config.clr_version = version;
        }
        if let Some(offset) = self.outline_tag_column_offset {
            config.outline_tag_column_offset = offset;
        }
        config.enable_parameter_insight = !self.no_parameter_insight;
        config.type_index_paths = self.type_index.clone();
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logger(args.no_color, args.log_level.as_deref(), !args.no_file_logging)
        .context("failed to initialize logging")?;

    let config = args.server_config();
    info!("Starting aspnet-language-server {} ({:?})", env!("CARGO_PKG_VERSION"), config);
    let types = TypeSystem::bundled().context("failed to load the bundled type index")?;

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(|client| {
        AspNetBackend::new(client, config, BuilderRegistry::with_defaults(), types)
    });
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
