use anyhow::Result;
use axum::Router;
use clap::Parser;
use docsim_core::corpus::load_corpus;
use docsim_core::Index;
use docsim_server::{build_app, CorpusArgs, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    corpus: CorpusArgs,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Results returned when a request gives no count
    #[arg(long, default_value_t = 10)]
    default_k: usize,
    /// Largest result count a request may ask for
    #[arg(long, default_value_t = 100)]
    max_k: usize,
    #[arg(long, default_value_t = 4096)]
    max_query_chars: usize,
    /// Comma-separated allowed CORS origins
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let docs = load_corpus(&args.corpus.corpus, &args.corpus.load_options())?;
    let index = Arc::new(Index::build(docs, args.corpus.tokenizer())?);

    let config = ServerConfig {
        default_k: args.default_k,
        max_k: args.max_k,
        max_query_chars: args.max_query_chars,
        cors_allow_origin: args.cors_allow_origin,
    };
    let app: Router = build_app(index, config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
