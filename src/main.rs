use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use recordroute::middleware::{AuditLogStage, Chain};
use recordroute::registry;
use recordroute::router::Router;
use recordroute::server::{raw, AppService};
use recordroute::store::RecordStore;

#[derive(Parser)]
#[command(name = "recordroute")]
#[command(about = "Middleware-driven HTTP core over a JSON-file record store", long_about = None)]
struct Args {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// Backing JSON document for the record store
    #[arg(long, default_value = "data/records.json")]
    data: PathBuf,

    /// Append-only audit log file
    #[arg(long, default_value = "log.txt")]
    audit_log: PathBuf,

    /// Run the raw dispatch loop instead of the router service
    #[arg(long, default_value_t = false)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.raw {
        return raw::serve(&args.addr, &args.audit_log);
    }

    let store = RecordStore::open(&args.data)?;
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AuditLogStage::new(&args.audit_log)));
    let mut router = Router::new();
    registry::register_routes(&mut router);
    AppService::new(chain, router, store).serve(&args.addr)
}
