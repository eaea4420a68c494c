use bucket_mirror::infrastructure::storage;
use bucket_mirror::{MirrorConfig, MirrorService, StorageConfig, Timeouts};
use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mirror a bucket prefix (s3://bucket/prefix or gs://bucket/prefix) into a local directory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of concurrent copy tasks (default: 1)
    #[arg(short = 'm', long = "max-concurrency", value_parser = clap::value_parser!(u32).range(1..))]
    max_concurrency: Option<u32>,

    /// Exit with a failure status if any object could not be copied
    #[arg(long)]
    fail_on_error: bool,

    /// Source location, e.g. gs://bucket/path/
    store_uri: String,

    /// Local directory the objects are written under
    local_root: PathBuf,
}

impl Args {
    fn concurrency(&self) -> usize {
        self.max_concurrency.map_or(1, |n| n as usize)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucket_mirror=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MirrorConfig::new(&args.store_uri, &args.local_root, args.concurrency()) {
        Ok(config) => config
            .with_timeouts(Timeouts::from_env())
            .with_fail_on_error(args.fail_on_error),
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "🚀 Mirroring {} into {}",
        config.store,
        config.local_root.display()
    );

    let store = storage::setup_storage(&config.store, &StorageConfig::from_env()).await;

    match MirrorService::new(config, store).run().await {
        Ok(report) => {
            info!("✅ Done, {} of {} objects copied", report.copied, report.listed);
            Ok(())
        }
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
