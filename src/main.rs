use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use comic_pages::prelude::*;
use comic_pages::server;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(version, about = "Load a comic archive and serve its pages by id")]
struct Cli {
    /// Comic archive (cbz, zip, cbr, rar) or a folder of images.
    archive: PathBuf,
    /// TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
    /// Directory served for every request outside the page route.
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Extraction workers (default: 2 per logical core).
    #[arg(short, long)]
    workers: Option<usize>,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(bind) = self.bind {
            settings.bind = bind;
        }
        if let Some(assets) = &self.assets {
            settings.assets_dir = Some(assets.clone());
        }
        if let Some(workers) = self.workers {
            settings.workers = Some(workers);
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    log::info!("Initialising {}...", NAME);

    let cli = Cli::parse();
    let settings = cli.settings()?;

    let app = App::new(&settings);
    let book = app
        .load_book(&cli.archive)
        .await
        .with_context(|| format!("Failed to load {}", cli.archive.display()))?;
    log::info!("{} pages ready, starting at page {}", book.pages, book.id);

    let handler: Arc<dyn Handler> = match &settings.assets_dir {
        Some(dir) => Arc::new(app.routes(StaticAssets::new(dir))),
        None => Arc::new(app.routes(server::not_found)),
    };

    let listener = TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("Cannot listen on {}", settings.bind))?;
    log::info!(
        "Serving pages on http://{}{}/<id>",
        listener.local_addr()?,
        settings.route_prefix
    );

    tokio::select! {
        _ = server::serve(listener, handler) => {}
        _ = tokio::signal::ctrl_c() => log::info!("Shutting down"),
    }
    Ok(())
}
