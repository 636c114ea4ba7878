mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, FilterArgs};
use fetchtv_core::{filter_recordings, FetchConfig, ListMode, SentinelProbe, ShowRecordings};
use fetchtv_device::{discover_server, resolve_content_directory, ContentDirectory, HttpClient};
use fetchtv_persistence::SavedLedger;
use fetchtv_recorder::DownloadManager;
use render::Output;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fetchtv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = FetchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let out = Output::new(cli.json);

    out.heading("Started", &timestamp());
    run(&cli, &config, out).await?;
    out.heading("Done", &timestamp());
    Ok(())
}

async fn run(cli: &Cli, config: &FetchConfig, out: Output) -> Result<()> {
    let client = HttpClient::new(&config.http)?;

    out.heading("Discover Fetch UPnP location", "");
    tracing::info!("Starting discovery");
    let device = discover_server(&client, config, cli.ip.as_deref(), cli.port)
        .await
        .context("Discovery failed")?;
    let Some(device) = device else {
        out.heading("Discovery failed", "ERROR: no device found");
        return Ok(());
    };
    out.heading("Discovery successful", &device.url);

    let (filter, mode, recordings) = match &cli.command {
        Command::Info => {
            out.device(&device)?;
            return Ok(());
        }
        Command::Shows(filter) => (filter, ListMode::Shows, None),
        Command::Recordings(args) => (&args.filter, ListMode::Recordings, Some(args)),
        Command::IsRecording(filter) => (filter, ListMode::CurrentlyRecording, None),
    };

    let endpoint = resolve_content_directory(&client, &device)
        .await
        .context("Unable to find the content directory service")?;
    let shows = list_recordings(&client, config, endpoint, filter, mode).await?;

    match recordings.and_then(|args| args.save_options()) {
        None => out.recordings(&shows)?,
        Some(save) => {
            out.heading("Saving Recordings", &save.path.display().to_string());
            let mut ledger = SavedLedger::load(&save.path, &config.recorder.ledger_file)
                .with_context(|| format!("Failed to load the save list in {}", save.path.display()))?;
            let mut manager =
                DownloadManager::new(&client, &mut ledger, save, config.recorder.clone());
            let reports = manager.save_all(&shows).await;
            out.save_reports(&reports)?;
        }
    }
    Ok(())
}

async fn list_recordings(
    client: &HttpClient,
    config: &FetchConfig,
    endpoint: fetchtv_core::ServiceEndpoint,
    filter: &FilterArgs,
    mode: ListMode,
) -> Result<Vec<ShowRecordings>> {
    let directory = ContentDirectory::new(client, endpoint);
    let folders = directory
        .recordings(&config.server.recordings_title)
        .await
        .context("Failed to browse recordings")?;

    let options = filter.to_options(mode);
    let probe = SentinelProbe::new(client, config.recorder.recording_sentinel);
    let shows = filter_recordings(&folders, &options, &probe).await?;
    Ok(shows)
}
