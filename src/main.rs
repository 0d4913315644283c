use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use config::Config;
use m3u2txt::{convert, emitter::EmitOptions, source::FetchConfig, source::Source};
use serde::Deserialize;
use tracing::{debug, info};

/// Convert an M3U playlist into a grouped `name,url` text listing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read the playlist from a local file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Fetch the playlist over HTTP
    #[arg(long)]
    url: Option<String>,

    /// Path to an optional configuration file
    #[arg(long, default_value = "m3u2txt.toml")]
    config: String,

    /// Emit channels without a group under this section (overrides config)
    #[arg(long)]
    ungrouped: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Settings {
    #[serde(default)]
    fetch: FetchConfig,
    #[serde(default)]
    output: EmitOptions,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let Some(source) = Source::from_flags(args.file.clone(), args.url.clone()) else {
        Args::command().print_help()?;
        return Ok(());
    };

    let settings = Config::builder()
        .add_source(config::File::with_name(&args.config).required(false))
        .add_source(
            config::Environment::with_prefix("M3U2TXT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    let mut settings: Settings = settings.try_deserialize()?;
    debug!("Configuration loaded from {}: {:?}", args.config, settings);

    if let Some(section) = args.ungrouped {
        settings.output.ungrouped_section = Some(section);
    }

    info!("Converting {:?}", source);
    let text = convert(&source, &settings.fetch, &settings.output).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
