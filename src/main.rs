use color_eyre::{eyre::eyre, Result};
use joymidi::bridge::{self, BridgeStats, RunOutcome};
use joymidi::config::{Config, LoadedConfig};
use joymidi::controller::{CollectorSettings, EventCollector};
use joymidi::midi::MidiOutSink;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_path = Config::default_path()?;
    let LoadedConfig { config, created } = Config::load_or_create(&config_path).await?;
    setup_logging_env(config.logging.tracing_level());
    if created {
        warn!(
            "Config file {} did not exist, default config written",
            config_path.display()
        );
    }
    info!("Using config {}", config_path.display());

    // Port selection may prompt on stdin, so it happens before Ctrl-C is captured
    let midi = config.midi.clone();
    let sink = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        MidiOutSink::open(
            &midi.client_name,
            midi.output_port.as_deref(),
            &mut stdin.lock(),
            &mut std::io::stdout(),
        )
    })
    .await
    .map_err(|e| eyre!("Port selection task failed: {}", e))??;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping bridge");
                interrupt.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let settings = CollectorSettings::from(&config.input);
    let (outcome, stats) = tokio::task::spawn_blocking(move || run_bridge(settings, sink, cancel))
        .await
        .map_err(|e| eyre!("Bridge task failed: {}", e))??;

    info!(
        "Bridge finished ({:?}): {} events, {} messages",
        outcome, stats.events, stats.messages
    );
    Ok(())
}

fn run_bridge(
    settings: CollectorSettings,
    mut sink: MidiOutSink,
    cancel: CancellationToken,
) -> Result<(RunOutcome, BridgeStats)> {
    let collector = EventCollector::create(Some(settings))?;
    let mut source = collector.initialize();

    let result = bridge::run(&mut source, &mut sink, &cancel);
    sink.close();
    Ok(result?)
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
