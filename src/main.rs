use anyhow::{Context, Result};
use parley::config::AppConfig;
use parley::conversation::Conversation;
use parley::service::HttpChatService;
use parley::speech::{speech_playback_from_config, voice_capture_from_config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley");

    let config = AppConfig::from_env();
    config.validate()?;

    // HTTP requests run here; the UI keeps the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("parley-net")
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let backend = Arc::new(HttpChatService::new(config.service.clone())?);
    let voice = voice_capture_from_config(&config.voice);
    let playback = speech_playback_from_config(&config.speech);

    let conversation = Conversation::new(backend, runtime.handle().clone(), voice, playback);
    parley::ui::run(conversation)?;

    info!("Window closed");
    Ok(())
}
