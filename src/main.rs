//! # Jornais Hoje
//!
//! "Eu li os jornais hoje, ô, cara." Picks a random science, technology or
//! economy story from Google News and has Sagredo, Salviati and Simplicio
//! discuss it in a short philosophical dialogue written by a language model.
//!
//! ## Usage
//!
//! ```sh
//! jornais_hoje -o ./edicoes
//! jornais_hoje -o ./edicoes --backend llama --llama-url http://127.0.0.1:8080
//! ```
//!
//! ## Architecture
//!
//! One run is a straight pipeline:
//! 1. **Fetching**: pick and normalize one story from the RSS feed
//! 2. **Dialogue**: ask the model for six turns, repair the output or fall
//!    back to a fixed dialogue
//! 3. **Output**: write the story and the dialogue as a JSON edition
//!
//! Fetching and dialogue degrade instead of failing, so a run always writes an
//! edition unless the output directory itself is unusable.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod dialogue;
mod feeds;
mod models;
mod outputs;
mod personas;
mod utils;

use cli::Cli;
use config::GenerationParams;
use dialogue::DialogueProducer;
use feeds::GoogleNewsFeed;
use models::{DialogueResult, Edition, FallbackReason, NewsItem};
use outputs::json;
use utils::{ensure_writable_dir, format_data_hora, sao_paulo_now};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("jornais_hoje starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch ----
    let feed = GoogleNewsFeed::new(args.feed_url.clone());
    let news = feed.fetch_news().await;
    info!(title = %news.title(), link = %news.link(), sentinel = news.is_sentinel(), "News item ready");

    // ---- Dialogue ----
    let dialogue = dialogue_for(&news, &args).await;
    info!(origin = ?dialogue.origin(), fallback = dialogue.is_fallback(), "Dialogue ready");

    // ---- Output ----
    let now = sao_paulo_now();
    let edition = Edition {
        local_date: now.format("%Y-%m-%d").to_string(),
        local_time: now.format("%H:%M:%S").to_string(),
        data_hora: format_data_hora(&now),
        news,
        dialogue,
    };

    if let Err(e) = json::write_edition(&edition, &args.output_dir).await {
        error!(error = %e, "Failed to write edition JSON");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Produce the dialogue for `news`.
///
/// Sentinel items get the fallback dialogue directly; the generation
/// parameters and the backend are only loaded for a real story.
async fn dialogue_for(news: &NewsItem, args: &Cli) -> DialogueResult {
    if news.is_sentinel() {
        return DialogueProducer::<api::Backend>::new(None, GenerationParams::default())
            .fallback(news, FallbackReason::NewsUnavailable);
    }
    let params = GenerationParams::load_or_default(args.generation_config.as_deref()).await;
    let backend = api::load_backend(args).await;
    DialogueProducer::new(backend, params).produce(news).await
}
