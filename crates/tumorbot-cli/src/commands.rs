//! Subcommand execution.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tumorbot_ai::{
    AiError, ChunkCallback, CohereClient, CohereConfig, HttpFetcher, PatientContext,
    SessionSettings, SessionStore, TumorBot,
};
use tumorbot_common::{Result, SessionId, TumorbotError};
use tumorbot_config::TumorbotConfig;

use crate::cli::Command;

/// Interval between idle-conversation sweeps in `chat`.
const REAP_INTERVAL: Duration = Duration::from_secs(60);

pub async fn run(command: Command, config: &TumorbotConfig) -> Result<()> {
    let store = build_store(config)?;

    match command {
        Command::Info {
            tumor_type,
            location,
            size,
        } => {
            let bot = one_shot(&store).await;
            print_reply(bot.explain_tumor_type(&tumor_type, &location, size).await)
        }
        Command::Treatments { tumor_type } => {
            let bot = one_shot(&store).await;
            print_reply(bot.list_treatment_options(&tumor_type).await)
        }
        Command::Symptoms {
            tumor_type,
            location,
        } => {
            let bot = one_shot(&store).await;
            print_reply(bot.list_symptoms(&tumor_type, &location).await)
        }
        Command::Visualize { tumor_type } => {
            let bot = one_shot(&store).await;
            print_reply(bot.visualization_data(&tumor_type).await)
        }
        Command::Ask {
            message,
            patient,
            stream,
        } => {
            let bot = one_shot(&store).await;
            let context = patient.to_context();
            if stream {
                bot.exchange_streaming(message, context, stdout_sink())
                    .await
                    .map_err(ai_error)?;
                println!();
                Ok(())
            } else {
                print_reply(bot.exchange(message, context).await)
            }
        }
        Command::Chat { patient } => chat(store, config, patient.to_context()).await,
    }
}

fn build_store(config: &TumorbotConfig) -> Result<SessionStore> {
    let api_key = tumorbot_config::resolve_api_key(&config.provider)?;
    let client = CohereClient::new(
        CohereConfig::new(api_key)
            .with_api_base(config.provider.api_base.clone())
            .with_request_timeout(config.provider.request_timeout_secs.map(Duration::from_secs)),
    )
    .map_err(ai_error)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(config.references.fetch_timeout_secs))
        .map_err(ai_error)?;

    Ok(SessionStore::new(
        Arc::new(client),
        Arc::new(fetcher),
        session_settings(config),
    ))
}

pub fn session_settings(config: &TumorbotConfig) -> SessionSettings {
    SessionSettings::default()
        .with_model(config.provider.model.clone())
        .with_max_tokens(config.provider.max_tokens)
        .with_temperature(config.provider.temperature)
        .with_history_limit(config.session.history_limit)
        .with_sources(config.references.sources.clone())
}

async fn one_shot(store: &SessionStore) -> Arc<TumorBot> {
    store.get_or_create(&SessionId::new()).await
}

fn ai_error(e: AiError) -> TumorbotError {
    TumorbotError::Ai(e.to_string())
}

fn print_reply(reply: std::result::Result<String, AiError>) -> Result<()> {
    println!("{}", reply.map_err(ai_error)?);
    Ok(())
}

fn stdout_sink() -> ChunkCallback {
    writer_sink(|| std::io::stdout().lock())
}

/// Write each chunk through a fresh handle from `open`. After the first
/// write error (e.g. a closed pipe) the rest of the stream is dropped.
fn writer_sink<W, F>(open: F) -> ChunkCallback
where
    W: Write,
    F: Fn() -> W + Send + Sync + 'static,
{
    let failed = AtomicBool::new(false);
    Box::new(move |chunk| {
        if failed.load(Ordering::Relaxed) {
            return;
        }
        let mut out = open();
        if let Err(e) = out.write_all(chunk.as_bytes()).and_then(|()| out.flush()) {
            failed.store(true, Ordering::Relaxed);
            tracing::debug!(error = %e, "reply output closed, dropping remaining chunks");
        }
    })
}

async fn chat(
    store: SessionStore,
    config: &TumorbotConfig,
    patient: Option<PatientContext>,
) -> Result<()> {
    let reaper = store.clone();
    let ttl = Duration::from_secs(config.session.idle_ttl_secs);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(REAP_INTERVAL).await;
            let reaped = reaper.reap_idle(ttl).await;
            let sessions = reaper.count().await;
            tracing::debug!(reaped, sessions, "Reaper tick");
        }
    });

    let id = SessionId::new();
    tracing::info!(session_id = %id, "chat started");
    eprintln!("Type a question. Commands: /reset, /usage, /quit");

    // Patient context goes with the first message of each fresh history.
    let mut pending_context = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !store.exists(&id).await {
            pending_context = patient.clone();
        }
        let bot = store.get_or_create(&id).await;

        match line {
            "/quit" | "/exit" => break,
            "/reset" => {
                bot.reset().await;
                pending_context = patient.clone();
                eprintln!("History cleared.");
            }
            "/usage" => eprintln!("{}", bot.usage().await),
            message => {
                let context = pending_context.take();
                match bot
                    .exchange_streaming(message, context.clone(), stdout_sink())
                    .await
                {
                    Ok(_) => println!(),
                    Err(e) => {
                        // Nothing was committed, so the context is still owed.
                        pending_context = context;
                        eprintln!("error: {e}");
                    }
                }
            }
        }
    }

    Ok(())
}
