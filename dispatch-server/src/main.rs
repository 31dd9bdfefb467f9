use chrono::Utc;
use dispatch_core::config::ConsoleConfig;
use dispatch_core::journal::Journal;
use dispatch_core::{ConsoleError, ConsoleState};
use dispatch_server::console::{run_ticker, ConsoleLoop, ConsoleSnapshot, Snapshot};
use dispatch_server::routes::{console_router, AppState};
use std::sync::{Arc, RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ConsoleConfig::from_env();
    let journal = Journal::open(&config.journal_path)?;
    let state = restore_session(&journal, &config.session_id)?;
    let snapshot: Snapshot = Arc::new(RwLock::new(ConsoleSnapshot::new(state.clone())));
    let (tx, rx) = std::sync::mpsc::channel();

    let console = ConsoleLoop::new(config.session_id.clone(), journal, config.llm.clone())?;
    let snapshot_for_loop = snapshot.clone();
    std::thread::spawn(move || console.run(rx, state, snapshot_for_loop));

    let ticker_tx = tx.clone();
    std::thread::spawn(move || run_ticker(ticker_tx));

    let app = console_router(AppState { tx, snapshot });
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!(
        bind = %config.bind_addr,
        session = %config.session_id,
        llm = config.llm.is_some(),
        "dispatch-server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// Resumes a journaled session or seeds a fresh one.
fn restore_session(journal: &Journal, session_id: &str) -> Result<ConsoleState, ConsoleError> {
    let started_at = journal.start_session(session_id, Utc::now())?;
    let state = journal
        .replay(session_id)?
        .unwrap_or_else(|| ConsoleState::seeded(started_at));
    info!(
        session = session_id,
        started_at = %started_at,
        messages = state.chat.messages.len(),
        "console session restored"
    );
    Ok(state)
}
