use chrono::Utc;
use dispatch_core::chat::scripted_reply;
use dispatch_core::config::LlmConfig;
use dispatch_core::journal::Journal;
use dispatch_core::{llm, reduce, ConsoleError, ConsoleEvent, ConsoleState};
use serde::Serialize;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, warn};

const LLM_TIMEOUT: Duration = Duration::from_secs(20);

/// What the read routes serve: the console plus loop health.
#[derive(Clone, Debug, Serialize)]
pub struct ConsoleSnapshot {
    #[serde(flatten)]
    pub state: ConsoleState,
    /// Events applied live but missing from the journal. Non-zero means a
    /// restart will not rebuild this exact state.
    pub journal_failures: u64,
}

impl ConsoleSnapshot {
    pub fn new(state: ConsoleState) -> Self {
        Self {
            state,
            journal_failures: 0,
        }
    }
}

/// Latest console snapshot, published after every event.
pub type Snapshot = Arc<RwLock<ConsoleSnapshot>>;

pub struct ConsoleLoop {
    session_id: String,
    journal: Journal,
    llm: Option<LlmConfig>,
    runtime: Runtime,
    journal_failures: u64,
}

impl ConsoleLoop {
    pub fn new(
        session_id: String,
        journal: Journal,
        llm: Option<LlmConfig>,
    ) -> Result<Self, ConsoleError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            session_id,
            journal,
            llm,
            runtime,
            journal_failures: 0,
        })
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_failures(&self) -> u64 {
        self.journal_failures
    }

    /// Sole writer of the console. Runs until every sender is dropped.
    pub fn run(
        mut self,
        events: Receiver<ConsoleEvent>,
        mut state: ConsoleState,
        snapshot: Snapshot,
    ) {
        self.publish(&snapshot, &state);
        while let Ok(event) = events.recv() {
            state = self.step(state, event);
            self.publish(&snapshot, &state);
        }
        debug!(session = %self.session_id, "console loop stopped");
    }

    /// Applies one event, journals it, and answers dispatcher chat.
    pub fn step(&mut self, state: ConsoleState, event: ConsoleEvent) -> ConsoleState {
        let chat_input = match &event {
            ConsoleEvent::SendChat { text, .. } if !text.trim().is_empty() => {
                Some(text.trim().to_string())
            }
            _ => None,
        };

        let state = self.record(state, event);
        let Some(input) = chat_input else {
            return state;
        };

        let text = self.agent_reply(&state, &input);
        self.record(state, ConsoleEvent::AgentReply { text, at: Utc::now() })
    }

    fn record(&mut self, state: ConsoleState, event: ConsoleEvent) -> ConsoleState {
        if let Err(err) = self.journal.append(&self.session_id, &event, Utc::now()) {
            self.journal_failures += 1;
            error!(
                session = %self.session_id,
                kind = event.kind(),
                failures = self.journal_failures,
                error = %err,
                "journal append failed, replay will diverge from live state"
            );
        }
        reduce(state, event)
    }

    fn agent_reply(&self, state: &ConsoleState, input: &str) -> String {
        let Some(config) = &self.llm else {
            return scripted_reply(state, input);
        };
        let answer = self.runtime.block_on(async {
            tokio::time::timeout(LLM_TIMEOUT, llm::reply(config, state, input))
                .await
                .unwrap_or_else(|_| Err(ConsoleError::Llm("llm reply timed out".into())))
        });
        match answer {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "llm reply failed, using scripted reply");
                scripted_reply(state, input)
            }
        }
    }

    fn publish(&self, snapshot: &Snapshot, state: &ConsoleState) {
        let mut guard = match snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.state = state.clone();
        guard.journal_failures = self.journal_failures;
    }
}

/// Feeds a clock tick into the console every second until the loop is gone.
pub fn run_ticker(tx: Sender<ConsoleEvent>) {
    loop {
        std::thread::sleep(Duration::from_secs(1));
        if tx.send(ConsoleEvent::Tick { at: Utc::now() }).is_err() {
            break;
        }
    }
}
