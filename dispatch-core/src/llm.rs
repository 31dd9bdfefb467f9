use crate::chat::Sender;
use crate::config::LlmConfig;
use crate::error::ConsoleError;
use crate::state::ConsoleState;
use rig::client::completion::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

const PREAMBLE: &str =
    "You are an emergency dispatch assistant. Answer in at most three short sentences.";

/// Asks the configured model to answer the dispatcher, grounded on the current console.
///
/// The rig client spawns onto the ambient Tokio runtime, so this must be
/// awaited from inside one.
pub async fn reply(
    config: &LlmConfig,
    state: &ConsoleState,
    input: &str,
) -> Result<String, ConsoleError> {
    let prompt = format!(
        "Incident context:\n{}\n\nRecent chat:\n{}\n\nDispatcher: {input}",
        context_summary(state),
        recent_chat(state, 6)
    );
    let raw = run_prompt(config, PREAMBLE, &prompt).await?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Llm("empty completion".into()));
    }
    Ok(trimmed.to_string())
}

fn context_summary(state: &ConsoleState) -> String {
    let units = state
        .resources
        .iter()
        .take(5)
        .map(|r| {
            format!(
                "{} {} eta={}min dist={}km{}",
                r.id,
                r.kind,
                r.eta,
                r.distance,
                if r.is_ai_suggested { " suggested" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "type={}\nlocation={}\nsymptoms={}\nunconscious={} not_breathing={}\nunits:\n{units}",
        state.call.incident_type,
        state.call.location,
        state.situation.symptoms.join(", "),
        state.situation.is_unconscious,
        state.situation.is_not_breathing,
    )
}

fn recent_chat(state: &ConsoleState, limit: usize) -> String {
    let messages = &state.chat.messages;
    messages[messages.len().saturating_sub(limit)..]
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::Agent => "Agent",
                Sender::Dispatcher => "Dispatcher",
            };
            format!("{who}: {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn run_prompt(
    config: &LlmConfig,
    preamble: &str,
    prompt: &str,
) -> Result<String, ConsoleError> {
    if config.provider.to_lowercase() != "openai" {
        return Err(ConsoleError::Llm(format!(
            "unsupported llm provider '{}'",
            config.provider
        )));
    }

    let api_key = std::env::var(&config.api_key_env)
        .map_err(|_| ConsoleError::Llm(format!("missing env var {}", config.api_key_env)))?;
    let client: openai::Client = openai::Client::new(&api_key)
        .map_err(|e| ConsoleError::Llm(format!("openai client error: {e}")))?;

    let agent = client
        .agent(&config.model)
        .preamble(preamble)
        .temperature(config.temperature)
        .build();

    agent
        .prompt(prompt)
        .await
        .map_err(|e| ConsoleError::Llm(format!("llm prompt failed: {e}")))
}
