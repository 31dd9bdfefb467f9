use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            temperature: 0.2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub bind_addr: String,
    pub journal_path: String,
    pub session_id: String,
    /// `None` keeps the agent chat on scripted replies.
    pub llm: Option<LlmConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            journal_path: "console.db".into(),
            session_id: "default".into(),
            llm: None,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("CONSOLE_BIND").unwrap_or(defaults.bind_addr),
            journal_path: get("CONSOLE_JOURNAL").unwrap_or(defaults.journal_path),
            session_id: get("CONSOLE_SESSION").unwrap_or(defaults.session_id),
            llm: llm_from_lookup(&get),
        }
    }
}

fn llm_from_lookup(get: &impl Fn(&str) -> Option<String>) -> Option<LlmConfig> {
    let api_key_env = get("LLM_API_KEY_ENV").unwrap_or_else(|| "OPENAI_API_KEY".into());
    get(api_key_env.as_str())?;

    let defaults = LlmConfig::default();
    Some(LlmConfig {
        provider: get("LLM_PROVIDER").unwrap_or(defaults.provider),
        model: get("LLM_MODEL").unwrap_or(defaults.model),
        api_key_env,
        temperature: get("LLM_TEMPERATURE")
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults.temperature),
    })
}
