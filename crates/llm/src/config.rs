/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature. Kept low so replies stay close to the format.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default timeout for a single completion request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the chat-completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer credential for the provider.
    pub api_key: String,
    /// Base URL without trailing slash; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Send `response_format: {"type": "json_object"}` with each request.
    pub json_mode: bool,
}

impl LlmConfig {
    /// Build a config with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            json_mode: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Required | Default                     |
    /// |-----------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY`      | **yes**  | --                          |
    /// | `OPENAI_BASE_URL`     | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`        | no       | `gpt-4o-mini`               |
    /// | `OPENAI_TEMPERATURE`  | no       | `0.3`                       |
    /// | `OPENAI_TIMEOUT_SECS` | no       | `60`                        |
    /// | `OPENAI_JSON_MODE`    | no       | `true`                      |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is missing or empty, or if a numeric or
    /// boolean variable does not parse.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "OPENAI_API_KEY must not be empty");

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let temperature: f32 = std::env::var("OPENAI_TEMPERATURE")
            .unwrap_or_else(|_| DEFAULT_TEMPERATURE.to_string())
            .parse()
            .expect("OPENAI_TEMPERATURE must be a valid f32");

        let timeout_secs: u64 = std::env::var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("OPENAI_TIMEOUT_SECS must be a valid u64");

        let json_mode: bool = std::env::var("OPENAI_JSON_MODE")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("OPENAI_JSON_MODE must be true or false");

        Self {
            api_key,
            base_url,
            model,
            temperature,
            timeout_secs,
            json_mode,
        }
    }
}
