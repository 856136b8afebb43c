//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for prepcoach-server.
///
/// Every field except the provider API key has a sensible default, so the
/// server works out-of-the-box with only `OPENAI_API_KEY` set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origin allow-list.  `None` means wildcard,
    /// which matches the public single-page-app deployment model.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: `true`; disable in
    /// production to avoid exposing the API structure).
    pub enable_swagger: bool,

    /// API key for the completion provider (`OPENAI_API_KEY`).
    pub openai_api_key: String,

    /// Chat-completions endpoint URL; overridable for proxies and tests.
    pub completions_url: String,

    /// Model identifier sent to the provider.
    pub model: String,

    /// Accepted requests per client per window (default: 10).
    pub rate_limit: usize,

    /// Rate-limit window length in seconds (default: 60).
    pub rate_window_secs: u64,

    /// Maximum declared request-body size in bytes (default: 10 KiB).
    pub max_body_bytes: usize,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("PREPCOACH_BIND", "0.0.0.0:3000"),
            log_level: env_or("PREPCOACH_LOG", "info"),
            log_json: env_flag("PREPCOACH_LOG_JSON", false),
            cors_allowed_origins: std::env::var("PREPCOACH_CORS_ORIGINS").ok(),
            enable_swagger: env_flag("PREPCOACH_ENABLE_SWAGGER", true),
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            completions_url: env_or(
                "PREPCOACH_COMPLETIONS_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            model: env_or("PREPCOACH_MODEL", "gpt-4-turbo-preview"),
            rate_limit: parse_env("PREPCOACH_RATE_LIMIT", 10),
            rate_window_secs: parse_env("PREPCOACH_RATE_WINDOW_SECS", 60),
            max_body_bytes: parse_env("PREPCOACH_MAX_BODY_BYTES", 10 * 1024),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
