use uuid::Uuid;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Event the data payload is scoped to when the resolved layout does not
    /// carry its own `event_id`.
    pub default_event_id: Uuid,
    /// Single sponsor line shown when the feed has no sponsor messages.
    pub sponsor_fallback: String,
    /// Seed the store with a demo layout/playlist/display at startup.
    pub demo_seed: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DEFAULT_EVENT_ID`     | random v4, fresh per boot  |
    /// | `SPONSOR_FALLBACK`     | `Welcome to the show`      |
    /// | `DEMO_SEED`            | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_event_id: Uuid = match std::env::var("DEFAULT_EVENT_ID") {
            Ok(raw) => raw.parse().expect("DEFAULT_EVENT_ID must be a valid UUID"),
            Err(_) => Uuid::new_v4(),
        };

        let sponsor_fallback = std::env::var("SPONSOR_FALLBACK")
            .unwrap_or_else(|_| "Welcome to the show".into());

        let demo_seed = matches!(
            std::env::var("DEMO_SEED").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_event_id,
            sponsor_fallback,
            demo_seed,
        }
    }
}
