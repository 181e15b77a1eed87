use std::path::PathBuf;

/// Player configuration loaded from environment variables.
///
/// A display needs to know exactly three things: where the server is, who
/// it is, and where to keep its offline copy.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Base URL of the Ringside server.
    pub server_url: String,
    /// The display's access token, handed out once at registration.
    pub access_token: String,
    /// Where the last-known-good state is cached for offline playback.
    pub cache_path: PathBuf,
}

impl PlayerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var        | Default                 |
    /// |----------------|-------------------------|
    /// | `SERVER_URL`   | `http://localhost:3000` |
    /// | `ACCESS_TOKEN` | required                |
    /// | `CACHE_PATH`   | `ringside-player.json`  |
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let access_token = std::env::var("ACCESS_TOKEN")
            .expect("ACCESS_TOKEN must be set to the display's access token");

        let cache_path: PathBuf = std::env::var("CACHE_PATH")
            .unwrap_or_else(|_| "ringside-player.json".into())
            .into();

        Self {
            server_url,
            access_token,
            cache_path,
        }
    }
}
