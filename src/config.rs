use crate::constants::*;
use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub songkick: SongkickConfig,
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongkickConfig {
    /// Base URL, joined directly with `metro_areas/...`
    #[serde(default = "default_songkick_api")]
    pub api: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_metro_area_id")]
    pub metro_area_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default, rename = "clientId", alias = "client_id")]
    pub client_id: String,
    #[serde(default, rename = "clientSecret", alias = "client_secret")]
    pub client_secret: String,
    #[serde(default = "default_embed")]
    pub embed: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_seconds: u64,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_songkick_api() -> String {
    DEFAULT_SONGKICK_API.to_string()
}
fn default_metro_area_id() -> u64 {
    DEFAULT_METRO_AREA_ID
}
fn default_embed() -> String {
    DEFAULT_SPOTIFY_EMBED.to_string()
}
fn default_auth_url() -> String {
    DEFAULT_SPOTIFY_AUTH_URL.to_string()
}
fn default_api_base() -> String {
    DEFAULT_SPOTIFY_API_BASE.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
fn default_lookup_timeout() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECONDS
}
fn default_max_concurrent_lookups() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            lookup_timeout_seconds: DEFAULT_LOOKUP_TIMEOUT_SECONDS,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }
}

impl Config {
    /// Load `config.toml` (or `SHOWMAP_CONFIG`), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("SHOWMAP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&config_content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Secrets and keys may come from the environment instead of the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SONGKICK_API_BASE") {
            self.songkick.api = v;
        }
        if let Some(v) = lookup("SONGKICK_API_KEY") {
            self.songkick.key = v;
        }
        if let Some(id) = lookup("SONGKICK_METRO_AREA_ID").and_then(|v| v.trim().parse().ok()) {
            self.songkick.metro_area_id = id;
        }
        if let Some(v) = lookup("SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = v;
        }
        if let Some(v) = lookup("SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = v;
        }
        if let Some(v) = lookup("SPOTIFY_EMBED_BASE") {
            self.spotify.embed = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("songkick.api", &self.songkick.api),
            ("songkick.key", &self.songkick.key),
            ("spotify.clientId", &self.spotify.client_id),
            ("spotify.clientSecret", &self.spotify.client_secret),
            ("spotify.embed", &self.spotify.embed),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PipelineError::Config(format!("{name} must not be empty")));
            }
        }
        if self.http.max_concurrent_lookups == 0 {
            return Err(PipelineError::Config(
                "http.max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [songkick]
        api = "https://api.songkick.com/api/3.0/"
        key = "sk-key"

        [spotify]
        clientId = "id"
        clientSecret = "secret"
        embed = "https://open.spotify.com/embed"
    "#;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.songkick.metro_area_id, 1409);
        assert_eq!(config.spotify.auth_url, DEFAULT_SPOTIFY_AUTH_URL);
        assert_eq!(config.spotify.api_base, DEFAULT_SPOTIFY_API_BASE);
        assert_eq!(config.http.max_concurrent_lookups, 8);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
        assert_eq!(config.server.port, 8080);
        config.validate().unwrap();
    }

    #[test]
    fn test_snake_case_spotify_keys_accepted() {
        let content = MINIMAL
            .replace("clientId", "client_id")
            .replace("clientSecret", "client_secret");
        let config = Config::from_toml_str(&content).unwrap();
        assert_eq!(config.spotify.client_id, "id");
        assert_eq!(config.spotify.client_secret, "secret");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_toml_str(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SONGKICK_API_KEY", "from-env"),
            ("SONGKICK_METRO_AREA_ID", "24426"),
            ("SPOTIFY_CLIENT_SECRET", "env-secret"),
        ]);
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.songkick.key, "from-env");
        assert_eq!(config.songkick.metro_area_id, 24426);
        assert_eq!(config.spotify.client_secret, "env-secret");
        assert_eq!(config.spotify.client_id, "id");
    }

    #[test]
    fn test_unparseable_metro_override_is_ignored() {
        let mut config = Config::from_toml_str(MINIMAL).unwrap();
        config.apply_overrides(|k| (k == "SONGKICK_METRO_AREA_ID").then(|| "portland".to_string()));
        assert_eq!(config.songkick.metro_area_id, 1409);
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let content = MINIMAL.replace("key = \"sk-key\"", "");
        let config = Config::from_toml_str(&content).unwrap();
        match config.validate() {
            Err(PipelineError::Config(msg)) => assert!(msg.contains("songkick.key")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let content = format!("{MINIMAL}\n[http]\nmax_concurrent_lookups = 0\n");
        let config = Config::from_toml_str(&content).unwrap();
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!(!config.songkick.api.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
