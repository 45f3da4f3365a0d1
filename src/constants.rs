//! Defaults and fixed wire values shared across the crate.

// Songkick
pub const DEFAULT_SONGKICK_API: &str = "https://api.songkick.com/api/3.0/";
/// Portland, OR metro area
pub const DEFAULT_METRO_AREA_ID: u64 = 1409;
pub const SONGKICK_USER_AGENT: &str = "Request-Promise";

// Spotify
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_EMBED: &str = "https://open.spotify.com/embed";
pub const EMBED_THEME: &str = "white";
pub const SEARCH_LIMIT: u32 = 1;
pub const SEARCH_OFFSET: u32 = 1;

/// Link value emitted when no artist could be resolved
pub const UNAVAILABLE_LINK: &str = "No track available";

// HTTP
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
