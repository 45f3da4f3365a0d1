use crate::config::SpotifyConfig;
use crate::constants::{SEARCH_LIMIT, SEARCH_OFFSET};
use crate::error::{PipelineError, Result};
use crate::types::{AccessToken, ArtistCatalog};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Option<ArtistPage>,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    uri: String,
}

/// Spotify Web API client using the client-credentials flow.
pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    api_base: String,
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: config.auth_url.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ArtistCatalog for SpotifyClient {
    #[instrument(skip(self))]
    async fn authenticate(&self) -> Result<AccessToken> {
        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PipelineError::authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::authentication(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::authentication(format!("malformed token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(PipelineError::authentication("token response had an empty access_token"));
        }

        let expires_at = chrono::Duration::try_seconds(token.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                PipelineError::authentication(format!(
                    "token response had an out-of-range expires_in: {}",
                    token.expires_in
                ))
            })?;

        info!("The access token expires in {} seconds", token.expires_in);
        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }

    #[instrument(skip(self, token))]
    async fn search_artist(&self, token: &AccessToken, name: &str) -> Result<Option<String>> {
        let url = format!("{}/search", self.api_base);
        let limit = SEARCH_LIMIT.to_string();
        let offset = SEARCH_OFFSET.to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token.value)
            .query(&[
                ("q", name),
                ("type", "artist"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response.json().await?;
        let uri = search
            .artists
            .and_then(|page| page.items.into_iter().next())
            .map(|item| item.uri);
        debug!("Artist search for '{}' -> {:?}", name, uri);
        Ok(uri)
    }
}
