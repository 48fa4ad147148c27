use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    Error, Result, TransportError, config,
    spotify::transport::{RetryPolicy, Transport},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, CurrentUser,
        ExportPage, PlaylistRecord, SearchResponse, UpdatePlaylistRequest,
    },
};

/// Page size used when reading a playlist's tracks.
pub const EXPORT_PAGE_SIZE: u32 = 50;

/// Fields requested for each exported item; only the track name and artist names.
pub const EXPORT_FIELDS: &str = "total,next,items(track(name,artists(name)))";

pub const PLAYLIST_DESCRIPTION: &str = "Created with spotlist";

/// Where to reach the Web API and how hard to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.into(),
            retry,
        }
    }

    /// API URL and retry ceiling from the environment.
    pub fn from_env() -> Self {
        Self::new(
            config::spotify_apiurl(),
            RetryPolicy::with_max_retries(config::max_retries()),
        )
    }

    pub fn client(&self, token: impl Into<String>) -> SpotifyClient {
        SpotifyClient::new(self.base_url.clone(), token, self.retry)
    }
}

/// Authenticated Spotify Web API client bound to one bearer token.
///
/// All requests are sent through a [`Transport`], so they share its retry policy.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    transport: Transport,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport: Transport::new(Client::new(), policy),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.transport
            .client()
            .request(method, url)
            .bearer_auth(&self.token)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(TransportError::from)?;
        Ok(self.transport.send(request).await?)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// `GET /me`
    pub async fn me(&self) -> Result<CurrentUser> {
        let url = self.endpoint("/me");
        self.send_json(self.request(Method::GET, &url)).await
    }

    /// `POST /users/{user_id}/playlists`; playlists are always created public.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRecord> {
        let url = self.endpoint(&format!(
            "/users/{}/playlists",
            urlencoding::encode(user_id)
        ));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            public: true,
            description: description.to_string(),
        };
        self.send_json(self.request(Method::POST, &url).json(&body))
            .await
    }

    /// `PUT /playlists/{id}` with only the fields that are set.
    pub async fn update_playlist(
        &self,
        playlist_id: &str,
        details: &UpdatePlaylistRequest,
    ) -> Result<()> {
        let url = self.endpoint(&format!("/playlists/{}", urlencoding::encode(playlist_id)));
        self.send(self.request(Method::PUT, &url).json(details))
            .await?;
        Ok(())
    }

    /// `GET /search` for a single best-match track.
    pub async fn search_track(&self, query: &str) -> Result<SearchResponse> {
        let url = self.endpoint("/search");
        let builder = self
            .request(Method::GET, &url)
            .query(&[("q", query), ("type", "track"), ("limit", "1")]);
        self.send_json(builder).await
    }

    /// `POST /playlists/{id}/tracks`; callers keep `uris` within the 100 item limit.
    ///
    /// Returns the transport error untouched so batch callers can account for it.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> std::result::Result<AddTrackToPlaylistResponse, TransportError> {
        let url = self.endpoint(&format!(
            "/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let request = self.request(Method::POST, &url).json(&body).build()?;
        let response = self.transport.send(request).await?;
        // The snapshot id is informational; an unreadable body still means success.
        Ok(response
            .json::<AddTrackToPlaylistResponse>()
            .await
            .unwrap_or(AddTrackToPlaylistResponse { snapshot_id: None }))
    }

    /// URL of the first page of a playlist's tracks.
    pub fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        format!(
            "{}/playlists/{}/tracks?limit={}&offset=0&fields={}",
            self.base_url,
            urlencoding::encode(playlist_id),
            EXPORT_PAGE_SIZE,
            urlencoding::encode(EXPORT_FIELDS),
        )
    }

    /// Fetches one page of tracks from an absolute URL (first page or a `next` cursor).
    pub async fn playlist_tracks_page(&self, url: &str) -> Result<ExportPage> {
        self.send_json(self.request(Method::GET, url)).await
    }
}
