//! REST API client for a Jellyfin server.
//!
//! Every operation comes in two flavours:
//!
//! - `try_*` returns `Result<_, JellyfinApiError>` for callers that must tell
//!   "nothing there" apart from "server unreachable" (the library sync, which
//!   would otherwise archive everything when Jellyfin is down).
//! - The plain name logs the failure and returns an empty value, which is what
//!   dashboard proxy endpoints want.
//!
//! A client built without [`JellyfinSettings`] is *not ready*: calls fail with
//! [`JellyfinApiError::NotConfigured`] without touching the network.

use std::time::Duration;

use jellystat_core::server_url::{clean_server_url, join_path};
use serde::de::DeserializeOwned;

use crate::error::JellyfinApiError;
use crate::models::{
    BaseItem, CustomQueryResponse, ItemsResponse, MediaSource, PlaybackInfo, Plugin, Session,
    SettingsValidation, User,
};
use crate::paging::{PageParams, PageProgress, INITIAL_TOTAL, ITEM_FIELDS, PAGE_DELAY};

/// Header carrying the API key on every request.
pub const TOKEN_HEADER: &str = "X-MediaBrowser-Token";

/// Number of items `Users/{id}/Items/Latest` returns by default.
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// HTTP request timeout for a single call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when a supplied URL cannot be parsed.
const INVALID_URL_MESSAGE: &str = "Invalid URL";

/// Connection details for a Jellyfin server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinSettings {
    /// API base URL, already normalised by [`clean_server_url`].
    pub host: String,
    pub api_key: String,
    /// User id to act as when an endpoint needs one.
    pub preferred_admin_id: Option<String>,
}

impl JellyfinSettings {
    pub fn new(host: &str, api_key: impl Into<String>) -> Self {
        Self {
            host: clean_server_url(host),
            api_key: api_key.into(),
            preferred_admin_id: None,
        }
    }

    pub fn with_preferred_admin(mut self, admin_id: Option<String>) -> Self {
        self.preferred_admin_id = admin_id.filter(|id| !id.is_empty());
        self
    }
}

/// HTTP client for a single Jellyfin server.
pub struct JellyfinApi {
    client: reqwest::Client,
    settings: Option<JellyfinSettings>,
}

impl JellyfinApi {
    /// Create a client; `None` yields a not-ready client.
    pub fn new(settings: Option<JellyfinSettings>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, settings)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, settings: Option<JellyfinSettings>) -> Self {
        Self { client, settings }
    }

    /// Whether host and API key are known.
    pub fn is_ready(&self) -> bool {
        self.settings.is_some()
    }

    pub fn settings(&self) -> Option<&JellyfinSettings> {
        self.settings.as_ref()
    }

    // ---- users ----

    /// `GET /Users`.
    pub async fn try_get_users(&self) -> Result<Vec<User>, JellyfinApiError> {
        let response = self.get("Users")?.send().await?;
        parse_response(response).await
    }

    pub async fn get_users(&self) -> Vec<User> {
        or_empty(self.try_get_users().await, "get_users")
    }

    /// Users whose policy grants administrator rights.
    pub async fn try_get_admins(&self) -> Result<Vec<User>, JellyfinApiError> {
        let users = self.try_get_users().await?;
        Ok(users.into_iter().filter(User::is_admin).collect())
    }

    pub async fn get_admins(&self) -> Vec<User> {
        or_empty(self.try_get_admins().await, "get_admins")
    }

    /// Resolve the user id to act as.
    ///
    /// An explicit id wins; otherwise the configured preferred admin, then the
    /// first administrator on the server.
    pub async fn resolve_user_id(&self, user_id: Option<&str>) -> Result<String, JellyfinApiError> {
        if let Some(id) = user_id.filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }
        let settings = self.settings_or_err()?;
        if let Some(admin) = &settings.preferred_admin_id {
            return Ok(admin.clone());
        }
        self.try_get_admins()
            .await?
            .into_iter()
            .next()
            .map(|u| u.id)
            .ok_or(JellyfinApiError::NoAdminUser)
    }

    // ---- items ----

    /// Paged `GET /Items?ids=...`.
    pub async fn try_get_items_by_id(
        &self,
        ids: &str,
        params: PageParams,
    ) -> Result<Vec<BaseItem>, JellyfinApiError> {
        let filter = [("ids", ids.to_string())];
        self.fetch_paged(&filter, params, |_| {}).await
    }

    pub async fn get_items_by_id(&self, ids: &str, params: PageParams) -> Vec<BaseItem> {
        or_empty(
            self.try_get_items_by_id(ids, params).await,
            "get_items_by_id",
        )
    }

    /// Paged `GET /Items?ParentId=...[&Ids=...]`.
    ///
    /// `on_page` is called after every page that reports a total.
    pub async fn try_get_items_from_parent_id<F>(
        &self,
        parent_id: &str,
        item_id: Option<&str>,
        params: PageParams,
        on_page: F,
    ) -> Result<Vec<BaseItem>, JellyfinApiError>
    where
        F: FnMut(PageProgress) + Send,
    {
        let mut filter = vec![("ParentId", parent_id.to_string())];
        if let Some(id) = item_id.filter(|id| !id.is_empty()) {
            filter.push(("Ids", id.to_string()));
        }
        self.fetch_paged(&filter, params, on_page).await
    }

    pub async fn get_items_from_parent_id(
        &self,
        parent_id: &str,
        item_id: Option<&str>,
        params: PageParams,
    ) -> Vec<BaseItem> {
        or_empty(
            self.try_get_items_from_parent_id(parent_id, item_id, params, |_| {})
                .await,
            "get_items_from_parent_id",
        )
    }

    /// `GET /Items/{id}/playbackinfo?userId=...`, returning the media sources.
    pub async fn try_get_item_info(
        &self,
        item_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<MediaSource>, JellyfinApiError> {
        let user_id = self.resolve_user_id(user_id).await?;
        let response = self
            .get(&format!("Items/{item_id}/playbackinfo"))?
            .query(&[("userId", user_id)])
            .send()
            .await?;
        let info: PlaybackInfo = parse_response(response).await?;
        Ok(info.media_sources)
    }

    pub async fn get_item_info(&self, item_id: &str, user_id: Option<&str>) -> Vec<MediaSource> {
        or_empty(
            self.try_get_item_info(item_id, user_id).await,
            "get_item_info",
        )
    }

    // ---- libraries, seasons, episodes ----

    /// `GET /Library/MediaFolders`, without box sets and playlists.
    pub async fn try_get_libraries(&self) -> Result<Vec<BaseItem>, JellyfinApiError> {
        let response = self.get("Library/MediaFolders")?.send().await?;
        let folders: ItemsResponse = parse_response(response).await?;
        Ok(folders
            .items
            .into_iter()
            .filter(|library| !library.is_ignored_collection())
            .collect())
    }

    pub async fn get_libraries(&self) -> Vec<BaseItem> {
        or_empty(self.try_get_libraries().await, "get_libraries")
    }

    /// `GET /Shows/{id}/Seasons`, without virtual seasons.
    pub async fn try_get_seasons(&self, series_id: &str) -> Result<Vec<BaseItem>, JellyfinApiError> {
        let response = self.get(&format!("Shows/{series_id}/Seasons"))?.send().await?;
        let seasons: ItemsResponse = parse_response(response).await?;
        Ok(without_virtual(seasons.items))
    }

    pub async fn get_seasons(&self, series_id: &str) -> Vec<BaseItem> {
        or_empty(self.try_get_seasons(series_id).await, "get_seasons")
    }

    /// `GET /Shows/{id}/Episodes?seasonId=...`, without virtual episodes.
    pub async fn try_get_episodes(
        &self,
        series_id: &str,
        season_id: &str,
    ) -> Result<Vec<BaseItem>, JellyfinApiError> {
        let response = self
            .get(&format!("Shows/{series_id}/Episodes"))?
            .query(&[("seasonId", season_id)])
            .send()
            .await?;
        let episodes: ItemsResponse = parse_response(response).await?;
        Ok(without_virtual(episodes.items))
    }

    pub async fn get_episodes(&self, series_id: &str, season_id: &str) -> Vec<BaseItem> {
        or_empty(
            self.try_get_episodes(series_id, season_id).await,
            "get_episodes",
        )
    }

    /// `GET /Users/{id}/Items/Latest`, optionally scoped to one library.
    pub async fn try_get_recently_added(
        &self,
        library_id: Option<&str>,
        limit: Option<u32>,
        user_id: Option<&str>,
    ) -> Result<Vec<BaseItem>, JellyfinApiError> {
        let user_id = self.resolve_user_id(user_id).await?;
        let mut query = vec![
            ("Limit", limit.unwrap_or(DEFAULT_RECENT_LIMIT).to_string()),
            ("fields", ITEM_FIELDS.to_string()),
        ];
        if let Some(library) = library_id.filter(|id| !id.is_empty()) {
            query.push(("ParentId", library.to_string()));
        }

        let response = self
            .get(&format!("Users/{user_id}/Items/Latest"))?
            .query(&query)
            .send()
            .await?;
        let items: Vec<BaseItem> = parse_response(response).await?;
        Ok(without_virtual(items))
    }

    pub async fn get_recently_added(
        &self,
        library_id: Option<&str>,
        limit: Option<u32>,
        user_id: Option<&str>,
    ) -> Vec<BaseItem> {
        or_empty(
            self.try_get_recently_added(library_id, limit, user_id)
                .await,
            "get_recently_added",
        )
    }

    // ---- sessions, plugins, custom queries ----

    /// `GET /sessions`, keeping only sessions that are playing non-trailer media.
    ///
    /// A non-array body means no sessions; an array that does not decode is an
    /// error, so callers never mistake it for every session having ended.
    pub async fn try_get_sessions(&self) -> Result<Vec<Session>, JellyfinApiError> {
        let response = self.get("sessions")?.send().await?;
        let body: serde_json::Value = parse_response(response).await?;
        if !body.is_array() {
            return Ok(Vec::new());
        }
        let sessions: Vec<Session> = serde_json::from_value(body)
            .map_err(|source| JellyfinApiError::Decode {
                what: "sessions",
                source,
            })?;
        Ok(sessions
            .into_iter()
            .filter(Session::is_playing_media)
            .collect())
    }

    pub async fn get_sessions(&self) -> Vec<Session> {
        or_empty(self.try_get_sessions().await, "get_sessions")
    }

    /// `GET /plugins`.
    pub async fn try_get_installed_plugins(&self) -> Result<Vec<Plugin>, JellyfinApiError> {
        let response = self.get("plugins")?.send().await?;
        parse_response(response).await
    }

    pub async fn get_installed_plugins(&self) -> Vec<Plugin> {
        or_empty(
            self.try_get_installed_plugins().await,
            "get_installed_plugins",
        )
    }

    /// Run a SQL query through the Playback Reporting plugin.
    ///
    /// Sends `POST /user_usage_stats/submit_custom_query` and returns the
    /// result rows.
    pub async fn try_stats_submit_custom_query(
        &self,
        query: &str,
    ) -> Result<Vec<Vec<serde_json::Value>>, JellyfinApiError> {
        let body = serde_json::json!({ "CustomQueryString": query });
        let response = self
            .post("user_usage_stats/submit_custom_query")?
            .json(&body)
            .send()
            .await?;
        let result: CustomQueryResponse = parse_response(response).await?;
        Ok(result.results)
    }

    pub async fn stats_submit_custom_query(&self, query: &str) -> Vec<Vec<serde_json::Value>> {
        or_empty(
            self.try_stats_submit_custom_query(query).await,
            "stats_submit_custom_query",
        )
    }

    // ---- settings validation ----

    /// Check that `url` points at a Jellyfin server accepting `api_key`.
    ///
    /// Independent of the configured settings, so it can be used before the
    /// client is ready.
    pub async fn validate_settings(&self, url: &str, api_key: &str) -> SettingsValidation {
        let cleaned_url = clean_server_url(url);
        let mut result = SettingsValidation {
            is_valid: false,
            status: 400,
            error_message: INVALID_URL_MESSAGE.to_string(),
            url: url.to_string(),
            cleaned_url: cleaned_url.clone(),
        };

        if reqwest::Url::parse(&cleaned_url).is_err() {
            return result;
        }

        let validation_url = join_path(&cleaned_url, "system/configuration");
        let outcome = match self
            .client
            .get(&validation_url)
            .header(TOKEN_HEADER, api_key)
            .send()
            .await
        {
            Ok(response) => ensure_success(response),
            Err(e) => Err(JellyfinApiError::from(e)),
        };

        match outcome {
            Ok(response) => {
                let status = response.status().as_u16();
                result.is_valid = status == 200;
                result.status = status;
                result.error_message.clear();
            }
            Err(e) => {
                e.log("validate_settings");
                result.status = e.status().unwrap_or(400);
                result.error_message = e.user_message();
            }
        }
        result
    }

    // ---- private helpers ----

    fn settings_or_err(&self) -> Result<&JellyfinSettings, JellyfinApiError> {
        self.settings.as_ref().ok_or(JellyfinApiError::NotConfigured)
    }

    /// Start an authenticated GET request for `path` under the API base.
    fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, JellyfinApiError> {
        let settings = self.settings_or_err()?;
        Ok(self
            .client
            .get(join_path(&settings.host, path))
            .header(TOKEN_HEADER, &settings.api_key))
    }

    /// Start an authenticated POST request for `path` under the API base.
    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, JellyfinApiError> {
        let settings = self.settings_or_err()?;
        Ok(self
            .client
            .post(join_path(&settings.host, path))
            .header(TOKEN_HEADER, &settings.api_key))
    }

    /// Walk `/Items` page by page.
    ///
    /// Stops once `start_index` reaches the reported total, or right after a
    /// page that carries no `TotalRecordCount` at all.
    async fn fetch_paged<F>(
        &self,
        filter: &[(&str, String)],
        params: PageParams,
        mut on_page: F,
    ) -> Result<Vec<BaseItem>, JellyfinApiError>
    where
        F: FnMut(PageProgress) + Send,
    {
        let page_size = params.page_size();
        let mut start_index = params.start_index;
        let mut total = INITIAL_TOTAL;
        let mut items = Vec::new();

        while start_index < total {
            let response = self
                .get("Items")?
                .query(filter)
                .query(&[
                    ("fields", ITEM_FIELDS.to_string()),
                    ("startIndex", start_index.to_string()),
                    ("recursive", params.recursive.to_string()),
                    ("limit", page_size.to_string()),
                    ("isMissing", "false".to_string()),
                    ("excludeLocationTypes", "Virtual".to_string()),
                ])
                .send()
                .await?;
            let page: ItemsResponse = parse_response(response).await?;

            total = page.total_record_count.unwrap_or(0);
            start_index += page_size;
            items.extend(page.items);

            if page.total_record_count.is_none() {
                break;
            }

            on_page(PageProgress {
                fetched: start_index,
                total,
            });

            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(items)
    }
}

/// Log a failed call and fall back to an empty value.
fn or_empty<T: Default>(result: Result<T, JellyfinApiError>, operation: &str) -> T {
    result.unwrap_or_else(|e| {
        e.log(operation);
        T::default()
    })
}

fn without_virtual(items: Vec<BaseItem>) -> Vec<BaseItem> {
    items.into_iter().filter(|i| !i.is_virtual()).collect()
}

/// Ensure the response has a success status code, otherwise classify it.
fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, JellyfinApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(JellyfinApiError::Status {
            status: status.as_u16(),
            path: response.url().path().to_string(),
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, JellyfinApiError> {
    let response = ensure_success(response)?;
    Ok(response.json::<T>().await?)
}
