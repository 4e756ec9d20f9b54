//! Core availability checks against GitHub and the npm registry.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;
use url::Url;

use crate::config::Endpoints;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of search hits requested from the npm registry.
pub const NPM_SEARCH_SIZE: usize = 250;

/// Error string the npm org endpoint returns for an unclaimed scope.
pub const SCOPE_NOT_FOUND: &str = "Scope not found";

/// Whether a name can still be registered on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum Availability {
    /// Nobody holds the name.
    Available,
    /// The name is registered, or we could not prove otherwise.
    Taken,
}

impl Availability {
    /// `true` for [`Availability::Available`].
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Taken => write!(f, "taken"),
        }
    }
}

/// Errors that prevent a definitive answer from a platform.
///
/// Callers in this crate never surface these to the user as failures; see
/// [`crate::platform::Platform::availability`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CheckError {
    /// The request could not be completed (DNS, connect, TLS, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: Box<ureq::Error>,
    },
    /// The server answered with a status we cannot interpret.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// URL that was requested.
        url: String,
        /// HTTP status received.
        status: u16,
    },
    /// The body was not the JSON document we expected.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        /// URL that was requested.
        url: String,
        /// Why the body did not parse.
        #[source]
        source: serde_json::Error,
    },
    /// The configured base URL cannot take path segments.
    #[error("cannot build a request URL from {url}")]
    InvalidUrl {
        /// Base URL that was rejected.
        url: String,
    },
}

impl CheckError {
    fn request(url: &str, source: ureq::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

/// An HTTP client bound to a set of [`Endpoints`].
///
/// Redirects are never followed, so a `HEAD` on a renamed GitHub account
/// reports the 301 rather than the target page.
///
/// ```no_run
/// use namechecker::check::Client;
///
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    agent: Agent,
    endpoints: Endpoints,
}

impl Client {
    /// Client for the public services.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    /// Client for custom endpoints (mirrors, test servers).
    #[must_use]
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .max_redirects(0)
            .max_redirects_will_error(false)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            endpoints,
        }
    }

    /// Endpoints this client talks to.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` and decode its JSON body, whatever the status code.
    ///
    /// Returns the status alongside the document so callers decide which
    /// statuses are meaningful.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<(u16, T), CheckError> {
        debug!(%url, ?query, "GET");
        let mut request = self.agent.get(url);
        for &(key, value) in query {
            request = request.query(key, value);
        }
        let mut response = request
            .config()
            .http_status_as_error(false)
            .build()
            .call()
            .map_err(|e| CheckError::request(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| CheckError::request(url, e))?;
        let document = serde_json::from_str(&body).map_err(|source| CheckError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok((status, document))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of `/-/v1/search` results. Absent fields decode as empty.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// Hits on this page; `null` and absent both mean none.
    #[serde(default)]
    pub objects: Option<Vec<SearchObject>>,
}

/// A single search hit.
#[derive(Debug, Default, Deserialize)]
pub struct SearchObject {
    /// Package metadata of the hit.
    #[serde(default)]
    pub package: Option<SearchPackage>,
}

/// The part of a hit's package metadata we look at.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPackage {
    /// Full package name, e.g. `@scope/name`.
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchResponse {
    /// Whether any hit is published under exactly `@<scope>/`.
    ///
    /// The search matches loosely, so `scope:abc` can also return packages
    /// from `@abcd`; those must not count.
    ///
    /// ```
    /// use namechecker::check::SearchResponse;
    ///
    /// let page: SearchResponse = serde_json::from_str(
    ///     r#"{"objects":[{"package":{"name":"@abcd/cli"}}]}"#,
    /// ).unwrap();
    /// assert!(page.has_scope("abcd"));
    /// assert!(!page.has_scope("abc"));
    /// ```
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        let prefix = format!("@{scope}/");
        self.objects
            .iter()
            .flatten()
            .filter_map(|obj| obj.package.as_ref()?.name.as_deref())
            .any(|name| name.starts_with(&prefix))
    }
}

/// Body of `/-/org/<scope>/package`.
///
/// A known scope returns a package-to-permission map (possibly empty); an
/// unknown one returns `{"error": "Scope not found"}`.
#[derive(Debug, Default, Deserialize)]
pub struct OrgResponse {
    /// Set when the registry rejects the lookup.
    #[serde(default)]
    pub error: Option<String>,
}

impl OrgResponse {
    /// `true` when the registry has never heard of the scope.
    #[must_use]
    pub fn scope_not_found(&self) -> bool {
        self.error.as_deref() == Some(SCOPE_NOT_FOUND)
    }
}

/// Append `segments` to `base` as percent-encoded path segments.
///
/// Identifiers may contain spaces, `/` or non-ASCII characters; each one
/// stays a single segment on the wire.
///
/// ```
/// use namechecker::check::segment_url;
///
/// let url = segment_url("https://github.com", &["my org"]).unwrap();
/// assert_eq!(url, "https://github.com/my%20org");
/// ```
///
/// # Errors
///
/// Returns [`CheckError::InvalidUrl`] if `base` is not a URL that can have
/// a path.
pub fn segment_url(base: &str, segments: &[&str]) -> Result<String, CheckError> {
    let invalid = || CheckError::InvalidUrl {
        url: base.to_string(),
    };
    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

/// Check whether `id` is free as a GitHub user or organization name.
///
/// Sends a `HEAD` to the profile URL. Only a 404 means available; every
/// other status, redirects included, means taken.
///
/// # Errors
///
/// Returns [`CheckError::Request`] if no response was received, or
/// [`CheckError::InvalidUrl`] if the GitHub endpoint is malformed.
pub fn check_github(client: &Client, id: &str) -> Result<Availability, CheckError> {
    let url = segment_url(&client.endpoints.github, &[id])?;
    debug!(%url, "HEAD");
    match client.agent.head(&url).call() {
        Ok(_) => Ok(Availability::Taken),
        Err(ureq::Error::StatusCode(404)) => Ok(Availability::Available),
        Err(ureq::Error::StatusCode(_)) => Ok(Availability::Taken),
        Err(e) => Err(CheckError::request(&url, e)),
    }
}

/// Check whether `id` is free as an npm organization scope.
///
/// 1. Search the registry for packages in the scope. Any package named
///    `@<id>/...` means the scope is taken.
/// 2. Otherwise ask the org endpoint. Only "Scope not found" means
///    available; an org with no packages still answers, and is taken.
///
/// # Errors
///
/// Returns a [`CheckError`] if either request fails, the search answers
/// with a non-success status, or a body is not the expected JSON.
pub fn check_npm_org(client: &Client, id: &str) -> Result<Availability, CheckError> {
    let registry = &client.endpoints.npm_registry;

    let search_url = segment_url(registry, &["-", "v1", "search"])?;
    let text = format!("scope:{id}");
    let size = NPM_SEARCH_SIZE.to_string();
    let (status, page): (u16, SearchResponse) =
        client.get_json(&search_url, &[("text", text.as_str()), ("size", size.as_str())])?;
    if !(200..300).contains(&status) {
        return Err(CheckError::Status {
            url: search_url,
            status,
        });
    }
    if page.has_scope(id) {
        debug!(id, "scope has published packages");
        return Ok(Availability::Taken);
    }

    // The org endpoint reports an unknown scope as a 404 with a JSON body,
    // so the status alone is not meaningful here.
    let org_url = segment_url(registry, &["-", "org", id, "package"])?;
    let (_, org): (u16, OrgResponse) = client.get_json(&org_url, &[])?;
    if org.scope_not_found() {
        Ok(Availability::Available)
    } else {
        Ok(Availability::Taken)
    }
}
