//! Endpoint configuration for the platforms being checked.

use std::env;

/// Public GitHub web root.
pub const GITHUB_URL: &str = "https://github.com";
/// Public npm web site, used for organization profile links.
pub const NPM_URL: &str = "https://www.npmjs.com";
/// Public npm registry API.
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Environment variable overriding [`Endpoints::github`].
pub const GITHUB_URL_VAR: &str = "NAMECHECKER_GITHUB_URL";
/// Environment variable overriding [`Endpoints::npm`].
pub const NPM_URL_VAR: &str = "NAMECHECKER_NPM_URL";
/// Environment variable overriding [`Endpoints::npm_registry`].
pub const NPM_REGISTRY_URL_VAR: &str = "NAMECHECKER_NPM_REGISTRY_URL";

/// Base URLs used to build profile links and API requests.
///
/// All values are stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GitHub web root; profiles live at `<github>/<id>`.
    pub github: String,
    /// npm web site; organizations live at `<npm>/org/<id>`.
    pub npm: String,
    /// npm registry API root.
    pub npm_registry: String,
}

impl Endpoints {
    /// Build endpoints from explicit base URLs.
    #[must_use]
    pub fn new(
        github: impl Into<String>,
        npm: impl Into<String>,
        npm_registry: impl Into<String>,
    ) -> Self {
        Self {
            github: normalize(github.into()),
            npm: normalize(npm.into()),
            npm_registry: normalize(npm_registry.into()),
        }
    }

    /// Public endpoints, with any `NAMECHECKER_*_URL` overrides applied.
    ///
    /// Empty or whitespace-only variables are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self::new(
            pick(GITHUB_URL_VAR, GITHUB_URL),
            pick(NPM_URL_VAR, NPM_URL),
            pick(NPM_REGISTRY_URL_VAR, NPM_REGISTRY_URL),
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(GITHUB_URL, NPM_URL, NPM_REGISTRY_URL)
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
