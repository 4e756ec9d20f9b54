//! The fixed set of platforms and the per-identifier fan-out.

use std::fmt;
use std::thread;

use tracing::{error, warn};

use crate::check::{self, Availability, CheckError, Client};

/// A platform a name can be registered on.
///
/// [`Platform::ALL`] lists them in the order results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// GitHub user or organization.
    GitHub,
    /// npm organization scope.
    NpmOrg,
}

impl Platform {
    /// Every platform, in report order.
    pub const ALL: [Platform; 2] = [Platform::GitHub, Platform::NpmOrg];

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::NpmOrg => "npm org",
        }
    }

    /// Public page of `id` on this platform.
    #[must_use]
    pub fn profile_url(self, client: &Client, id: &str) -> String {
        let endpoints = client.endpoints();
        match self {
            Self::GitHub => format!("{}/{id}", endpoints.github),
            Self::NpmOrg => format!("{}/org/{id}", endpoints.npm),
        }
    }

    /// Where a new account or organization is created.
    #[must_use]
    pub fn create_url(self) -> &'static str {
        match self {
            Self::GitHub => "https://github.com/account/organizations/new?plan=free",
            Self::NpmOrg => "https://www.npmjs.com/org/create",
        }
    }

    /// Ask the platform about `id`.
    ///
    /// # Errors
    ///
    /// Propagates the [`CheckError`] of the underlying check.
    pub fn check(self, client: &Client, id: &str) -> Result<Availability, CheckError> {
        match self {
            Self::GitHub => check::check_github(client, id),
            Self::NpmOrg => check::check_npm_org(client, id),
        }
    }

    /// Like [`Platform::check`], but a failure is logged and reported as
    /// [`Availability::Taken`].
    pub fn availability(self, client: &Client, id: &str) -> Availability {
        match self.check(client, id) {
            Ok(availability) => availability,
            Err(e) => {
                warn!("error checking {} for {id}: {e}", self.name());
                Availability::Taken
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome for one (identifier, platform) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Platform that was asked.
    pub platform: Platform,
    /// Profile URL of the identifier on that platform.
    pub url: String,
    /// Where to register the name.
    pub create_url: &'static str,
    /// What the platform said.
    pub availability: Availability,
}

impl CheckResult {
    /// Shorthand for `self.availability.is_available()`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }
}

/// Check `id` on every platform at once and wait for all of them.
///
/// Results come back in [`Platform::ALL`] order regardless of which platform
/// answered first. Never fails: every problem degrades to
/// [`Availability::Taken`].
pub fn check_identifier(client: &Client, id: &str) -> Vec<CheckResult> {
    thread::scope(|s| {
        let handles: Vec<_> = Platform::ALL
            .iter()
            .map(|&platform| s.spawn(move || platform.availability(client, id)))
            .collect();

        Platform::ALL
            .into_iter()
            .zip(handles)
            .map(|(platform, handle)| {
                let availability = handle.join().unwrap_or_else(|_| {
                    error!("{} checker panicked for {id}", platform.name());
                    Availability::Taken
                });
                CheckResult {
                    platform,
                    url: platform.profile_url(client, id),
                    create_url: platform.create_url(),
                    availability,
                }
            })
            .collect()
    })
}
