#![warn(missing_docs, missing_debug_implementations)]

//! Check whether a name is still free on GitHub and as an npm organization.
//!
//! GitHub is probed with a `HEAD` on the profile page, where only a 404
//! means the name is free. npm is asked twice: a scoped package search, then
//! the org endpoint, which is the only way to spot an org that exists but has
//! published nothing. Anything that goes wrong counts as taken.
//!
//! # Example
//!
//! ```no_run
//! use namechecker::check::Client;
//! use namechecker::platform::check_identifier;
//!
//! let client = Client::new();
//! for result in check_identifier(&client, "my-new-org") {
//!     println!("{}: {}", result.platform, result.availability);
//! }
//! ```

pub mod check;
pub mod config;
pub mod platform;
pub mod report;
